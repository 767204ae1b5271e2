pub mod addresses;
pub mod checkout;
pub mod coupons;
pub mod delivery;
