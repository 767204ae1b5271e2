pub mod address_service;
pub mod checkout_service;
pub mod coupon_service;
pub mod delivery_service;
