pub mod coupon_categories;
pub mod coupon_products;
pub mod coupon_usages;
pub mod coupon_users;
pub mod coupons;
pub mod delivery_addresses;
pub mod delivery_zones;

pub use coupon_categories::Entity as CouponCategories;
pub use coupon_products::Entity as CouponProducts;
pub use coupon_usages::Entity as CouponUsages;
pub use coupon_users::Entity as CouponUsers;
pub use coupons::Entity as Coupons;
pub use delivery_addresses::Entity as DeliveryAddresses;
pub use delivery_zones::Entity as DeliveryZones;
