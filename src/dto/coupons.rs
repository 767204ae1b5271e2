use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::coupons::DiscountKind,
    models::{CouponUsage, OrderLine, OrderSnapshot},
    pricing::coupons::CouponVerdict,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateCouponRequest {
    pub code: String,
    pub order_amount: Option<i64>,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateCouponResponse {
    #[serde(flatten)]
    pub verdict: CouponVerdict,
    /// Discount the order would get, when an amount was given and the coupon is valid.
    pub discount: Option<i64>,
    pub free_shipping: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
    pub order: OrderSnapshot,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_amount: i64,
    pub free_shipping: bool,
    pub usage: CouponUsage,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplyCouponResponse {
    #[serde(flatten)]
    pub verdict: CouponVerdict,
    pub applied: Option<AppliedCoupon>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    #[serde(default)]
    pub min_order_amount: i64,
    pub max_discount_amount: Option<i64>,
    pub max_uses: i32,
    #[serde(default = "default_max_uses_per_user")]
    pub max_uses_per_user: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
}

fn default_max_uses_per_user() -> i32 {
    1
}
