use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{DeliveryQuote, OrderLine},
    pricing::coupons::CouponVerdict,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutQuoteRequest {
    pub city: String,
    pub country: Option<String>,
    pub coupon_code: Option<String>,
    pub subtotal: i64,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

/// What the shopper would be charged, before anything is committed.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutQuote {
    pub subtotal: i64,
    pub delivery: DeliveryQuote,
    pub coupon: Option<CouponVerdict>,
    pub discount: i64,
    pub shipping_fee: i64,
    pub total: i64,
}
