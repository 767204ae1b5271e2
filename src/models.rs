use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    coupon_usages::Model as CouponUsageModel,
    coupons::{DiscountKind, Model as CouponModel},
    delivery_addresses::Model as AddressModel,
    delivery_zones::{Model as ZoneModel, ZoneType},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryZone {
    pub id: Uuid,
    pub zone_type: ZoneType,
    pub name: String,
    pub fee: i64,
    pub estimated_days: i32,
    pub is_active: bool,
}

/// Price and timing of a delivery to one city.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveryQuote {
    pub zone: DeliveryZone,
    pub fee: i64,
    pub estimated_days: i32,
    pub estimated_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub country: String,
    pub zone_id: Option<Uuid>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub min_order_amount: i64,
    pub max_discount_amount: Option<i64>,
    pub max_uses: i32,
    pub used_count: i32,
    pub max_uses_per_user: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    /// Empty means every product.
    pub product_ids: Vec<Uuid>,
    pub category_ids: Vec<Uuid>,
    /// Empty means every account.
    pub user_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    pub fn is_product_scoped(&self) -> bool {
        !self.product_ids.is_empty() || !self.category_ids.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponUsage {
    pub id: Uuid,
    pub coupon_id: Uuid,
    pub user_id: Uuid,
    pub order_id: Uuid,
    pub discount_amount: i64,
    pub used_at: DateTime<Utc>,
}

/// One line of the order being priced; `amount` is the line total.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: i64,
}

/// The order a coupon is committed against.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSnapshot {
    pub order_id: Uuid,
    pub subtotal: i64,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

pub fn zone_from_entity(model: ZoneModel) -> DeliveryZone {
    DeliveryZone {
        id: model.id,
        zone_type: model.zone_type,
        name: model.name,
        fee: model.fee,
        estimated_days: model.estimated_days,
        is_active: model.is_active,
    }
}

pub fn address_from_entity(model: AddressModel) -> DeliveryAddress {
    DeliveryAddress {
        id: model.id,
        user_id: model.user_id,
        recipient_name: model.recipient_name,
        phone: model.phone,
        city: model.city,
        postal_code: model.postal_code,
        country: model.country,
        zone_id: model.zone_id,
        is_default: model.is_default,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Builds the domain coupon from its row and its three scoping sets.
pub fn coupon_from_entity(
    model: CouponModel,
    product_ids: Vec<Uuid>,
    category_ids: Vec<Uuid>,
    user_ids: Vec<Uuid>,
) -> Coupon {
    Coupon {
        id: model.id,
        code: model.code,
        discount_kind: model.discount_kind,
        discount_value: model.discount_value,
        min_order_amount: model.min_order_amount,
        max_discount_amount: model.max_discount_amount,
        max_uses: model.max_uses,
        used_count: model.used_count,
        max_uses_per_user: model.max_uses_per_user,
        valid_from: model.valid_from.with_timezone(&Utc),
        valid_until: model.valid_until.with_timezone(&Utc),
        is_active: model.is_active,
        product_ids,
        category_ids,
        user_ids,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn usage_from_entity(model: CouponUsageModel) -> CouponUsage {
    CouponUsage {
        id: model.id,
        coupon_id: model.coupon_id,
        user_id: model.user_id,
        order_id: model.order_id,
        discount_amount: model.discount_amount,
        used_at: model.used_at.with_timezone(&Utc),
    }
}
