use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "free_shipping")]
    FreeShipping,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub min_order_amount: i64,
    pub max_discount_amount: Option<i64>,
    pub max_uses: i32,
    pub used_count: i32,
    pub max_uses_per_user: i32,
    pub valid_from: DateTimeWithTimeZone,
    pub valid_until: DateTimeWithTimeZone,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::coupon_usages::Entity")]
    CouponUsages,
    #[sea_orm(has_many = "super::coupon_products::Entity")]
    CouponProducts,
    #[sea_orm(has_many = "super::coupon_categories::Entity")]
    CouponCategories,
    #[sea_orm(has_many = "super::coupon_users::Entity")]
    CouponUsers,
}

impl Related<super::coupon_usages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponUsages.def()
    }
}

impl Related<super::coupon_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponProducts.def()
    }
}

impl Related<super::coupon_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponCategories.def()
    }
}

impl Related<super::coupon_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
