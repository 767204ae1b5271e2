use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse geographic bucket a delivery is priced by.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    #[sea_orm(string_value = "abidjan")]
    Abidjan,
    #[sea_orm(string_value = "grand_bassam")]
    GrandBassam,
    #[sea_orm(string_value = "other_domestic")]
    OtherDomestic,
    #[sea_orm(string_value = "international")]
    International,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Abidjan => "abidjan",
            ZoneType::GrandBassam => "grand_bassam",
            ZoneType::OtherDomestic => "other_domestic",
            ZoneType::International => "international",
        }
    }
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ZoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abidjan" => Ok(ZoneType::Abidjan),
            "grand_bassam" => Ok(ZoneType::GrandBassam),
            "other_domestic" => Ok(ZoneType::OtherDomestic),
            "international" => Ok(ZoneType::International),
            other => Err(format!("unknown zone type '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_zones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub zone_type: ZoneType,
    pub name: String,
    pub fee: i64,
    pub estimated_days: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_addresses::Entity")]
    DeliveryAddresses,
}

impl Related<super::delivery_addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryAddresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
