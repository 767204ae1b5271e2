use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub country: String,
    pub zone_id: Option<Uuid>,
    pub is_default: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::delivery_zones::Entity",
        from = "Column::ZoneId",
        to = "super::delivery_zones::Column::Id"
    )]
    DeliveryZones,
}

impl Related<super::delivery_zones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryZones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
