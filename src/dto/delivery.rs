use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::DeliveryZone;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeliveryQuoteRequest {
    pub city: String,
    /// Defaults to the home country.
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateZoneRequest {
    pub name: Option<String>,
    pub fee: Option<i64>,
    pub estimated_days: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ZoneList {
    pub items: Vec<DeliveryZone>,
}
