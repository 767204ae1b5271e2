use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::DeliveryAddress;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveAddressRequest {
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressList {
    pub items: Vec<DeliveryAddress>,
}
