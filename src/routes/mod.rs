use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod admin;
pub mod checkout;
pub mod coupons;
pub mod delivery;
pub mod doc;
pub mod health;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/delivery", delivery::router())
        .nest("/addresses", addresses::router())
        .nest("/coupons", coupons::router())
        .nest("/checkout", checkout::router())
        .nest("/admin", admin::router())
}
