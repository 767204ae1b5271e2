use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::delivery::{DeliveryQuoteRequest, ZoneList},
    error::{AppError, AppResult},
    models::DeliveryQuote,
    response::{ApiResponse, Meta},
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote_delivery))
        .route("/zones", get(list_zones))
}

#[utoipa::path(
    post,
    path = "/api/delivery/quote",
    request_body = DeliveryQuoteRequest,
    responses(
        (status = 200, description = "Delivery fee and estimate for a city", body = ApiResponse<DeliveryQuote>),
        (status = 400, description = "City is missing"),
    ),
    tag = "Delivery"
)]
pub async fn quote_delivery(
    State(state): State<AppState>,
    Json(payload): Json<DeliveryQuoteRequest>,
) -> AppResult<Json<ApiResponse<DeliveryQuote>>> {
    if payload.city.trim().is_empty() {
        return Err(AppError::BadRequest("city must not be empty".into()));
    }
    let quote =
        delivery_service::resolve(&state, &payload.city, payload.country.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        "Delivery quote",
        quote,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/delivery/zones",
    responses(
        (status = 200, description = "All delivery zones, cheapest first", body = ApiResponse<ZoneList>),
    ),
    tag = "Delivery"
)]
pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ZoneList>>> {
    let items = delivery_service::list_zones(&state).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Delivery zones",
        ZoneList { items },
        Some(meta),
    )))
}
