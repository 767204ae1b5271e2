use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, SaveAddressRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{DeliveryAddress, DeliveryQuote},
    response::{ApiResponse, Meta},
    services::address_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_addresses).post(save_address))
        .route("/{id}/default", patch(set_default_address))
        .route("/{id}/quote", get(quote_for_address))
}

#[utoipa::path(
    get,
    path = "/api/addresses",
    responses(
        (status = 200, description = "Saved delivery addresses, default first", body = ApiResponse<AddressList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AddressList>>> {
    let items = address_service::list_addresses(&state, &user).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Addresses",
        AddressList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = SaveAddressRequest,
    responses(
        (status = 200, description = "Address saved with its delivery zone", body = ApiResponse<DeliveryAddress>),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn save_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SaveAddressRequest>,
) -> AppResult<Json<ApiResponse<DeliveryAddress>>> {
    let address = address_service::save_address(&state, &user, payload).await?;
    Ok(Json(ApiResponse::success(
        "Address saved",
        address,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/addresses/{id}/default",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address is now the default", body = ApiResponse<DeliveryAddress>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn set_default_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeliveryAddress>>> {
    let address = address_service::set_default_address(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok(address)))
}

#[utoipa::path(
    get,
    path = "/api/addresses/{id}/quote",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Delivery quote for a saved address", body = ApiResponse<DeliveryQuote>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
pub async fn quote_for_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeliveryQuote>>> {
    let quote = address_service::quote_for_address(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok(quote)))
}
