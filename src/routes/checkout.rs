use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::checkout::{CheckoutQuote, CheckoutQuoteRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/quote", post(quote_checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout/quote",
    request_body = CheckoutQuoteRequest,
    responses(
        (status = 200, description = "Subtotal, delivery, discount and total for an order", body = ApiResponse<CheckoutQuote>),
        (status = 400, description = "Invalid subtotal"),
    ),
    security((), ("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn quote_checkout(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<CheckoutQuoteRequest>,
) -> AppResult<Json<ApiResponse<CheckoutQuote>>> {
    let quote = checkout_service::quote_checkout(&state, user.as_ref(), payload).await?;
    Ok(Json(ApiResponse::success("Checkout quote", quote, None)))
}
