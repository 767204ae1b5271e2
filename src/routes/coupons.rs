use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::coupons::{
        ApplyCouponRequest, ApplyCouponResponse, ValidateCouponRequest, ValidateCouponResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    pricing::coupons::{CouponValidation, CouponVerdict},
    response::{ApiResponse, Meta},
    services::coupon_service::{self, ApplyOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_coupon))
        .route("/apply", post(apply_coupon))
}

#[utoipa::path(
    post,
    path = "/api/coupons/validate",
    request_body = ValidateCouponRequest,
    responses(
        (status = 200, description = "Whether the coupon can be used, and why not", body = ApiResponse<ValidateCouponResponse>),
    ),
    security((), ("bearer_auth" = [])),
    tag = "Coupons"
)]
pub async fn validate_coupon(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<ValidateCouponRequest>,
) -> AppResult<Json<ApiResponse<ValidateCouponResponse>>> {
    let check = coupon_service::check(
        &state,
        &payload.code,
        user.as_ref(),
        payload.order_amount,
        &payload.lines,
    )
    .await?;

    let data = ValidateCouponResponse {
        free_shipping: check.free_shipping(),
        discount: payload
            .order_amount
            .filter(|_| check.validation.is_valid())
            .map(|_| check.discount),
        verdict: CouponVerdict::from(check.validation),
    };
    Ok(Json(ApiResponse::success(
        "Coupon checked",
        data,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon applied to the order, or the reason it was not", body = ApiResponse<ApplyCouponResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Usage could not be recorded; no discount was granted"),
    ),
    security(("bearer_auth" = [])),
    tag = "Coupons"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<ApplyCouponResponse>>> {
    let outcome = coupon_service::apply(&state, &user, &payload.code, &payload.order).await?;

    let (message, data) = match outcome {
        ApplyOutcome::Applied(applied) => (
            "Coupon applied",
            ApplyCouponResponse {
                verdict: CouponVerdict::from(CouponValidation::Valid),
                applied: Some(applied),
            },
        ),
        ApplyOutcome::Rejected(validation) => (
            "Coupon rejected",
            ApplyCouponResponse {
                verdict: CouponVerdict::from(validation),
                applied: None,
            },
        ),
    };
    Ok(Json(ApiResponse::success(message, data, Some(Meta::empty()))))
}
