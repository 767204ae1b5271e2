use crate::{
    dto::checkout::{CheckoutQuote, CheckoutQuoteRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    pricing::coupons::CouponVerdict,
    services::{coupon_service, delivery_service},
    state::AppState,
};

/// Prices an order end to end without committing anything.
///
/// A valid free-shipping coupon waives the delivery fee; any other valid coupon
/// reduces the subtotal. One coupon per order, so kinds never stack.
pub async fn quote_checkout(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CheckoutQuoteRequest,
) -> AppResult<CheckoutQuote> {
    if payload.subtotal < 0 {
        return Err(AppError::BadRequest("subtotal must not be negative".into()));
    }

    let delivery =
        delivery_service::resolve(state, &payload.city, payload.country.as_deref()).await?;

    let code = payload
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());
    let (coupon, discount, free_shipping) = match code {
        Some(code) => {
            let check =
                coupon_service::check(state, code, user, Some(payload.subtotal), &payload.lines)
                    .await?;
            let free_shipping = check.free_shipping();
            (
                Some(CouponVerdict::from(check.validation)),
                check.discount,
                free_shipping,
            )
        }
        None => (None, 0, false),
    };

    let shipping_fee = if free_shipping { 0 } else { delivery.fee };
    let total = (payload.subtotal - discount).max(0) + shipping_fee;

    Ok(CheckoutQuote {
        subtotal: payload.subtotal,
        delivery,
        coupon,
        discount,
        shipping_fee,
        total,
    })
}
