use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub use crate::entity::coupons::DiscountKind;
use crate::models::{Coupon, OrderLine};

/// Outcome of checking a coupon against a user and an order.
///
/// Everything except `Valid` is an expected business-rule rejection; the
/// reason is meant to be shown to the shopper as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponValidation {
    Valid,
    NotFound,
    NotActive,
    NotYetValid,
    Expired,
    UsageLimitReached,
    PerUserLimitReached,
    NotValidForAccount,
    MinimumOrderNotMet { minimum: i64 },
    NotApplicableToProducts,
    AlreadyAppliedToOrder,
}

impl CouponValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, CouponValidation::Valid)
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CouponValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouponValidation::Valid => f.write_str("Coupon is valid"),
            CouponValidation::NotFound => f.write_str("Coupon not found"),
            CouponValidation::NotActive => f.write_str("Coupon is no longer active"),
            CouponValidation::NotYetValid => f.write_str("Coupon is not yet valid"),
            CouponValidation::Expired => f.write_str("Coupon has expired"),
            CouponValidation::UsageLimitReached => f.write_str("Coupon usage limit reached"),
            CouponValidation::PerUserLimitReached => {
                f.write_str("Coupon per-user limit reached")
            }
            CouponValidation::NotValidForAccount => {
                f.write_str("Coupon is not valid for this account")
            }
            CouponValidation::MinimumOrderNotMet { minimum } => {
                write!(f, "Minimum order amount not met ({minimum} required)")
            }
            CouponValidation::NotApplicableToProducts => {
                f.write_str("Coupon is not applicable to the products in this order")
            }
            CouponValidation::AlreadyAppliedToOrder => {
                f.write_str("Coupon has already been applied to this order")
            }
        }
    }
}

/// Wire form of a [`CouponValidation`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CouponVerdict {
    pub is_valid: bool,
    pub reason: String,
}

impl From<CouponValidation> for CouponVerdict {
    fn from(validation: CouponValidation) -> Self {
        Self {
            is_valid: validation.is_valid(),
            reason: validation.reason(),
        }
    }
}

/// A user together with how many times they already used the coupon.
#[derive(Debug, Clone, Copy)]
pub struct UserUsage {
    pub user_id: Uuid,
    pub prior_uses: u64,
}

/// Runs the checks in a fixed order and reports the first one that fails.
pub fn validate_coupon(
    coupon: &Coupon,
    now: DateTime<Utc>,
    user: Option<UserUsage>,
    order_amount: Option<i64>,
    lines: &[OrderLine],
) -> CouponValidation {
    if !coupon.is_active {
        return CouponValidation::NotActive;
    }
    if now < coupon.valid_from {
        return CouponValidation::NotYetValid;
    }
    if now > coupon.valid_until {
        return CouponValidation::Expired;
    }
    if coupon.used_count >= coupon.max_uses {
        return CouponValidation::UsageLimitReached;
    }
    if let Some(usage) = user {
        if usage.prior_uses >= u64::try_from(coupon.max_uses_per_user.max(0)).unwrap_or_default() {
            return CouponValidation::PerUserLimitReached;
        }
    }
    // An anonymous caller is a member of no account scope.
    if !coupon.user_ids.is_empty()
        && !user.is_some_and(|usage| coupon.user_ids.contains(&usage.user_id))
    {
        return CouponValidation::NotValidForAccount;
    }
    if order_amount.is_some_and(|amount| amount < coupon.min_order_amount) {
        return CouponValidation::MinimumOrderNotMet {
            minimum: coupon.min_order_amount,
        };
    }
    if coupon.is_product_scoped() && !lines.is_empty() && !lines.iter().any(|l| in_scope(coupon, l)) {
        return CouponValidation::NotApplicableToProducts;
    }
    CouponValidation::Valid
}

fn in_scope(coupon: &Coupon, line: &OrderLine) -> bool {
    coupon.product_ids.contains(&line.product_id)
        || line
            .category_id
            .is_some_and(|category| coupon.category_ids.contains(&category))
}

/// Part of the order the discount is computed on.
///
/// Unscoped coupons, or orders whose lines are unknown, discount the whole amount.
pub fn eligible_amount(coupon: &Coupon, order_amount: i64, lines: &[OrderLine]) -> i64 {
    if !coupon.is_product_scoped() || lines.is_empty() {
        return order_amount;
    }
    let scoped: i64 = lines
        .iter()
        .filter(|line| in_scope(coupon, line))
        .map(|line| line.amount.max(0))
        .sum();
    scoped.min(order_amount)
}

/// Discount granted on `order_amount`. Never negative, never above the amount.
///
/// Free shipping discounts nothing here; the caller waives the delivery fee.
pub fn calculate_discount(coupon: &Coupon, order_amount: i64) -> i64 {
    let order_amount = order_amount.max(0);
    let discount = match coupon.discount_kind {
        DiscountKind::Percentage => {
            let raw = i128::from(order_amount) * i128::from(coupon.discount_value) / 100;
            let raw = i64::try_from(raw).unwrap_or(i64::MAX);
            match coupon.max_discount_amount {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        DiscountKind::Fixed => coupon.discount_value,
        DiscountKind::FreeShipping => 0,
    };
    discount.clamp(0, order_amount)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn coupon(kind: DiscountKind, value: i64) -> Coupon {
        Coupon {
            id: Uuid::new_v4(),
            code: "WELCOME".into(),
            discount_kind: kind,
            discount_value: value,
            min_order_amount: 0,
            max_discount_amount: None,
            max_uses: 10,
            used_count: 0,
            max_uses_per_user: 1,
            valid_from: t0(),
            valid_until: t0() + Duration::days(30),
            is_active: true,
            product_ids: vec![],
            category_ids: vec![],
            user_ids: vec![],
            created_at: t0(),
        }
    }

    fn now() -> DateTime<Utc> {
        t0() + Duration::days(1)
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let c = coupon(DiscountKind::Fixed, 1000);
        assert!(validate_coupon(&c, c.valid_from, None, None, &[]).is_valid());
        assert!(validate_coupon(&c, c.valid_until, None, None, &[]).is_valid());
        assert_eq!(
            validate_coupon(&c, c.valid_from - Duration::seconds(1), None, None, &[]),
            CouponValidation::NotYetValid
        );
        assert_eq!(
            validate_coupon(&c, c.valid_until + Duration::seconds(1), None, None, &[]),
            CouponValidation::Expired
        );
    }

    #[test]
    fn first_failing_check_wins() {
        let mut c = coupon(DiscountKind::Fixed, 1000);
        c.is_active = false;
        c.used_count = 10;
        c.min_order_amount = 50_000;
        assert_eq!(
            validate_coupon(&c, t0() - Duration::days(1), None, Some(1), &[]),
            CouponValidation::NotActive
        );

        c.is_active = true;
        assert_eq!(
            validate_coupon(&c, t0() - Duration::days(1), None, Some(1), &[]),
            CouponValidation::NotYetValid
        );
        assert_eq!(
            validate_coupon(&c, now(), None, Some(1), &[]),
            CouponValidation::UsageLimitReached
        );

        c.used_count = 0;
        let user = UserUsage {
            user_id: Uuid::new_v4(),
            prior_uses: 1,
        };
        assert_eq!(
            validate_coupon(&c, now(), Some(user), Some(1), &[]),
            CouponValidation::PerUserLimitReached
        );
        assert_eq!(
            validate_coupon(&c, now(), None, Some(1), &[]),
            CouponValidation::MinimumOrderNotMet { minimum: 50_000 }
        );
        assert!(validate_coupon(&c, now(), None, None, &[]).is_valid());
    }

    #[test]
    fn user_scoping_rejects_other_accounts() {
        let allowed = Uuid::new_v4();
        let mut c = coupon(DiscountKind::Percentage, 10);
        c.user_ids = vec![allowed];

        let other = UserUsage {
            user_id: Uuid::new_v4(),
            prior_uses: 0,
        };
        let verdict = validate_coupon(&c, now(), Some(other), Some(100_000), &[]);
        assert_eq!(verdict, CouponValidation::NotValidForAccount);
        assert_eq!(verdict.reason(), "Coupon is not valid for this account");

        let owner = UserUsage {
            user_id: allowed,
            prior_uses: 0,
        };
        assert!(validate_coupon(&c, now(), Some(owner), Some(100_000), &[]).is_valid());

        assert_eq!(
            validate_coupon(&c, now(), None, Some(100_000), &[]),
            CouponValidation::NotValidForAccount
        );
    }

    #[test]
    fn product_scoping_needs_one_line_in_scope() {
        let shoes = Uuid::new_v4();
        let category = Uuid::new_v4();
        let mut c = coupon(DiscountKind::Percentage, 10);
        c.product_ids = vec![shoes];
        c.category_ids = vec![category];

        let unrelated = [OrderLine {
            product_id: Uuid::new_v4(),
            category_id: None,
            amount: 10_000,
        }];
        assert_eq!(
            validate_coupon(&c, now(), None, Some(10_000), &unrelated),
            CouponValidation::NotApplicableToProducts
        );

        let mixed = [
            OrderLine {
                product_id: shoes,
                category_id: None,
                amount: 20_000,
            },
            OrderLine {
                product_id: Uuid::new_v4(),
                category_id: Some(category),
                amount: 5_000,
            },
            OrderLine {
                product_id: Uuid::new_v4(),
                category_id: None,
                amount: 7_000,
            },
        ];
        assert!(validate_coupon(&c, now(), None, Some(32_000), &mixed).is_valid());
        assert_eq!(eligible_amount(&c, 32_000, &mixed), 25_000);
        assert_eq!(eligible_amount(&c, 32_000, &[]), 32_000);
    }

    #[test]
    fn percentage_discount_is_capped() {
        let mut c = coupon(DiscountKind::Percentage, 10);
        c.max_discount_amount = Some(5000);
        assert_eq!(calculate_discount(&c, 100_000), 5000);
        assert_eq!(calculate_discount(&c, 20_000), 2000);
    }

    #[test]
    fn discount_never_exceeds_order_amount() {
        let fixed = coupon(DiscountKind::Fixed, 20_000);
        assert_eq!(calculate_discount(&fixed, 15_000), 15_000);

        let full = coupon(DiscountKind::Percentage, 150);
        assert_eq!(calculate_discount(&full, 8_000), 8_000);
        assert_eq!(calculate_discount(&fixed, -5), 0);
    }

    #[test]
    fn free_shipping_leaves_subtotal_alone() {
        let c = coupon(DiscountKind::FreeShipping, 0);
        assert_eq!(calculate_discount(&c, 42_000), 0);
    }
}
