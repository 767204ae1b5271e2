//! Pure pricing decisions: no storage, no clock reads.
//!
//! Services load the state they need, call into here, then persist the outcome.

pub mod coupons;
pub mod zones;
