use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    config::PricingConfig,
    db::OrmConn,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub pricing: Arc<PricingConfig>,
    pub clock: Arc<dyn Clock>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(orm: OrmConn, pricing: PricingConfig, jwt_secret: &str) -> Self {
        Self {
            orm,
            pricing: Arc::new(pricing),
            clock: Arc::new(SystemClock),
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
