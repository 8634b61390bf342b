use std::sync::Arc;

use crate::external::price_provider::PriceProvider;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceProvider>,
}

impl AppState {
    pub fn new(price_provider: Arc<dyn PriceProvider>) -> Self {
        Self { price_provider }
    }
}
