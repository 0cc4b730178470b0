//! Shop strategy registry. New shops are added by implementing
//! [`ShopStrategy`](crate::domain::ports::ShopStrategy) and registering the
//! shop name here.

pub mod geizhals;

pub use geizhals::GeizhalsScraper;

use crate::domain::model::ShopConfig;
use crate::domain::ports::ShopStrategy;
use std::sync::Arc;

/// Build the strategy registered under a shop config's name. Unknown shops
/// are skipped with a warning rather than failing the whole setup.
pub fn build_strategy(config: ShopConfig) -> Option<Arc<dyn ShopStrategy>> {
    match config.name.as_str() {
        "geizhals" => match GeizhalsScraper::new(config) {
            Ok(strategy) => Some(Arc::new(strategy)),
            Err(err) => {
                tracing::error!(error = %err, "failed to build geizhals strategy");
                None
            }
        },
        other => {
            tracing::warn!(shop = other, "no strategy registered for shop");
            None
        }
    }
}

/// Instantiate strategies for every active shop config.
pub fn build_strategies(configs: Vec<ShopConfig>) -> Vec<Arc<dyn ShopStrategy>> {
    configs
        .into_iter()
        .filter(|config| config.active)
        .filter_map(build_strategy)
        .collect()
}
