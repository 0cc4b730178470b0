pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod shops;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::adapters::{JsonlOfferStore, MemoryOfferStore, ProxyPool};
pub use crate::config::AppConfig;
pub use crate::core::fetcher::{FetchPolicy, PageFetcher};
pub use crate::core::orchestrator::{Orchestrator, OrchestratorSettings};
pub use crate::domain::model::{Offer, SearchTask, ShopConfig};
pub use crate::utils::error::{Result, ScrapeError};
