#[cfg(feature = "cli")]
pub mod cli;

use crate::core::fetcher::FetchPolicy;
use crate::domain::model::{ProxyConfig, SearchTask, ShopConfig};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{validate_non_empty, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration, loaded once from a TOML file at startup.
/// Shops, proxies and tasks are static inputs for the whole run; nothing is
/// reloaded mid-task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default)]
    pub shops: Vec<ShopConfig>,
    #[serde(default)]
    pub proxies: Vec<ProxyConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeSettings {
    pub request_timeout_seconds: Option<u64>,
    pub max_attempts: Option<u32>,
    pub initial_backoff_seconds: Option<u64>,
    pub task_delay_seconds: Option<u64>,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    pub search_terms: Vec<String>,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        let defaults = FetchPolicy::default();
        FetchPolicy {
            max_attempts: self.scrape.max_attempts.unwrap_or(defaults.max_attempts),
            request_timeout: self
                .scrape
                .request_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            initial_backoff: self
                .scrape
                .initial_backoff_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.initial_backoff),
        }
    }

    pub fn task_delay(&self) -> Duration {
        Duration::from_secs(self.scrape.task_delay_seconds.unwrap_or(5))
    }

    pub fn output_path(&self) -> &str {
        self.scrape.output_path.as_deref().unwrap_or("offers.jsonl")
    }

    pub fn tasks(&self) -> Vec<SearchTask> {
        self.tasks
            .iter()
            .map(|task| SearchTask {
                id: task.id.clone(),
                search_terms: task.search_terms.clone(),
            })
            .collect()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        for shop in &self.shops {
            validate_non_empty("shops.name", &shop.name)?;
            if let Some(base_url) = &shop.base_url {
                validate_url("shops.base_url", base_url)?;
            }
        }

        for proxy in &self.proxies {
            validate_non_empty("proxies.host", &proxy.host)?;
        }

        for task in &self.tasks {
            validate_non_empty("tasks.id", &task.id)?;
            if task.search_terms.is_empty() {
                return Err(ScrapeError::InvalidConfigValueError {
                    field: "tasks.search_terms".to_string(),
                    value: task.id.clone(),
                    reason: "task needs at least one search term".to_string(),
                });
            }
        }

        if let Some(attempts) = self.scrape.max_attempts {
            if attempts < 1 {
                return Err(ScrapeError::InvalidConfigValueError {
                    field: "scrape.max_attempts".to_string(),
                    value: attempts.to_string(),
                    reason: "Value must be at least 1".to_string(),
                });
            }
        }

        Ok(())
    }
}
