use crate::domain::model::Offer;
use crate::domain::ports::OfferStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Serialize)]
struct OfferRow<'a> {
    task_id: &'a str,
    #[serde(flatten)]
    offer: &'a Offer,
}

/// Append-only offer history: one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonlOfferStore {
    path: PathBuf,
}

impl JsonlOfferStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OfferStore for JsonlOfferStore {
    async fn record_offer(&self, task_id: &str, offer: &Offer) -> Result<()> {
        let line = serde_json::to_string(&OfferRow { task_id, offer })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::debug!(task = task_id, path = %self.path.display(), "offer appended");
        Ok(())
    }
}

/// In-memory offer store for tests and embedding.
#[derive(Clone, Default)]
pub struct MemoryOfferStore {
    offers: Arc<Mutex<Vec<(String, Offer)>>>,
}

impl MemoryOfferStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded(&self) -> Vec<(String, Offer)> {
        self.offers.lock().await.clone()
    }
}

#[async_trait]
impl OfferStore for MemoryOfferStore {
    async fn record_offer(&self, task_id: &str, offer: &Offer) -> Result<()> {
        let mut offers = self.offers.lock().await;
        offers.push((task_id.to_string(), offer.clone()));
        Ok(())
    }
}
