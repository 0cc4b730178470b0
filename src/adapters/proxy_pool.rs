use crate::domain::model::ProxyConfig;
use crate::domain::ports::ProxyProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

struct PoolEntry {
    proxy: ProxyConfig,
    last_used: Option<DateTime<Utc>>,
}

/// In-memory proxy configuration source with least-recently-used selection.
/// Never-used entries are handed out before any used one; there is no
/// fairness or retirement policy beyond that.
pub struct ProxyPool {
    entries: Mutex<Vec<PoolEntry>>,
}

impl ProxyPool {
    pub fn new(proxies: Vec<ProxyConfig>) -> Self {
        Self {
            entries: Mutex::new(
                proxies
                    .into_iter()
                    .map(|proxy| PoolEntry {
                        proxy,
                        last_used: None,
                    })
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ProxyProvider for ProxyPool {
    async fn available_proxy(&self) -> Result<Option<ProxyConfig>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .min_by_key(|entry| entry.last_used)
            .map(|entry| entry.proxy.clone()))
    }

    async fn mark_used(&self, proxy: &ProxyConfig) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries
            .iter_mut()
            .find(|entry| entry.proxy.host == proxy.host && entry.proxy.port == proxy.port)
        {
            entry.last_used = Some(Utc::now());
        }
        Ok(())
    }
}
