//! Multi-shop fan-out/reduce orchestration.
//!
//! One [`SearchTask`] fans out across every configured strategy concurrently
//! and reduces the collected offers to the single cheapest one. Strategies are
//! isolated: a panic or empty result in one never blocks or cancels the
//! others, and reduction only runs once every strategy has completed or been
//! abandoned.

use crate::core::fetcher::{FetchPolicy, PageFetcher};
use crate::domain::model::{Offer, ProxyConfig, SearchTask};
use crate::domain::ports::{OfferStore, ProxyProvider, ShopStrategy};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub fetch_policy: FetchPolicy,
    /// Inter-task delay in batch mode, bounding the aggregate request rate
    /// against all shops combined.
    pub task_delay: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            fetch_policy: FetchPolicy::default(),
            task_delay: Duration::from_secs(5),
        }
    }
}

pub struct Orchestrator<P: ProxyProvider, R: OfferStore> {
    strategies: Vec<Arc<dyn ShopStrategy>>,
    proxies: P,
    store: R,
    settings: OrchestratorSettings,
}

impl<P: ProxyProvider, R: OfferStore> Orchestrator<P, R> {
    pub fn new(
        strategies: Vec<Arc<dyn ShopStrategy>>,
        proxies: P,
        store: R,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            strategies,
            proxies,
            store,
            settings,
        }
    }

    /// Run every strategy for the task concurrently and record the cheapest
    /// valid offer. `None` is a defined empty outcome, not an error: no
    /// listing found anywhere, or the winning offer could not be persisted.
    pub async fn scrape_best(&self, task: &SearchTask) -> Option<Offer> {
        let proxy = self.obtain_proxy().await;

        let mut handles = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let strategy = Arc::clone(strategy);
            let proxy = if strategy.config().requires_proxy {
                proxy.clone()
            } else {
                None
            };
            let search_terms = task.search_terms.clone();
            let policy = self.settings.fetch_policy;

            // Each strategy owns its session for the task's duration.
            handles.push(tokio::spawn(async move {
                let session = match PageFetcher::new(policy, proxy.as_ref()) {
                    Ok(session) => session,
                    Err(err) => {
                        tracing::error!(
                            shop = %strategy.config().name,
                            error = %err,
                            "failed to open scrape session"
                        );
                        return None;
                    }
                };
                strategy.scrape_product(&session, &search_terms).await
            }));
        }

        let mut offers = Vec::new();
        for (strategy, handle) in self.strategies.iter().zip(handles) {
            let shop = &strategy.config().name;
            match handle.await {
                Ok(Some(offer)) => offers.push(offer),
                Ok(None) => {
                    tracing::debug!(shop = %shop, task = %task.id, "no offer from shop")
                }
                Err(err) => tracing::warn!(
                    shop = %shop,
                    task = %task.id,
                    error = %err,
                    "strategy failed unexpectedly"
                ),
            }
        }

        // Cheapest nominal price wins; shipping cost is deliberately not part
        // of the comparison. Ties keep the first-collected offer.
        let best = offers
            .into_iter()
            .min_by(|a, b| a.price.total_cmp(&b.price));

        let Some(best) = best else {
            tracing::warn!(task = %task.id, "no valid offers for task");
            return None;
        };

        if let Err(err) = self.store.record_offer(&task.id, &best).await {
            tracing::error!(task = %task.id, error = %err, "failed to record winning offer");
            return None;
        }

        Some(best)
    }

    /// Process tasks sequentially with a fixed inter-task delay. A task that
    /// resolves empty is logged and the batch continues. Returns the number
    /// of tasks that produced a recorded offer.
    pub async fn run_batch(&self, tasks: &[SearchTask]) -> usize {
        let mut recorded = 0;

        for (index, task) in tasks.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.settings.task_delay).await;
            }

            match self.scrape_best(task).await {
                Some(offer) => {
                    tracing::info!(
                        task = %task.id,
                        shop = %offer.shop_name,
                        price = offer.price,
                        "best offer recorded"
                    );
                    recorded += 1;
                }
                None => tracing::warn!(task = %task.id, "task produced no result"),
            }
        }

        recorded
    }

    /// One proxy descriptor per task, shared by every strategy that declares
    /// the requirement. Provider failures degrade to scraping without a
    /// proxy.
    async fn obtain_proxy(&self) -> Option<ProxyConfig> {
        if !self
            .strategies
            .iter()
            .any(|strategy| strategy.config().requires_proxy)
        {
            return None;
        }

        match self.proxies.available_proxy().await {
            Ok(Some(proxy)) => {
                if let Err(err) = self.proxies.mark_used(&proxy).await {
                    tracing::warn!(error = %err, "failed to mark proxy as used");
                }
                Some(proxy)
            }
            Ok(None) => {
                tracing::warn!("no proxy available, scraping without one");
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "proxy lookup failed");
                None
            }
        }
    }
}
