use crate::core::fetcher::PageFetcher;
use crate::domain::model::{Listing, Offer, ProductDetails, ProxyConfig, ShopConfig};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Pluggable per-shop scraping capability: search for candidates, then extract
/// structured details from a listing page. Implementations hold no mutable
/// state; a fresh network session is handed in per task.
#[async_trait]
pub trait ShopStrategy: Send + Sync {
    fn config(&self) -> &ShopConfig;

    /// Fetch one search-results page and extract candidate listings in page
    /// order. Items missing a name, URL or parseable price are skipped;
    /// extraction continues with the remaining items.
    async fn search(&self, session: &PageFetcher, search_terms: &[String]) -> Vec<Listing>;

    /// Fetch one listing page and extract offer fields. `None` when the page
    /// is unfetchable or carries no parseable price.
    async fn product_details(&self, session: &PageFetcher, url: &str) -> Option<ProductDetails>;

    /// Search, take the first candidate as returned by the listing page (no
    /// re-ranking), fetch its details and assemble a validated offer. Any
    /// stage failing yields `None`, never a partial offer.
    async fn scrape_product(&self, session: &PageFetcher, search_terms: &[String]) -> Option<Offer> {
        let listings = self.search(session, search_terms).await;
        let first = match listings.first() {
            Some(listing) => listing,
            None => {
                tracing::debug!(shop = %self.config().name, "search returned no candidates");
                return None;
            }
        };

        let details = self.product_details(session, &first.url).await?;
        Offer::new(
            &self.config().name,
            &first.url,
            &self.config().home_currency,
            details,
        )
    }
}

/// Proxy configuration source. Called at most once per task; usage is
/// reported back via `mark_used` and not otherwise depended on.
#[async_trait]
pub trait ProxyProvider: Send + Sync {
    async fn available_proxy(&self) -> Result<Option<ProxyConfig>>;

    async fn mark_used(&self, proxy: &ProxyConfig) -> Result<()>;
}

/// Append-only persistence sink for winning offers. Called exactly once per
/// successfully resolved task, never for empty outcomes.
#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn record_offer(&self, task_id: &str, offer: &Offer) -> Result<()>;
}
