// Adapters layer: concrete implementations of the domain ports for external
// systems (persistence sink, proxy configuration source).

pub mod offer_store;
pub mod proxy_pool;

pub use offer_store::{JsonlOfferStore, MemoryOfferStore};
pub use proxy_pool::ProxyPool;
