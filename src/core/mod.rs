pub mod fetcher;
pub mod normalize;
pub mod orchestrator;

pub use crate::domain::model::{Listing, Offer, ProductDetails, SearchTask};
pub use crate::domain::ports::{OfferStore, ProxyProvider, ShopStrategy};
pub use crate::utils::error::Result;
