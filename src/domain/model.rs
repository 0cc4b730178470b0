use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// One shop's validated price/availability record for a product at a point in time.
///
/// An `Offer` is immutable once constructed and only exists with a positive,
/// finite price; [`Offer::new`] returns `None` otherwise. Callers never see a
/// partially valid or default-filled offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub shop_name: String,
    pub price: f64,
    pub currency: String,
    pub url: String,
    pub in_stock: bool,
    pub shipping_cost: Option<f64>,
    pub shipping_time: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(
        shop_name: &str,
        url: &str,
        home_currency: &str,
        details: ProductDetails,
    ) -> Option<Self> {
        if shop_name.is_empty() || !details.price.is_finite() || details.price <= 0.0 {
            return None;
        }
        Some(Self {
            shop_name: shop_name.to_string(),
            price: details.price,
            currency: details
                .currency
                .unwrap_or_else(|| home_currency.to_string()),
            url: url.to_string(),
            in_stock: details.in_stock,
            shipping_cost: details.shipping_cost,
            shipping_time: details.shipping_time,
            observed_at: Utc::now(),
        })
    }
}

/// One candidate from a shop's search-results page, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub url: String,
    pub price: f64,
}

/// Raw extraction result from a product detail page, before it is merged with
/// the shop's identity into an [`Offer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub price: f64,
    pub currency: Option<String>,
    pub in_stock: bool,
    pub shipping_cost: Option<f64>,
    pub shipping_time: Option<String>,
}

impl ProductDetails {
    pub fn new(price: f64) -> Self {
        Self {
            price,
            currency: None,
            in_stock: true,
            shipping_cost: None,
            shipping_time: None,
        }
    }
}

/// One logical "find the best price" request spanning all active strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTask {
    pub id: String,
    pub search_terms: Vec<String>,
}

/// Static per-shop configuration record, provided at orchestration-setup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub requires_proxy: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_currency")]
    pub home_currency: String,
}

impl ShopConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            requires_proxy: false,
            base_url: None,
            home_currency: default_currency(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_proxy_requirement(mut self, requires_proxy: bool) -> Self {
        self.requires_proxy = requires_proxy;
        self
    }
}

/// Network egress descriptor. The core treats this as an opaque fetch
/// parameter owned by the proxy configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
