//! Reference strategy: the Geizhals price-comparison listing.

use crate::core::fetcher::PageFetcher;
use crate::core::normalize::{normalize_price, parse_shipping_block};
use crate::domain::model::{Listing, ProductDetails, ShopConfig};
use crate::domain::ports::ShopStrategy;
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://geizhals.de";

/// Stock phrasing that marks a listing as not orderable. Anything else, or a
/// missing stock block, defaults to in stock.
const OUT_OF_STOCK_PHRASES: [&str; 2] = ["nicht verfügbar", "ausverkauft"];

pub struct GeizhalsScraper {
    config: ShopConfig,
    base_url: Url,
    item_selector: Selector,
    name_selector: Selector,
    price_selector: Selector,
    shipping_selector: Selector,
    stock_selector: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::SelectorError {
        selector: css.to_string(),
    })
}

impl GeizhalsScraper {
    pub fn new(config: ShopConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(Self {
            base_url,
            item_selector: selector("div.productlist__item")?,
            name_selector: selector("div.productlist__productname a")?,
            price_selector: selector("span.gh_price")?,
            shipping_selector: selector("div.gh_shipping_info")?,
            stock_selector: selector("div.gh_stock_info")?,
            config,
        })
    }

    fn search_url(&self, search_terms: &[String]) -> String {
        format!(
            "{}/?fs={}",
            self.base_url.as_str().trim_end_matches('/'),
            search_terms.join("+")
        )
    }

    // scraper::Html is not Send, so all parsing stays in synchronous helpers
    // that drop the document before the caller awaits again.

    fn parse_search_page(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for item in document.select(&self.item_selector) {
            let Some(anchor) = item.select(&self.name_selector).next() else {
                continue;
            };
            let name = anchor.text().collect::<String>().trim().to_string();
            if name.is_empty() {
                continue;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Ok(url) = self.base_url.join(href) else {
                continue;
            };
            let Some(price_element) = item.select(&self.price_selector).next() else {
                continue;
            };
            let price_text = price_element.text().collect::<String>();
            let Some(price) = normalize_price(&price_text) else {
                continue;
            };

            listings.push(Listing {
                name,
                url: url.to_string(),
                price,
            });
        }

        listings
    }

    fn parse_details_page(&self, html: &str) -> Option<ProductDetails> {
        let document = Html::parse_document(html);

        let price_text = document
            .select(&self.price_selector)
            .next()?
            .text()
            .collect::<String>();
        let price = normalize_price(&price_text)?;

        let shipping = document
            .select(&self.shipping_selector)
            .next()
            .map(|block| parse_shipping_block(&block.text().collect::<String>()))
            .unwrap_or_default();

        let in_stock = match document.select(&self.stock_selector).next() {
            Some(block) => {
                let stock_text = block.text().collect::<String>().to_lowercase();
                !OUT_OF_STOCK_PHRASES
                    .iter()
                    .any(|phrase| stock_text.contains(phrase))
            }
            None => true,
        };

        Some(ProductDetails {
            price,
            currency: Some("EUR".to_string()),
            in_stock,
            shipping_cost: shipping.cost,
            shipping_time: shipping.time,
        })
    }
}

#[async_trait]
impl ShopStrategy for GeizhalsScraper {
    fn config(&self) -> &ShopConfig {
        &self.config
    }

    async fn search(&self, session: &PageFetcher, search_terms: &[String]) -> Vec<Listing> {
        let url = self.search_url(search_terms);
        let Some(html) = session.fetch_page(&url).await else {
            return Vec::new();
        };
        self.parse_search_page(&html)
    }

    async fn product_details(&self, session: &PageFetcher, url: &str) -> Option<ProductDetails> {
        let html = session.fetch_page(url).await?;
        self.parse_details_page(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> GeizhalsScraper {
        GeizhalsScraper::new(ShopConfig::new("geizhals")).expect("valid default config")
    }

    const SEARCH_PAGE: &str = r#"
        <html><body>
        <div class="productlist__item">
            <div class="productlist__productname"><a href="/rtx-4070-a1.html">RTX 4070 12GB</a></div>
            <span class="gh_price">€ 599,90</span>
        </div>
        <div class="productlist__item">
            <div class="productlist__productname"><a href="/rtx-4070-b2.html">RTX 4070 OC</a></div>
            <span class="gh_price">ab 1.234,56 €</span>
        </div>
        <div class="productlist__item">
            <div class="productlist__productname"><a href="/no-price.html">Unpriced item</a></div>
            <span class="gh_price">Preis nicht verfügbar</span>
        </div>
        <div class="productlist__item">
            <span class="gh_price">€ 99,00</span>
        </div>
        </body></html>
    "#;

    #[test]
    fn search_page_yields_listings_in_page_order() {
        let listings = scraper().parse_search_page(SEARCH_PAGE);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "RTX 4070 12GB");
        assert_eq!(listings[0].url, "https://geizhals.de/rtx-4070-a1.html");
        assert_eq!(listings[0].price, 599.90);
        assert_eq!(listings[1].price, 1234.56);
    }

    #[test]
    fn items_missing_name_or_price_are_skipped_silently() {
        // The fixture's third item has no parseable price and the fourth has
        // no name link; both are dropped without aborting extraction.
        let listings = scraper().parse_search_page(SEARCH_PAGE);
        assert!(listings.iter().all(|listing| listing.price > 0.0));
        assert!(listings.iter().all(|listing| !listing.name.is_empty()));
    }

    #[test]
    fn details_page_extracts_all_fields() {
        let html = r#"
            <html><body>
            <span class="gh_price">€ 599,90</span>
            <div class="gh_shipping_info">Versandkosten: 4,99 € Lieferzeit: 2-3 Werktage</div>
            <div class="gh_stock_info">lagernd</div>
            </body></html>
        "#;

        let details = scraper().parse_details_page(html).expect("details");
        assert_eq!(details.price, 599.90);
        assert_eq!(details.currency.as_deref(), Some("EUR"));
        assert!(details.in_stock);
        assert_eq!(details.shipping_cost, Some(4.99));
        assert_eq!(details.shipping_time.as_deref(), Some("2-3 Werktage"));
    }

    #[test]
    fn explicit_negative_stock_phrasing_is_recognized() {
        let html = r#"
            <html><body>
            <span class="gh_price">€ 599,90</span>
            <div class="gh_stock_info">Derzeit nicht verfügbar</div>
            </body></html>
        "#;

        let details = scraper().parse_details_page(html).expect("details");
        assert!(!details.in_stock);
    }

    #[test]
    fn stock_defaults_to_true_without_a_stock_block() {
        let html = r#"<html><body><span class="gh_price">19,99 €</span></body></html>"#;
        let details = scraper().parse_details_page(html).expect("details");
        assert!(details.in_stock);
        assert_eq!(details.shipping_cost, None);
        assert_eq!(details.shipping_time, None);
    }

    #[test]
    fn details_without_price_are_absent() {
        let html = r#"<html><body><div class="gh_stock_info">lagernd</div></body></html>"#;
        assert!(scraper().parse_details_page(html).is_none());
    }

    #[test]
    fn search_url_joins_terms_with_plus() {
        let url = scraper().search_url(&["rtx".to_string(), "4070".to_string()]);
        assert_eq!(url, "https://geizhals.de/?fs=rtx+4070");
    }
}
