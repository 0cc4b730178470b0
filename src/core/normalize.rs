//! Locale-aware normalization of price and shipping free text.
//!
//! Shop pages render prices in mixed European formats (`1.234,56 €`,
//! `EUR 19.99`, `ab 4,90€`). Everything here is pure and total: unparseable
//! input yields `None`, never zero and never an error, so callers can tell
//! "no price found" apart from a zero-priced item.

use regex::Regex;
use std::sync::OnceLock;

/// Parse currency/locale-ambiguous numeric text into a canonical value.
///
/// Strips every character that is not a digit, comma or period. A comma, when
/// present, is the decimal separator and periods are thousands separators;
/// without a comma the period (if any) is taken as the decimal separator.
pub fn normalize_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let canonical = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    canonical.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Shipping cost and delivery time extracted from a free-text shipping block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShippingInfo {
    pub cost: Option<f64>,
    pub time: Option<String>,
}

fn shipping_cost_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Versandkosten:?\s*([\d.,]+)\s*€").expect("valid shipping cost pattern")
    })
}

fn shipping_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Lieferzeit:?\s*([^€\n]+)").expect("valid shipping time pattern")
    })
}

/// Pattern-extract shipping cost and delivery time from a shipping block.
/// Either field is independently absent when its phrase is not recognized.
pub fn parse_shipping_block(text: &str) -> ShippingInfo {
    let cost = shipping_cost_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|matched| normalize_price(matched.as_str()));

    let time = shipping_time_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|matched| matched.as_str().trim().to_string())
        .filter(|time| !time.is_empty());

    ShippingInfo { cost, time }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_german_thousands_format() {
        assert_eq!(normalize_price("1.234,56"), Some(1234.56));
        assert_eq!(normalize_price("€ 1.234,56"), Some(1234.56));
        assert_eq!(normalize_price("ab 12,90€"), Some(12.90));
    }

    #[test]
    fn parses_plain_decimal_format() {
        assert_eq!(normalize_price("19.99"), Some(19.99));
        assert_eq!(normalize_price("$19.99"), Some(19.99));
        assert_eq!(normalize_price("1299"), Some(1299.0));
    }

    #[test]
    fn unparseable_text_is_absent_not_zero() {
        assert_eq!(normalize_price("abc"), None);
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("   "), None);
        assert_eq!(normalize_price("€ ,."), None);
        assert_eq!(normalize_price("..,,"), None);
    }

    #[test]
    fn never_panics_on_arbitrary_input() {
        for text in ["\0\0", "🦀🦀🦀", ",", ".", "1,2,3", "1.2.3", "999999999999999999999"] {
            let _ = normalize_price(text);
        }
    }

    #[test]
    fn canonical_rendering_round_trips() {
        for text in ["1.234,56", "19.99", "0,99", "12.345.678,90"] {
            let value = normalize_price(text).expect("parseable");
            let rendered = format!("{:.2}", value);
            assert_eq!(normalize_price(&rendered), Some(value));
        }
    }

    #[test]
    fn extracts_shipping_cost_and_time() {
        let info = parse_shipping_block("Versandkosten: 4,99 € Lieferzeit: 2-3 Werktage");
        assert_eq!(info.cost, Some(4.99));
        assert_eq!(info.time.as_deref(), Some("2-3 Werktage"));
    }

    #[test]
    fn shipping_fields_are_independently_absent() {
        let info = parse_shipping_block("Lieferzeit: sofort lieferbar");
        assert_eq!(info.cost, None);
        assert_eq!(info.time.as_deref(), Some("sofort lieferbar"));

        let info = parse_shipping_block("Versandkosten 5,90 €");
        assert_eq!(info.cost, Some(5.90));
        assert_eq!(info.time, None);

        assert_eq!(parse_shipping_block("kostenlose Abholung"), ShippingInfo::default());
    }
}
