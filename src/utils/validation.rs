use crate::utils::error::{Result, ScrapeError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ScrapeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScrapeError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_url("base_url", "https://geizhals.de").is_ok());
        assert!(validate_url("base_url", "http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(validate_url("base_url", "ftp://example.com").is_err());
        assert!(validate_url("base_url", "not a url").is_err());
        assert!(validate_url("base_url", "").is_err());
    }

    #[test]
    fn rejects_blank_required_fields() {
        assert!(validate_non_empty("name", "geizhals").is_ok());
        assert!(validate_non_empty("name", "  ").is_err());
    }

    #[test]
    fn enforces_minimum_values() {
        assert!(validate_positive_number("max_attempts", 3, 1).is_ok());
        assert!(validate_positive_number("max_attempts", 0, 1).is_err());
    }
}
