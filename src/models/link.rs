// src/models/link.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A stored mapping from short id to target URL
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Globally unique key, url-safe, 1-32 chars
    pub short_id: String,

    /// Absolute http(s) URL the short id resolves to
    pub long_url: String,

    /// Normalized `https://host` base the link was issued under, if any
    pub custom_domain: Option<String>,

    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

impl LinkRecord {
    pub fn new(short_id: String, long_url: String, custom_domain: Option<String>) -> Self {
        Self {
            short_id,
            long_url,
            custom_domain,
            created_at: Utc::now(),
        }
    }
}

/// A freshly allocated link as shown to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: String,
    pub short_url: String,
    pub long_url: String,
}

// Body of `POST /api/shorten`
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequestDto {
    pub long_url: Option<String>,

    #[validate(length(
        min = 1,
        max = 100,
        message = "longUrls must contain between 1 and 100 URLs"
    ))]
    pub long_urls: Option<Vec<String>>,

    #[validate(length(max = 253, message = "customDomain is too long"))]
    pub custom_domain: Option<String>,

    pub custom_alias: Option<String>,
}

// Single mode response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponseDto {
    pub short_url: String,
    pub id: String,
}

impl From<ShortLink> for ShortenResponseDto {
    fn from(link: ShortLink) -> Self {
        ShortenResponseDto {
            short_url: link.short_url,
            id: link.id,
        }
    }
}

// One entry of a bulk response, in request order
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulkResultDto {
    #[serde(rename_all = "camelCase")]
    Shortened {
        short_url: String,
        long_url: String,
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    Failed { long_url: String, error: String },
}

// Bulk mode response
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkShortenResponseDto {
    pub results: Vec<BulkResultDto>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const MAX_BULK_URLS: usize = 100;

    #[test]
    fn request_reads_camel_case_fields() {
        let dto: ShortenRequestDto = serde_json::from_value(json!({
            "longUrl": "example.com",
            "customDomain": "my.link",
            "customAlias": "promo"
        }))
        .unwrap();

        assert_eq!(dto.long_url.as_deref(), Some("example.com"));
        assert_eq!(dto.custom_domain.as_deref(), Some("my.link"));
        assert_eq!(dto.custom_alias.as_deref(), Some("promo"));
        assert!(dto.long_urls.is_none());
    }

    #[test]
    fn empty_bulk_list_fails_validation() {
        let dto = ShortenRequestDto {
            long_urls: Some(vec![]),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn oversized_bulk_list_fails_validation() {
        let dto = ShortenRequestDto {
            long_urls: Some(vec!["example.com".to_string(); MAX_BULK_URLS + 1]),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn bulk_results_serialize_per_outcome() {
        let body = BulkShortenResponseDto {
            results: vec![
                BulkResultDto::Shortened {
                    short_url: "https://my.link/abc123".into(),
                    long_url: "https://example.com".into(),
                    id: "abc123".into(),
                },
                BulkResultDto::Failed {
                    long_url: "ht!tp://".into(),
                    error: "Invalid URL format".into(),
                },
            ],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "results": [
                    {
                        "shortUrl": "https://my.link/abc123",
                        "longUrl": "https://example.com",
                        "id": "abc123"
                    },
                    { "longUrl": "ht!tp://", "error": "Invalid URL format" }
                ]
            })
        );
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = LinkRecord::new("abc123".into(), "https://example.com".into(), None);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["shortId"], "abc123");
        assert_eq!(value["longUrl"], "https://example.com");
        assert!(value["customDomain"].is_null());
    }
}
