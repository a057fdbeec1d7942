// src/services/shorten.rs - Business logic
use std::sync::Arc;

use log::{error, info, warn};
use validator::Validate;

use crate::config::Config;
use crate::errors::{ShortenError, StoreError};
use crate::models::{LinkRecord, ShortLink, ShortenRequestDto};
use crate::services::IdAllocator;
use crate::stores::LinkStore;
use crate::validations::{describe, normalize_custom_domain, normalize_long_url};

type Result<T> = std::result::Result<T, ShortenError>;

/// A validated shorten request
#[derive(Debug, Clone, PartialEq)]
pub enum ShortenRequest {
    Single {
        long_url: String,
        custom_domain: Option<String>,
        custom_alias: Option<String>,
    },
    Bulk {
        long_urls: Vec<String>,
        custom_domain: Option<String>,
    },
}

impl TryFrom<ShortenRequestDto> for ShortenRequest {
    type Error = ShortenError;

    fn try_from(dto: ShortenRequestDto) -> Result<Self> {
        dto.validate()?;

        let custom_domain = non_blank(dto.custom_domain);
        let custom_alias = non_blank(dto.custom_alias);

        match (dto.long_url, dto.long_urls) {
            (Some(_), Some(_)) => Err(ShortenError::Validation(
                "Provide either longUrl or longUrls, not both".to_string(),
            )),
            (None, None) => Err(ShortenError::Validation("URL is required".to_string())),
            (Some(long_url), None) => Ok(ShortenRequest::Single {
                long_url,
                custom_domain,
                custom_alias,
            }),
            (None, Some(long_urls)) => {
                if custom_alias.is_some() {
                    return Err(ShortenError::Validation(
                        "customAlias cannot be combined with longUrls".to_string(),
                    ));
                }
                Ok(ShortenRequest::Bulk {
                    long_urls,
                    custom_domain,
                })
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Result of one item of a bulk request
#[derive(Debug)]
pub enum BulkOutcome {
    Shortened(ShortLink),
    Failed {
        long_url: String,
        error: ShortenError,
    },
}

#[derive(Debug)]
pub enum ShortenOutcome {
    Single(ShortLink),
    Bulk(Vec<BulkOutcome>),
}

/// How short URLs are formatted when no custom domain is requested
#[derive(Debug, Clone)]
pub struct ShortenSettings {
    pub scheme: &'static str,
    pub public_host: Option<String>,
    pub max_attempts: u32,
}

impl ShortenSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scheme: config.app.environment.url_scheme(),
            public_host: config.shortener.public_host.clone(),
            max_attempts: config.shortener.max_attempts,
        }
    }
}

pub struct ShortenService {
    store: Arc<dyn LinkStore>,
    allocator: IdAllocator,
    settings: ShortenSettings,
}

impl ShortenService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        allocator: IdAllocator,
        settings: ShortenSettings,
    ) -> Self {
        Self {
            store,
            allocator,
            settings,
        }
    }

    /// Shortens one URL or a batch.
    ///
    /// `request_host` is the host the request arrived on; it is only used when
    /// neither a custom domain nor a configured public host applies.
    pub async fn shorten(
        &self,
        request: ShortenRequest,
        request_host: &str,
    ) -> Result<ShortenOutcome> {
        match request {
            ShortenRequest::Single {
                long_url,
                custom_domain,
                custom_alias,
            } => {
                let domain = Self::domain_base(custom_domain.as_deref())?;
                let link = self
                    .shorten_one(
                        &long_url,
                        domain.as_deref(),
                        custom_alias.as_deref(),
                        request_host,
                    )
                    .await?;
                Ok(ShortenOutcome::Single(link))
            }
            ShortenRequest::Bulk {
                long_urls,
                custom_domain,
            } => {
                let domain = Self::domain_base(custom_domain.as_deref())?;

                // Items succeed or fail independently, in input order
                let mut outcomes = Vec::with_capacity(long_urls.len());
                for long_url in long_urls {
                    let outcome = match self
                        .shorten_one(&long_url, domain.as_deref(), None, request_host)
                        .await
                    {
                        Ok(link) => BulkOutcome::Shortened(link),
                        Err(error) => {
                            warn!("Bulk item '{}' failed: {}", long_url, error);
                            BulkOutcome::Failed { long_url, error }
                        }
                    };
                    outcomes.push(outcome);
                }

                Ok(ShortenOutcome::Bulk(outcomes))
            }
        }
    }

    async fn shorten_one(
        &self,
        raw_url: &str,
        domain: Option<&str>,
        alias: Option<&str>,
        request_host: &str,
    ) -> Result<ShortLink> {
        let long_url =
            normalize_long_url(raw_url).map_err(|e| ShortenError::Validation(describe(&e)))?;

        let has_alias = alias.map(|a| !a.trim().is_empty()).unwrap_or(false);
        let record = if has_alias {
            self.insert_with_alias(alias, long_url, domain).await?
        } else {
            self.insert_with_random_id(long_url, domain).await?
        };

        let short_url = self.short_url(domain, request_host, &record.short_id);
        info!("Shortened '{}' -> '{}'", record.long_url, short_url);

        Ok(ShortLink {
            id: record.short_id,
            short_url,
            long_url: record.long_url,
        })
    }

    /// An explicit alias is tried exactly once; a collision is final
    async fn insert_with_alias(
        &self,
        alias: Option<&str>,
        long_url: String,
        domain: Option<&str>,
    ) -> Result<LinkRecord> {
        let short_id = self.allocator.allocate(alias)?;
        let record = LinkRecord::new(short_id, long_url, domain.map(String::from));

        match self.store.insert_if_absent(&record).await {
            Ok(()) => Ok(record),
            Err(StoreError::Conflict(_)) => {
                info!("Alias '{}' is already taken", record.short_id);
                Err(ShortenError::AliasTaken(record.short_id))
            }
            Err(e) => {
                error!("Failed to store alias '{}': {}", record.short_id, e);
                Err(e.into())
            }
        }
    }

    async fn insert_with_random_id(
        &self,
        long_url: String,
        domain: Option<&str>,
    ) -> Result<LinkRecord> {
        let attempts = self.settings.max_attempts;

        for attempt in 1..=attempts {
            let short_id = self.allocator.allocate(None)?;
            let record = LinkRecord::new(short_id, long_url.clone(), domain.map(String::from));

            match self.store.insert_if_absent(&record).await {
                Ok(()) => return Ok(record),
                Err(StoreError::Conflict(_)) => {
                    warn!(
                        "Short id '{}' collided (attempt {}/{})",
                        record.short_id, attempt, attempts
                    );
                }
                Err(e) => {
                    error!("Failed to store short id '{}': {}", record.short_id, e);
                    return Err(e.into());
                }
            }
        }

        error!("Gave up allocating a short id after {} attempts", attempts);
        Err(ShortenError::AllocationExhausted { attempts })
    }

    fn domain_base(custom_domain: Option<&str>) -> Result<Option<String>> {
        custom_domain
            .map(|domain| {
                normalize_custom_domain(domain).map_err(|e| ShortenError::Validation(describe(&e)))
            })
            .transpose()
    }

    fn short_url(&self, domain: Option<&str>, request_host: &str, short_id: &str) -> String {
        match domain {
            Some(base) => format!("{}/{}", base, short_id),
            None => {
                let host = self.settings.public_host.as_deref().unwrap_or(request_host);
                format!("{}://{}/{}", self.settings.scheme, host, short_id)
            }
        }
    }
}
