use std::borrow::Cow;

use url::Url;
use validator::ValidationError;

use crate::config::MAX_SHORT_ID_LENGTH;

/// Aliases that would shadow the service's own routes
const RESERVED_ALIASES: &[&str] = &["api", "health"];

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Human readable text for a validation failure
pub fn describe(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

/// Validates that a URL string is properly formatted and uses http/https
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.host().is_none() {
                return Err(invalid("url_host", "URL must have a host"));
            }

            // Only accept HTTP and HTTPS URLs
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(invalid("url_scheme", "URL scheme must be http or https"));
            }

            Ok(())
        }
        Err(_) => Err(invalid("url_format", "Invalid URL format")),
    }
}

/// Trims the input, prefixes `https://` when no scheme is given and checks the result.
/// Returns the string that gets stored, so later lookups see exactly this value.
pub fn normalize_long_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("url_required", "URL is required"));
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    validate_url(&candidate)?;
    Ok(candidate)
}

/// Checks an alias against the url-safe charset:
/// - Between 1 and 32 characters
/// - ASCII letters, digits, hyphens and underscores only
/// - Not a reserved route name
pub fn validate_custom_alias(alias: &str) -> Result<(), ValidationError> {
    if alias.is_empty() || alias.len() > MAX_SHORT_ID_LENGTH {
        return Err(invalid(
            "custom_alias_length",
            "Custom alias must be between 1 and 32 characters",
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "custom_alias_charset",
            "Custom alias can only contain alphanumeric characters, hyphens, and underscores",
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(invalid("custom_alias_reserved", "Custom alias is reserved"));
    }

    Ok(())
}

/// Turns `my.link/` or `HTTP://my.link` into a base like `https://my.link`
/// that a short id can be appended to with a single slash.
pub fn normalize_custom_domain(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let base = with_scheme.trim_end_matches('/').to_string();

    let invalid_domain = || invalid("custom_domain", "Invalid custom domain");
    validate_url(&base).map_err(|_| invalid_domain())?;

    // Anything after `?` or `#` would end up in front of the short id
    let parsed = Url::parse(&base).map_err(|_| invalid_domain())?;
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid_domain());
    }

    Ok(base)
}

fn has_scheme(value: &str) -> bool {
    match value.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        // Valid URLs
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?query=value").is_ok());

        // Invalid URLs
        assert!(validate_url("not-a-url").is_err());
        assert!(validate_url("ftp://example.com").is_err()); // Not http/https
    }

    #[test]
    fn test_normalize_long_url_adds_scheme() {
        assert_eq!(normalize_long_url("example.com").unwrap(), "https://example.com");
        assert_eq!(
            normalize_long_url("  example.com/a?b=c  ").unwrap(),
            "https://example.com/a?b=c"
        );
        assert_eq!(
            normalize_long_url("http://example.com").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_normalize_long_url_keeps_query_with_embedded_url() {
        assert_eq!(
            normalize_long_url("example.com/?next=http://other.org").unwrap(),
            "https://example.com/?next=http://other.org"
        );
    }

    #[test]
    fn test_normalize_long_url_rejects_bad_input() {
        let err = normalize_long_url("   ").unwrap_err();
        assert_eq!(describe(&err), "URL is required");

        assert!(normalize_long_url("ftp://example.com").is_err());
        assert!(normalize_long_url("not a url").is_err());
        assert!(normalize_long_url("https://").is_err());
    }

    #[test]
    fn test_validate_custom_alias() {
        // Valid aliases
        assert!(validate_custom_alias("valid-alias").is_ok());
        assert!(validate_custom_alias("valid_alias123").is_ok());
        assert!(validate_custom_alias(&"a".repeat(32)).is_ok());

        // Invalid aliases
        assert!(validate_custom_alias(&"a".repeat(33)).is_err());
        assert!(validate_custom_alias("").is_err());
        assert!(validate_custom_alias("invalid/alias").is_err());
        assert!(validate_custom_alias("with space").is_err());
        assert!(validate_custom_alias("ünïcode").is_err());
        assert!(validate_custom_alias("a?b").is_err());
    }

    #[test]
    fn test_reserved_aliases() {
        let err = validate_custom_alias("Health").unwrap_err();
        assert_eq!(describe(&err), "Custom alias is reserved");
        assert!(validate_custom_alias("api").is_err());
        assert!(validate_custom_alias("apis").is_ok());
    }

    #[test]
    fn test_normalize_custom_domain() {
        assert_eq!(normalize_custom_domain("my.link").unwrap(), "https://my.link");
        assert_eq!(normalize_custom_domain("my.link/").unwrap(), "https://my.link");
        assert_eq!(normalize_custom_domain(" https://my.link// ").unwrap(), "https://my.link");
        assert_eq!(normalize_custom_domain("HTTP://my.link").unwrap(), "HTTP://my.link");
        assert!(normalize_custom_domain("bad domain").is_err());
    }

    #[test]
    fn test_custom_domain_rejects_query_and_fragment() {
        for domain in ["my.link?x=1", "my.link/?x=1", "https://my.link#top", "my.link?"] {
            assert!(
                normalize_custom_domain(domain).is_err(),
                "{:?} should be rejected",
                domain
            );
        }
        assert_eq!(
            normalize_custom_domain("my.link/go").unwrap(),
            "https://my.link/go"
        );
    }
}
