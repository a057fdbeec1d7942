mod link;

pub use link::{describe, normalize_custom_domain, normalize_long_url, validate_custom_alias};
