use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1/";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("max_limit must be at least 1")]
    ZeroMaxLimit,

    #[error("default_limit ({default_limit}) exceeds max_limit ({max_limit})")]
    DefaultAboveMax { default_limit: u32, max_limit: u32 },

    #[error("{0} must be greater than 0")]
    ZeroDuration(&'static str),

    #[error("upstream base_url cannot be used as a base: {0}")]
    InvalidBaseUrl(Url),
}

/// Collection configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub upstream: Upstream,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub pagination: Pagination,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.upstream.base_url.cannot_be_a_base() {
            return Err(ValidationError::InvalidBaseUrl(
                self.upstream.base_url.clone(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ValidationError::ZeroDuration("upstream.timeout_secs"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ValidationError::ZeroDuration("cache.ttl_secs"));
        }

        self.pagination.validate()
    }
}

/// The museum API the gateway reads from
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Upstream {
    /// Root of the collection API; `objects` and `objects/{id}` are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Applies to the whole request, body included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Response cache keyed by request URL
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Cache {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            ttl_secs: default_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

/// Page size policy for `allObjects`.
///
/// Every object in a page costs one upstream request, so `max_limit` caps
/// both the page size and the per-query fan-out.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Pagination {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_limit == 0 {
            return Err(ValidationError::ZeroMaxLimit);
        }
        if self.default_limit > self.max_limit {
            return Err(ValidationError::DefaultAboveMax {
                default_limit: self.default_limit,
                max_limit: self.max_limit,
            });
        }
        Ok(())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_ttl_secs() -> u64 {
    60 * 60 * 24
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.upstream.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.cache.ttl_secs, 86400);
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.pagination.max_limit, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_overrides() {
        let yaml = r#"
upstream:
    base_url: "http://127.0.0.1:9000/v1/"
    timeout_secs: 3
cache:
    ttl_secs: 60
pagination:
    max_limit: 5
    default_limit: 5
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.upstream.base_url.as_str(), "http://127.0.0.1:9000/v1/");
        assert_eq!(config.upstream.timeout_secs, 3);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.pagination.max_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_pagination() {
        let mut config = Config::default();
        config.pagination.default_limit = 30;
        assert_eq!(
            config.validate(),
            Err(ValidationError::DefaultAboveMax {
                default_limit: 30,
                max_limit: 20
            })
        );

        config.pagination = Pagination {
            default_limit: 0,
            max_limit: 0,
        };
        assert_eq!(config.validate(), Err(ValidationError::ZeroMaxLimit));
    }

    #[test]
    fn zero_durations_rejected() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert_eq!(
            config.validate(),
            Err(ValidationError::ZeroDuration("cache.ttl_secs"))
        );
    }

    #[test]
    fn rejects_non_base_url() {
        let yaml = r#"
upstream:
    base_url: "mailto:someone@example.com"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }
}
