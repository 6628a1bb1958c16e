use api::config::Config as ApiConfig;
use collection::config::Config as CollectionConfig;
use serde::Deserialize;
use std::fs::File;

#[derive(Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    pub sentry_dsn: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(flatten)]
    pub api: ApiConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.collection.validate()?;
        Ok(())
    }
}

fn default_metrics_prefix() -> String {
    "metgql".into()
}

fn default_level() -> String {
    "info".into()
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid api config: {0}")]
    Api(#[from] api::config::ValidationError),
    #[error("invalid collection config: {0}")]
    Collection(#[from] collection::config::ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 4000
            admin_listener:
                host: 127.0.0.1
                port: 4001
            collection:
                upstream:
                    base_url: http://127.0.0.1:9000/public/collection/v1/
                    timeout_secs: 5
                cache:
                    ttl_secs: 3600
                pagination:
                    default_limit: 5
                    max_limit: 10
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                level: debug
                sentry_dsn: https://public@sentry.example.com/1
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.api.listener.port, 4000);
        assert_eq!(config.api.admin_listener.port, 4001);
        assert_eq!(config.collection.upstream.timeout_secs, 5);
        assert_eq!(config.collection.cache.ttl_secs, 3600);
        assert_eq!(config.collection.pagination.max_limit, 10);

        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
        assert_eq!(metrics.prefix, "metgql");

        let logging = config.common.logging.expect("logging config");
        assert_eq!(logging.level, "debug");
        assert_eq!(
            logging.sentry_dsn.as_deref(),
            Some("https://public@sentry.example.com/1")
        );
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 4000
            admin_listener:
                host: 127.0.0.1
                port: 4001
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.collection, CollectionConfig::default());
        assert_eq!(config.common, CommonConfig::default());
    }

    #[test]
    fn invalid_pagination_is_rejected() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 4000
            admin_listener:
                host: 127.0.0.1
                port: 4001
            collection:
                pagination:
                    default_limit: 50
            "#;
        let tmp = write_tmp_file(yaml);

        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::Collection(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::from_file(std::path::Path::new("/nonexistent/metgql.yaml")),
            Err(ConfigError::LoadError(_))
        ));
    }
}
