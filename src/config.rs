use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Downstream services
    pub news_service_url: String,
    pub comment_service_url: String,
    pub moderation_service_url: String,

    // Deadlines
    pub request_timeout: Duration,
    pub downstream_timeout: Duration,

    // Request limits
    pub max_search_length: usize,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            environment: "development".to_string(),
            log_level: "news_gateway=debug,tower_http=debug".to_string(),
            news_service_url: "http://news-aggregator:8083".to_string(),
            comment_service_url: "http://comment-service:8081".to_string(),
            moderation_service_url: "http://censor-service:8082".to_string(),
            request_timeout: Duration::from_secs(30),
            downstream_timeout: Duration::from_secs(10),
            max_search_length: 100,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            news_service_url: env::var("NEWS_AGGREGATOR_URL")
                .unwrap_or(defaults.news_service_url),
            comment_service_url: env::var("COMMENT_SERVICE_URL")
                .unwrap_or(defaults.comment_service_url),
            moderation_service_url: env::var("CENSOR_SERVICE_URL")
                .unwrap_or(defaults.moderation_service_url),

            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            ),
            downstream_timeout: Duration::from_secs(
                env::var("DOWNSTREAM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
            ),

            max_search_length: env::var("MAX_SEARCH_LENGTH")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        };

        config.validate()?;
        Ok(config)
    }

    /// 启动前校验下游地址和超时配置
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("NEWS_AGGREGATOR_URL", &self.news_service_url),
            ("COMMENT_SERVICE_URL", &self.comment_service_url),
            ("CENSOR_SERVICE_URL", &self.moderation_service_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| anyhow::anyhow!("{} is not a valid URL ({}): {}", name, value, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("{} must use http or https, got {}", name, url.scheme());
            }
        }

        if self.downstream_timeout.is_zero() || self.request_timeout.is_zero() {
            anyhow::bail!("timeouts must be greater than zero");
        }

        if self.downstream_timeout > self.request_timeout {
            anyhow::bail!(
                "downstream timeout ({:?}) must not exceed the request timeout ({:?})",
                self.downstream_timeout,
                self.request_timeout
            );
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.downstream_timeout, Duration::from_secs(10));
        assert!(!config.is_production());
    }

    #[test]
    fn test_invalid_service_url_rejected() {
        let config = Config {
            comment_service_url: "not a url".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("COMMENT_SERVICE_URL"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = Config {
            news_service_url: "ftp://news.local".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_downstream_timeout_must_fit_request_timeout() {
        let config = Config {
            request_timeout: Duration::from_secs(5),
            downstream_timeout: Duration::from_secs(10),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
