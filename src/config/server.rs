//! HTTP listener and process-level settings

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Listener, logging and public URL settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Comma-separated allow-list; empty allows any origin
    pub cors_origins: Option<String>,
    /// Audience-facing origin used to build `join_url` (`{base}/join/{code}`)
    pub public_base_url: Option<String>,
}

/// Deployment flavor; production switches logs to JSON.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,prezo_live=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
            public_base_url: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidAddress(raw))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(raw) = &self.cors_origins else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    /// Public base URL without a trailing slash; blank counts as unset.
    pub fn public_base_url(&self) -> Option<String> {
        self.public_base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(String::from)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if let Some(url) = self.public_base_url() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::InvalidPublicBaseUrl(url));
            }
        }
        self.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_8080() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert!(!config.is_production());
        assert!(config.log_level.contains("prezo_live=debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn cors_list_skips_blank_entries() {
        let config = ServerConfig {
            cors_origins: Some("http://localhost:5173, ,http://localhost:3000,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.cors_origins_list(),
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
    }

    #[test]
    fn public_base_url_is_normalized() {
        let config = ServerConfig {
            public_base_url: Some(" https://prezo.example/ ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.public_base_url().as_deref(),
            Some("https://prezo.example")
        );

        let blank = ServerConfig {
            public_base_url: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.public_base_url(), None);
    }

    #[test]
    fn public_base_url_needs_http_scheme() {
        let config = ServerConfig {
            public_base_url: Some("prezo.example".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPublicBaseUrl(_))
        ));
    }

    #[test]
    fn zero_port_and_out_of_range_timeouts_fail() {
        let zero_port = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(zero_port.validate(), Err(ValidationError::InvalidPort)));

        for request_timeout_secs in [0, 301] {
            let config = ServerConfig {
                request_timeout_secs,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
        }
    }
}
