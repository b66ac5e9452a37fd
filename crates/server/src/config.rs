use std::time::Duration;

use moviematch_core::types::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must list at least one endpoint")]
    NoEndpoints(&'static str),
}

/// Server configuration, read from `MOVIEMATCH_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub bind_addr: String,
    pub metadata_url: String,
    pub analysis_url: String,
    pub analysis_endpoints: Vec<String>,
    /// Keys used when none have been saved yet.
    pub default_credentials: Credentials,
    /// Per-request timeout for outbound API calls. `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset and blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let analysis_endpoints = match var("MOVIEMATCH_ANALYSIS_ENDPOINTS") {
            Some(list) => {
                let endpoints: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect();
                if endpoints.is_empty() {
                    return Err(ConfigError::NoEndpoints("MOVIEMATCH_ANALYSIS_ENDPOINTS"));
                }
                endpoints
            }
            None => moviematch_analysis::gemini::DEFAULT_ENDPOINTS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        };

        let http_timeout = match var("MOVIEMATCH_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "MOVIEMATCH_HTTP_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            db_path: var("MOVIEMATCH_DB").unwrap_or_else(|| "moviematch.db".to_string()),
            bind_addr: var("MOVIEMATCH_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            metadata_url: var("MOVIEMATCH_METADATA_URL")
                .unwrap_or_else(|| moviematch_metadata::omdb::DEFAULT_BASE_URL.to_string()),
            analysis_url: var("MOVIEMATCH_ANALYSIS_URL")
                .unwrap_or_else(|| moviematch_analysis::gemini::DEFAULT_BASE_URL.to_string()),
            analysis_endpoints,
            default_credentials: Credentials::new(
                var("MOVIEMATCH_ANALYSIS_KEY").unwrap_or_default(),
                var("MOVIEMATCH_METADATA_KEY").unwrap_or_default(),
            ),
            http_timeout,
        })
    }

    /// Shared outbound HTTP client for both APIs.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db_path, "moviematch.db");
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.metadata_url, "https://www.omdbapi.com/");
        assert_eq!(cfg.analysis_endpoints.len(), 3);
        assert_eq!(cfg.default_credentials, Credentials::default());
        assert!(cfg.http_timeout.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("MOVIEMATCH_BIND", "127.0.0.1:9000"),
            (
                "MOVIEMATCH_ANALYSIS_ENDPOINTS",
                "v1/models/a:generateContent, ,v1/models/b:generateContent",
            ),
            ("MOVIEMATCH_METADATA_KEY", " omdb-key "),
            ("MOVIEMATCH_HTTP_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(
            cfg.analysis_endpoints,
            vec!["v1/models/a:generateContent", "v1/models/b:generateContent"]
        );
        assert_eq!(cfg.default_credentials.metadata_key, "omdb-key");
        assert_eq!(cfg.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("MOVIEMATCH_HTTP_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config(&[("MOVIEMATCH_HTTP_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config(&[("MOVIEMATCH_ANALYSIS_ENDPOINTS", " , ")]),
            Err(ConfigError::NoEndpoints(_))
        ));
    }
}
