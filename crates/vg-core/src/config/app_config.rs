//! Application configuration domain model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sequence::{Sequence, SequenceError};

/// Application configuration
///
/// Every section is optional in the file; missing sections and keys take the
/// defaults of the study deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Progress service settings
    pub api: ApiConfig,

    /// Local cache settings
    pub cache: CacheConfig,

    /// Login flow settings
    pub auth: AuthConfig,

    /// Instructional sequence
    pub sequence: SequenceConfig,
}

/// Progress service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/progress/...` endpoints are resolved against
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Local cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file; `None` places it in the application data directory
    pub path: Option<PathBuf>,
}

/// Login flow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where unauthenticated participants are sent
    pub login_url: String,
}

/// Sequence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub items: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/users".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: "http://localhost:3000/login".to_string(),
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            items: Sequence::agent_videos()
                .iter()
                .map(|item| item.as_str().to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Validated sequence described by the configuration.
    pub fn sequence(&self) -> Result<Sequence, SequenceError> {
        Sequence::new(self.sequence.items.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequence_is_agent_videos() {
        let config = AppConfig::default();

        assert_eq!(config.sequence().unwrap(), Sequence::agent_videos());
    }

    #[test]
    fn partial_document_keeps_defaults_for_missing_keys() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://study.example.org/api/users"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://study.example.org/api/users");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.auth, AuthConfig::default());
        assert!(config.cache.path.is_none());
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
            [sequence]
            items = []
            "#,
        )
        .unwrap();

        assert_eq!(config.sequence(), Err(SequenceError::Empty));
    }
}
