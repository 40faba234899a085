//! `[fetch]` and `[secrets]` section configuration.
//!
//! Where the dashboard gets its inputs from: the secrets file naming the
//! dataset URLs and access token, and the HTTP client used to download them.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[fetch]` section - HTTP client settings for dataset downloads.
///
/// # Example
/// ```toml
/// [fetch]
/// timeout_secs = 60
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    #[serde(default = "defaults::fetch::user_agent")]
    #[educe(Default = defaults::fetch::user_agent())]
    pub user_agent: String,

    /// Request timeout. Unset keeps the HTTP client's own default.
    #[serde(default = "defaults::fetch::timeout_secs")]
    #[educe(Default = defaults::fetch::timeout_secs())]
    pub timeout_secs: Option<u64>,
}

/// `[secrets]` section - location of the secrets file.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    /// Path to `secrets.toml` (relative to root, `~` expanded).
    #[serde(default = "defaults::secrets::path")]
    #[educe(Default = defaults::secrets::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::AppConfig;
    use std::path::PathBuf;

    #[test]
    fn test_fetch_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.fetch.timeout_secs, None);
    }

    #[test]
    fn test_fetch_config_timeout() {
        let config = r#"
            [fetch]
            timeout_secs = 60
            user_agent = "steamloop"
        "#;
        let config: AppConfig = toml::from_str(config).unwrap();

        assert_eq!(config.fetch.timeout_secs, Some(60));
        assert_eq!(config.fetch.user_agent, "steamloop");
    }

    #[test]
    fn test_secrets_config() {
        let config = r#"
            [secrets]
            path = "~/.steamloop/secrets.toml"
        "#;
        let config: AppConfig = toml::from_str(config).unwrap();
        assert_eq!(
            config.secrets.path,
            PathBuf::from("~/.steamloop/secrets.toml")
        );
    }
}
