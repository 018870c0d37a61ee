//! Extractor configuration
//!
//! The configuration file is JSON, or YAML when the file name ends in
//! `.yaml`/`.yml`. Keys are read from a top-level `parameters` object when
//! one exists, otherwise from the document root.

use crate::catalog::ObjectKind;
use crate::client::{validate_organization, ClientOptions};
use crate::error::{Error, Result, ResultExt};
use crate::http::RateLimiterConfig;
use crate::pagination::{FetcherConfig, RetryPolicy, DEFAULT_PAGE_SIZE};
use crate::partition::DateWindow;
use crate::types::{JsonValue, OptionStringExt};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Key wrapping the user parameters in platform-generated config files
const PARAMETERS_KEY: &str = "parameters";

// ============================================================================
// Config
// ============================================================================

/// Complete extractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// v3 API key
    #[serde(rename = "#token", default)]
    pub token: Option<String>,

    /// v1 API key, needed by reports and conversations
    #[serde(rename = "#token_v1", default)]
    pub token_v1: Option<String>,

    /// Account name, the `acme` in `acme.ladesk.com`
    #[serde(default)]
    pub organization: Option<String>,

    /// Objects to download, in order
    #[serde(default)]
    pub objects: Vec<String>,

    #[serde(default)]
    pub date: DateConfig,

    /// Flag written into every manifest
    #[serde(default = "default_true")]
    pub incremental_load: bool,

    /// Abort on the first object that fails instead of skipping it
    #[serde(default)]
    pub fail_on_error: bool,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Request rate limit; 0 disables it
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Records per page for v3 collections
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_true() -> bool {
    true
}

fn default_requests_per_second() -> u32 {
    3
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Extraction window as free-text date expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateConfig {
    #[serde(default = "default_date_from")]
    pub from: String,

    #[serde(default = "default_date_until")]
    pub until: String,
}

fn default_date_from() -> String {
    "30 days ago".to_string()
}

fn default_date_until() -> String {
    "now".to_string()
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            from: default_date_from(),
            until: default_date_until(),
        }
    }
}

/// Whole-fetch retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,
}

fn default_attempts() -> u32 {
    3
}

fn default_delay_seconds() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_seconds: default_delay_seconds(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ExtractorConfig {
    /// Load from a JSON or YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_yaml::from_str(text)?;
        Self::from_value(value)
    }

    fn from_value(mut value: JsonValue) -> Result<Self> {
        if let Some(parameters) = value.get_mut(PARAMETERS_KEY) {
            value = parameters.take();
        }
        if !value.is_object() {
            return Err(Error::config("configuration must be an object"));
        }
        Ok(serde_json::from_value(value)?)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check everything that can be checked without the network
    pub fn validate(&self) -> Result<()> {
        self.token()?;
        validate_organization(self.organization()?)?;
        self.object_kinds()?;

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if self.retry.attempts == 0 {
            return Err(Error::invalid_value("retry.attempts", "must be at least 1"));
        }

        Ok(())
    }

    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing_field("#token"))
    }

    pub fn organization(&self) -> Result<&str> {
        self.organization
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .ok_or_else(|| Error::missing_field("organization"))
    }

    /// v1 key, if one is configured
    pub fn token_v1(&self) -> Option<String> {
        self.token_v1.clone().none_if_empty()
    }

    /// Requested objects in order, without duplicates.
    ///
    /// Fails on unknown names and on v1 objects without a v1 key.
    pub fn object_kinds(&self) -> Result<Vec<ObjectKind>> {
        if self.objects.is_empty() {
            return Err(Error::invalid_value(
                "objects",
                "no objects to download were specified",
            ));
        }

        let mut kinds = Vec::new();
        let mut unsupported = Vec::new();

        for name in &self.objects {
            match name.trim().parse::<ObjectKind>() {
                Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Ok(_) => {}
                Err(name) => unsupported.push(name),
            }
        }

        if !unsupported.is_empty() {
            return Err(Error::UnsupportedObjects {
                objects: unsupported,
                supported: ObjectKind::supported_names(),
            });
        }

        if self.token_v1().is_none() {
            if let Some(kind) = kinds.iter().find(|k| k.requires_v1_token()) {
                return Err(Error::MissingV1Token {
                    object: kind.name().to_string(),
                });
            }
        }

        Ok(kinds)
    }

    /// Resolve the extraction window relative to `now`
    pub fn window(&self, now: NaiveDateTime) -> Result<DateWindow> {
        DateWindow::resolve(&self.date.from, &self.date.until, now)
    }

    // ========================================================================
    // Derived settings
    // ========================================================================

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry.attempts.max(1),
            delay: Duration::from_secs(self.retry.delay_seconds),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            token_v1: self.token_v1(),
            fetcher: FetcherConfig {
                page_size: self.page_size.max(1),
                retry: self.retry_policy(),
            },
            rate_limit: RateLimiterConfig::per_second(self.requests_per_second),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn minimal() -> ExtractorConfig {
        ExtractorConfig::from_json_str(
            r##"{"#token": "key", "organization": "acme", "objects": ["agents"]}"##,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = minimal();
        assert_eq!(config.date, DateConfig::default());
        assert_eq!(config.date.from, "30 days ago");
        assert_eq!(config.date.until, "now");
        assert!(config.incremental_load);
        assert!(!config.fail_on_error);
        assert!(!config.debug);
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.requests_per_second, 3);
        assert_eq!(config.page_size, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parameters_wrapper() {
        let config = ExtractorConfig::from_json_str(
            r##"{"parameters": {"#token": "key", "#token_v1": "v1", "organization": "acme",
                 "objects": ["tickets", "agent_report"],
                 "date": {"from": "2024-01-01"}, "incremental_load": false}}"##,
        )
        .unwrap();

        assert_eq!(config.token().unwrap(), "key");
        assert_eq!(config.token_v1(), Some("v1".to_string()));
        assert_eq!(config.date.from, "2024-01-01");
        assert_eq!(config.date.until, "now");
        assert!(!config.incremental_load);
        assert_eq!(
            config.object_kinds().unwrap(),
            vec![ObjectKind::Tickets, ObjectKind::AgentReport]
        );
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "\"#token\": key\norganization: acme\nobjects: [agents, tags]\nfail_on_error: true\nretry:\n  attempts: 5"
        )
        .unwrap();

        let config = ExtractorConfig::from_file(file.path()).unwrap();
        assert!(config.fail_on_error);
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.delay_seconds, 2);
        assert_eq!(config.objects, vec!["agents", "tags"]);
    }

    #[test]
    fn test_missing_file() {
        let err = ExtractorConfig::from_file("/nonexistent/config.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_missing_token() {
        let mut config = minimal();
        config.token = Some("  ".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "#token"));
    }

    #[test]
    fn test_missing_organization() {
        let mut config = minimal();
        config.organization = None;
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingConfigField { .. }
        ));
    }

    #[test]
    fn test_hosted_organization_rejected() {
        let mut config = minimal();
        config.organization = Some("acme.ladesk.com".to_string());
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidOrganization { .. }
        ));
    }

    #[test]
    fn test_empty_objects() {
        let mut config = minimal();
        config.objects.clear();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfigValue { ref field, .. } if field == "objects"
        ));
    }

    #[test]
    fn test_unsupported_objects_listed() {
        let mut config = minimal();
        config.objects = vec!["agents".into(), "users".into(), "bots".into()];

        match config.object_kinds().unwrap_err() {
            Error::UnsupportedObjects { objects, supported } => {
                assert_eq!(objects, vec!["users", "bots"]);
                assert!(supported.contains(&"tickets_history".to_string()));
            }
            other => panic!("Expected UnsupportedObjects, got {other:?}"),
        }
    }

    #[test]
    fn test_v1_object_requires_v1_token() {
        let mut config = minimal();
        config.objects = vec!["agents".into(), "conversations".into()];
        config.token_v1 = Some(String::new());

        assert!(matches!(
            config.object_kinds().unwrap_err(),
            Error::MissingV1Token { ref object } if object == "conversations"
        ));
    }

    #[test]
    fn test_duplicate_objects_collapsed() {
        let mut config = minimal();
        config.objects = vec!["tags".into(), "agents".into(), "tags".into()];
        assert_eq!(
            config.object_kinds().unwrap(),
            vec![ObjectKind::Tags, ObjectKind::Agents]
        );
    }

    #[test]
    fn test_client_options() {
        let mut config = minimal();
        config.requests_per_second = 0;
        config.retry.delay_seconds = 0;

        let options = config.client_options();
        assert!(options.rate_limit.is_none());
        assert_eq!(options.fetcher.retry.delay, Duration::ZERO);
        assert_eq!(options.fetcher.page_size, 500);
        assert!(options.token_v1.is_none());
    }

    #[test]
    fn test_window_uses_date_expressions() {
        let mut config = minimal();
        config.date.from = "2024-01-01".to_string();
        config.date.until = "2024-01-03".to_string();

        let now = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let window = config.window(now).unwrap();
        assert_eq!(window.days().len(), 3);

        config.date.from = "whenever".to_string();
        assert!(matches!(
            config.window(now).unwrap_err(),
            Error::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_non_object_config() {
        assert!(ExtractorConfig::from_json_str("[1, 2]").is_err());
    }
}
