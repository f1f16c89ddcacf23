//! Planner configuration.
//!
//! The classifier vocabularies and security defaults are data, not code, so
//! they can be tuned per API without a rebuild. The file is TOML; every key is
//! optional and falls back to the built-in defaults:
//!
//! ```toml
//! credential_fields = ["token", "access_token", "session_id"]
//! credential_substrings = ["token", "jwt"]
//! credential_suffixes = ["id_token"]
//! producer_keywords = ["auth", "login", "token"]
//! default_bearer_header = "Authorization"
//! default_api_key_name = "X-API-KEY"
//! max_reported_cycles = 500
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Response field names that carry credentials (matched case-insensitively).
    pub credential_fields: Vec<String>,
    /// A response field containing any of these is treated as a credential.
    pub credential_substrings: Vec<String>,
    /// A response field ending in any of these is treated as a credential.
    pub credential_suffixes: Vec<String>,
    /// Keywords in tags, operationId or summary that mark a credential producer.
    pub producer_keywords: Vec<String>,
    /// Header used by bearer schemes that do not name one.
    pub default_bearer_header: String,
    /// Header/query name used by API-key schemes that do not name one.
    pub default_api_key_name: String,
    /// Stop enumerating simple cycles after this many. Unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reported_cycles: Option<usize>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            credential_fields: strings(&[
                "token",
                "access_token",
                "refresh_token",
                "id_token",
                "jwt",
                "auth_token",
                "sessionid",
                "session_id",
            ]),
            credential_substrings: strings(&["token", "jwt"]),
            credential_suffixes: strings(&["id_token"]),
            producer_keywords: strings(&["auth", "login", "token"]),
            default_bearer_header: "Authorization".to_string(),
            default_api_key_name: "X-API-KEY".to_string(),
            max_reported_cycles: None,
        }
    }
}

impl PlannerConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("invalid planner configuration")
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize planner configuration")
    }

    /// Whether a response field name looks like credential material.
    pub fn is_credential_field(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let lower = name.to_lowercase();
        self.credential_fields
            .iter()
            .any(|f| f.to_lowercase() == lower)
            || self
                .credential_substrings
                .iter()
                .any(|s| !s.is_empty() && lower.contains(&s.to_lowercase()))
            || self
                .credential_suffixes
                .iter()
                .any(|s| !s.is_empty() && lower.ends_with(&s.to_lowercase()))
    }

    /// Whether free text (a tag, operationId or summary) mentions a producer keyword.
    pub fn mentions_producer_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.producer_keywords
            .iter()
            .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
    }
}

/// Load planner configuration from a TOML file.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but fails
/// to read or parse.
pub fn load_planner_config(config_path: &Path) -> anyhow::Result<Option<PlannerConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read planner config: {}",
            config_path.display()
        )
    })?;

    let config = PlannerConfig::from_toml_str(&contents).with_context(|| {
        format!(
            "Failed to parse planner config: {}",
            config_path.display()
        )
    })?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_vocabulary_matches() {
        let config = PlannerConfig::default();
        assert!(config.is_credential_field("access_token"));
        assert!(config.is_credential_field("SessionId"));
        assert!(config.is_credential_field("myJwtValue"));
        assert!(config.is_credential_field("google_id_token"));
        assert!(config.is_credential_field("csrfToken"));
        assert!(!config.is_credential_field("id"));
        assert!(!config.is_credential_field("username"));
        assert!(!config.is_credential_field(""));
    }

    #[test]
    fn test_producer_keywords_case_insensitive() {
        let config = PlannerConfig::default();
        assert!(config.mentions_producer_keyword("UserLogin"));
        assert!(config.mentions_producer_keyword("OAuth"));
        assert!(config.mentions_producer_keyword("Refresh Token"));
        assert!(!config.mentions_producer_keyword("listPets"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
producer_keywords = ["signin"]
max_reported_cycles = 3
"#,
        )
        .unwrap();
        assert_eq!(config.producer_keywords, vec!["signin".to_string()]);
        assert_eq!(config.max_reported_cycles, Some(3));
        assert_eq!(config.default_bearer_header, "Authorization");
        assert!(config.is_credential_field("token"));
        assert!(!config.mentions_producer_keyword("login"));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_planner_config(&dir.path().join("absent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "producer_keywords = 12").unwrap();
        assert!(load_planner_config(file.path()).is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = PlannerConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(PlannerConfig::from_toml_str(&text).unwrap(), config);
    }
}
