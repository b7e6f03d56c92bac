//! Project-level generation configuration loaded from YAML.
//!
//! Externalizes which rules run and how results are rendered, so a project
//! can keep the settings next to its API documents instead of passing flags.
//!
//! # File format
//!
//! ```yaml
//! # apitest-gen.yaml
//!
//! # Rule toggles (all default to true).
//! rules:
//!   simple_get: true
//!   missing_body_property: true
//!   resource_not_found: true
//!   unauthorized: false
//!   valid_creation_post: true
//!
//! # Pretty-print JSON output.
//! pretty: true
//! ```

use std::path::Path;

use serde::Deserialize;

/// Project-level generation config.
///
/// Loaded from a YAML file via [`ProjectConfig::load`], then applied to a
/// [`GenerateConfig`](crate::GenerateConfig) via
/// [`GenerateConfig::with_project_config`](crate::GenerateConfig::with_project_config).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Rule toggles.
    pub rules: RuleConfig,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

/// Individual rule on/off switches (all default to `true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RuleConfig {
    /// Parameterless `GET` → 200.
    pub simple_get: bool,

    /// Empty body against a required schema → 400.
    pub missing_body_property: bool,

    /// Empty path parameters → 404.
    pub resource_not_found: bool,

    /// Anonymous caller → 401 / 403.
    pub unauthorized: bool,

    /// Synthesized `POST` body → 201.
    pub valid_creation_post: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            simple_get: true,
            missing_body_property: true,
            resource_not_found: true,
            unauthorized: true,
            valid_creation_post: true,
        }
    }
}

impl ProjectConfig {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_defaults() {
        let config: ProjectConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config.rules, RuleConfig::default());
        assert!(config.rules.simple_get);
        assert!(config.rules.valid_creation_post);
        assert!(!config.pretty);
    }

    #[test]
    fn deserialize_partial_rules() {
        let yaml = r"
rules:
  unauthorized: false
  resource_not_found: false
pretty: true
";
        let config: ProjectConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(!config.rules.unauthorized);
        assert!(!config.rules.resource_not_found);
        // Other rules keep defaults
        assert!(config.rules.simple_get);
        assert!(config.rules.missing_body_property);
        assert!(config.pretty);
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("apitest-gen-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "rules:\n  simple_get: false\n").unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert!(!config.rules.simple_get);
        assert!(config.rules.unauthorized);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = ProjectConfig::load(Path::new("/nonexistent/apitest-gen.yaml"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn load_invalid_yaml_returns_error() {
        let dir = std::env::temp_dir().join("apitest-gen-config-test-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.yaml");
        std::fs::write(&path, "rules: [[[invalid").unwrap();

        let result = ProjectConfig::load(&path);
        assert!(matches!(result, Err(crate::Error::Yaml(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
