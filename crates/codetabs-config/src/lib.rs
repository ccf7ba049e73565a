//! Configuration management for codetabs.
//!
//! Parses `codetabs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `tabs.group`
//! - `tabs.class_name`

mod expand;

use codetabs::{BlockStyle, ColorMode, DEFAULT_GROUP, WidgetDefaults};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default selection group.
    pub group: Option<String>,
    /// Override the default block style.
    pub block_style: Option<BlockStyle>,
    /// Override the color mode.
    pub color_mode: Option<ColorMode>,
    /// Override the container class.
    pub class_name: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "codetabs.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Widget defaults.
    pub tabs: TabsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[tabs]` section: defaults for widgets that do not declare their own.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Selection group key.
    pub group: String,
    /// Visual style of the header strip.
    pub block_style: BlockStyle,
    /// Color mode used for every render.
    pub color_mode: ColorMode,
    /// Extra class for every widget container.
    pub class_name: Option<String>,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.to_owned(),
            block_style: BlockStyle::default(),
            color_mode: ColorMode::default(),
            class_name: None,
        }
    }
}

impl TabsConfig {
    /// Defaults handed to widgets built from page markup.
    #[must_use]
    pub fn widget_defaults(&self) -> WidgetDefaults {
        WidgetDefaults {
            group: self.group.clone(),
            block_style: self.block_style,
            class_name: self.class_name.clone(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`tabs.group`").
        field: String,
        /// Error message (e.g., "${`DOCS_GROUP`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a string field to contain no whitespace.
fn require_no_whitespace(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain whitespace"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `codetabs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated again
    /// after the overrides.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(group) = &settings.group {
            self.tabs.group.clone_from(group);
        }
        if let Some(block_style) = settings.block_style {
            self.tabs.block_style = block_style;
        }
        if let Some(color_mode) = settings.color_mode {
            self.tabs.color_mode = color_mode;
        }
        if let Some(class_name) = &settings.class_name {
            self.tabs.class_name = Some(class_name.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.tabs.group, "tabs.group")?;
        require_no_whitespace(&self.tabs.group, "tabs.group")?;
        if let Some(class_name) = &self.tabs.class_name {
            require_non_empty(class_name, "tabs.class_name")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.tabs.group = expand::expand_env(&self.tabs.group, "tabs.group")?;
        if let Some(ref class_name) = self.tabs.class_name {
            self.tabs.class_name = Some(expand::expand_env(class_name, "tabs.class_name")?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tabs.group, "client");
        assert_eq!(config.tabs.block_style, BlockStyle::Loud);
        assert_eq!(config.tabs.color_mode, ColorMode::Light);
        assert_eq!(config.tabs.class_name, None);
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tabs.group, "client");
        assert_eq!(config.tabs.block_style, BlockStyle::Loud);
    }

    #[test]
    fn test_parse_tabs_config() {
        let toml = r#"
[tabs]
group = "pkg-manager"
block_style = "subtle"
color_mode = "dark"
class_name = "wide"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tabs.group, "pkg-manager");
        assert_eq!(config.tabs.block_style, BlockStyle::Subtle);
        assert_eq!(config.tabs.color_mode, ColorMode::Dark);
        assert_eq!(config.tabs.class_name.as_deref(), Some("wide"));
    }

    #[test]
    fn test_parse_unknown_block_style() {
        let toml = r#"
[tabs]
block_style = "shouty"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_widget_defaults() {
        let toml = r#"
[tabs]
group = "os"
block_style = "subtle"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.tabs.widget_defaults(),
            WidgetDefaults {
                group: "os".to_owned(),
                block_style: BlockStyle::Subtle,
                class_name: None,
            }
        );
    }

    #[test]
    fn test_apply_cli_settings_group() {
        let mut config = Config::default();
        let settings = CliSettings {
            group: Some("lang".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.tabs.group, "lang");
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default();
        let settings = CliSettings {
            group: None,
            block_style: Some(BlockStyle::Subtle),
            color_mode: Some(ColorMode::Dark),
            class_name: Some("narrow".to_owned()),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.tabs.group, "client");
        assert_eq!(config.tabs.block_style, BlockStyle::Subtle);
        assert_eq!(config.tabs.color_mode, ColorMode::Dark);
        assert_eq!(config.tabs.class_name.as_deref(), Some("narrow"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.tabs.group, "client");
        assert_eq!(config.tabs.block_style, BlockStyle::Loud);
    }

    #[test]
    fn test_expand_env_vars_group() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CODETABS_TEST_GROUP", "pkg-manager");
        }

        let toml = r#"
[tabs]
group = "${CODETABS_TEST_GROUP}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.tabs.group, "pkg-manager");

        unsafe {
            std::env::remove_var("CODETABS_TEST_GROUP");
        }
    }

    #[test]
    fn test_expand_env_vars_default_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CODETABS_TEST_UNSET_CLASS");
        }

        let toml = r#"
[tabs]
class_name = "${CODETABS_TEST_UNSET_CLASS:-docs-tabs}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.tabs.class_name.as_deref(), Some("docs-tabs"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_CODETABS_TEST");
        }

        let toml = r#"
[tabs]
group = "${MISSING_VAR_CODETABS_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_CODETABS_TEST"));
        assert!(err.to_string().contains("tabs.group"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_group_empty() {
        let mut config = Config::default();
        config.tabs.group = String::new();
        assert_validation_error(&config, &["tabs.group", "empty"]);
    }

    #[test]
    fn test_validate_group_whitespace() {
        let mut config = Config::default();
        config.tabs.group = "pkg manager".to_owned();
        assert_validation_error(&config, &["tabs.group", "whitespace"]);
    }

    #[test]
    fn test_validate_class_name_empty() {
        let mut config = Config::default();
        config.tabs.class_name = Some(String::new());
        assert_validation_error(&config, &["tabs.class_name"]);
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guides");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "[tabs]\n").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(nested.join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[tabs]\ngroup = \"lang\"\ncolor_mode = \"dark\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.tabs.group, "lang");
        assert_eq!(config.tabs.color_mode, ColorMode::Dark);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[tabs]\ngroup = \"\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[tabs]\ngroup = \"lang\"\nblock_style = \"subtle\"\n").unwrap();
        let settings = CliSettings {
            block_style: Some(BlockStyle::Loud),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.tabs.group, "lang");
        assert_eq!(config.tabs.block_style, BlockStyle::Loud);
    }

    #[test]
    fn test_load_cli_settings_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            group: Some("two words".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(err.to_string().contains("whitespace"));
    }
}
