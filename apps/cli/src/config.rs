//! CLI configuration module.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lowest                                                       highest   │
//! │                                                                         │
//! │  built-in defaults ──► quill.toml ──► QUILL_* env ──► command-line flags│
//! │  (EZ-Theme, ¤, +0)     (or --config)                  (--site-name ..)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Key                  | Env var                    | Default    |
//! |----------------------|----------------------------|------------|
//! | `site_name`          | `QUILL_SITE_NAME`          | `EZ-Theme` |
//! | `currency_glyph`     | `QUILL_CURRENCY_GLYPH`     | `¤`        |
//! | `utc_offset_minutes` | `QUILL_UTC_OFFSET_MINUTES` | `0`        |
//! | `locale_file`        | `QUILL_LOCALE_FILE`        | none       |
//! | `log_format`         | `QUILL_LOG_FORMAT`         | `text`     |

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Source};
use quill_core::money::DEFAULT_CURRENCY_GLYPH;
use quill_core::{InvoiceSettings, DEFAULT_SITE_NAME};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "quill.toml";

/// Prefix of the environment variables read by [`AppConfig::load`].
pub const ENV_PREFIX: &str = "QUILL";

/// FixedOffset accepts strictly less than a day either way.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shown in the invoice header and footer
    pub site_name: String,

    /// Prefixed to every amount
    pub currency_glyph: String,

    /// Offset applied to invoice dates (480 = UTC+8)
    pub utc_offset_minutes: i32,

    /// Nested JSON locale catalog (optional)
    #[serde(default)]
    pub locale_file: Option<PathBuf>,

    /// `text` or `json`
    pub log_format: LogFormat,
}

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub site_name: Option<String>,
    pub locale_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the optional file and the environment.
    ///
    /// An explicit `path` must exist; the default `quill.toml` may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };
        Self::from_sources(file, Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds the layered configuration from a file source and an
    /// environment source.
    pub fn from_sources<F>(file: F, env: Environment) -> Result<Self, ConfigError>
    where
        F: Source + Send + Sync + 'static,
    {
        let config: AppConfig = Config::builder()
            .set_default("site_name", DEFAULT_SITE_NAME)?
            .set_default("currency_glyph", DEFAULT_CURRENCY_GLYPH)?
            .set_default("utc_offset_minutes", 0)?
            .set_default("log_format", "text")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::InvalidValue {
                field: "utc_offset_minutes",
                reason: format!(
                    "{} is outside ±{MAX_OFFSET_MINUTES}",
                    self.utc_offset_minutes
                ),
            });
        }

        if self.site_name.trim().is_empty() {
            self.site_name = DEFAULT_SITE_NAME.to_string();
        }

        Ok(self)
    }

    /// Applies command-line values on top of the loaded layers.
    pub fn apply(mut self, overrides: CliOverrides) -> Self {
        if let Some(name) = overrides.site_name.filter(|n| !n.trim().is_empty()) {
            self.site_name = name;
        }
        if let Some(path) = overrides.locale_file {
            self.locale_file = Some(path);
        }
        self
    }

    /// The presentation settings handed to the assembler.
    pub fn invoice_settings(&self) -> InvoiceSettings {
        InvoiceSettings {
            currency_glyph: self.currency_glyph.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
            ..InvoiceSettings::default()
        }
        .with_site_name(Some(&self.site_name))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn toml(contents: &str) -> impl Source + Send + Sync + 'static {
        File::from_str(contents, FileFormat::Toml)
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(toml(""), env(&[])).unwrap();
        assert_eq!(config.site_name, "EZ-Theme");
        assert_eq!(config.currency_glyph, "¤");
        assert_eq!(config.utc_offset_minutes, 0);
        assert_eq!(config.locale_file, None);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = AppConfig::from_sources(
            toml(
                r#"
                site_name = "Nimbus"
                currency_glyph = "¥"
                utc_offset_minutes = 480
                locale_file = "locales/zh-CN.json"
                "#,
            ),
            env(&[]),
        )
        .unwrap();

        assert_eq!(config.site_name, "Nimbus");
        assert_eq!(config.currency_glyph, "¥");
        assert_eq!(config.utc_offset_minutes, 480);
        assert_eq!(
            config.locale_file.as_deref(),
            Some(Path::new("locales/zh-CN.json"))
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let config = AppConfig::from_sources(
            toml(r#"site_name = "Nimbus""#),
            env(&[
                ("QUILL_SITE_NAME", "Stratus"),
                ("QUILL_UTC_OFFSET_MINUTES", "-300"),
                ("QUILL_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.site_name, "Stratus");
        assert_eq!(config.utc_offset_minutes, -300);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_flags_override_everything() {
        let config = AppConfig::from_sources(
            toml(r#"site_name = "Nimbus""#),
            env(&[("QUILL_SITE_NAME", "Stratus")]),
        )
        .unwrap()
        .apply(CliOverrides {
            site_name: Some("Cirrus".to_string()),
            locale_file: Some(PathBuf::from("en.json")),
        });

        assert_eq!(config.site_name, "Cirrus");
        assert_eq!(config.locale_file, Some(PathBuf::from("en.json")));
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = AppConfig::from_sources(toml(r#"site_name = "  ""#), env(&[]))
            .unwrap()
            .apply(CliOverrides {
                site_name: Some(String::new()),
                locale_file: None,
            });
        assert_eq!(config.site_name, "EZ-Theme");
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let err = AppConfig::from_sources(toml("utc_offset_minutes = 1440"), env(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "utc_offset_minutes",
                ..
            }
        ));
    }

    #[test]
    fn test_min_i32_offset_rejected() {
        let err = AppConfig::from_sources(
            toml(""),
            env(&[("QUILL_UTC_OFFSET_MINUTES", &i32::MIN.to_string())]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "utc_offset_minutes",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_value_is_load_error() {
        let err = AppConfig::from_sources(
            toml(""),
            env(&[("QUILL_UTC_OFFSET_MINUTES", "eight hours")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/quill.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_invoice_settings() {
        let config = AppConfig::from_sources(
            toml("currency_glyph = \"$\"\nutc_offset_minutes = 60"),
            env(&[]),
        )
        .unwrap();
        let settings = config.invoice_settings();
        assert_eq!(settings.site_name, "EZ-Theme");
        assert_eq!(settings.currency_glyph, "$");
        assert_eq!(settings.utc_offset().local_minus_utc(), 3600);
    }
}
