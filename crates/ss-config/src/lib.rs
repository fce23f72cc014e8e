//! Configuration for the SuperSaaS booking shortcode.
//!
//! Parses `supersaas.toml` with serde and provides auto-discovery of the
//! config file in parent directories. The loaded [`Config`] is turned into
//! the read-only [`SiteDefaults`] consumed by the shortcode renderer.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields: `account_name`, `password`, `custom_domain`, `schedule`.
//!
//! ## Example
//!
//! ```toml
//! account_name = "demo"
//! password = "${SUPERSAAS_PASSWORD}"
//! schedule = "https://www.supersaas.com/schedule/demo/Therapists"
//!
//! [messages]
//! book_now = "Reserve a slot"
//! ```

mod domain;
mod expand;
mod messages;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use domain::clean_custom_domain;
pub use messages::{MessageKey, Messages};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "supersaas.toml";

/// Plugin configuration as stored in `supersaas.toml`.
///
/// Account fields are optional here: an incomplete setup is not a load
/// error, it is reported in place of the booking button at render time.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SuperSaaS account name.
    pub account_name: Option<String>,
    /// SuperSaaS account password (shared secret for the checksum).
    pub password: Option<String>,
    /// Custom booking domain, either a bare host or a full URL.
    pub custom_domain: Option<String>,
    /// Schedule URL the user is redirected to after login.
    pub schedule: Option<String>,
    /// Localized message overrides.
    pub messages: Messages,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("custom_domain", &self.custom_domain)
            .field("schedule", &self.schedule)
            .field("messages", &self.messages)
            .field("config_path", &self.config_path)
            .finish()
    }
}

/// Site-wide defaults for every shortcode on the site.
///
/// Unset configuration values are empty strings. `after` is taken from the
/// `schedule` configuration field.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SiteDefaults {
    /// SuperSaaS account name.
    pub account_name: String,
    /// SuperSaaS account password.
    pub password: String,
    /// Cleaned custom domain (`host[:port]`, a bare host with path, or empty).
    pub custom_domain: String,
    /// Redirect target after login.
    pub after: String,
}

impl fmt::Debug for SiteDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteDefaults")
            .field("account_name", &self.account_name)
            .field("password", &"[redacted]")
            .field("custom_domain", &self.custom_domain)
            .field("after", &self.after)
            .finish()
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
    /// Referenced environment variables are unset, as `field: ${VAR}`.
    #[error("Environment variables not set: {}", .0.join(", "))]
    EnvVar(Vec<String>),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `supersaas.toml` in the current directory and
    /// parents, falling back to an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the read-only site defaults used by the shortcode renderer.
    ///
    /// `custom_domain` is reduced to `host[:port]` when it is a full URL.
    #[must_use]
    pub fn site_defaults(&self) -> SiteDefaults {
        let value = |field: &Option<String>| field.clone().unwrap_or_default();

        SiteDefaults {
            account_name: value(&self.account_name),
            password: value(&self.password),
            custom_domain: self
                .custom_domain
                .as_deref()
                .map(clean_custom_domain)
                .unwrap_or_default(),
            after: value(&self.schedule),
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(domain) = &self.custom_domain
            && domain.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Validation(
                "custom_domain cannot contain whitespace".to_owned(),
            ));
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Expand environment variable references in the account settings.
    ///
    /// `${SUPERSAAS_PASSWORD:-}` yields an empty password, which renders as
    /// an incomplete setup instead of failing the load.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let fields = [
            (&mut self.account_name, "account_name"),
            (&mut self.password, "password"),
            (&mut self.custom_domain, "custom_domain"),
            (&mut self.schedule, "schedule"),
        ];

        let mut unset = Vec::new();
        for (slot, field) in fields {
            let Some(value) = slot.as_deref() else {
                continue;
            };
            match expand::expand_env(value) {
                Ok(expanded) => *slot = Some(expanded),
                Err(vars) => unset.extend(vars.iter().map(|var| format!("{field}: ${{{var}}}"))),
            }
        }

        if unset.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::EnvVar(unset))
        }
    }
}
