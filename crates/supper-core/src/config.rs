use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variables consulted for the Gemini API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gemini provider settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Placeholder image settings
    #[serde(default)]
    pub images: ImagesConfig,

    /// Coordinate source settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Output preferences
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key. Usually supplied through `GEMINI_API_KEY` instead of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// The API key, if one is set and is not a placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("YOUR_"))
    }

    /// Check if credentials are configured (not placeholders)
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_image_width")]
    pub width: u32,
    #[serde(default = "default_image_height")]
    pub height: u32,
}

fn default_image_width() -> u32 {
    400
}

fn default_image_height() -> u32 {
    300
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            width: default_image_width(),
            height: default_image_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fixed latitude; used together with `longitude` instead of a lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Whether the position may be looked up over the network
    #[serde(default = "default_allow_network_lookup")]
    pub allow_network_lookup: bool,

    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

fn default_allow_network_lookup() -> bool {
    true
}

fn default_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            allow_network_lookup: default_allow_network_lookup(),
            lookup_url: default_lookup_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl LocationConfig {
    /// Both halves of a fixed position, when configured.
    pub fn fixed_position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Language used for user-facing status and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub locale: Locale,
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't
    /// exist, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, creating a default file if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            config
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Override file settings from the environment. The first non-empty
    /// variable in [`API_KEY_ENV_VARS`] wins.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()));

        if let Some(key) = from_env {
            self.gemini.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.gemini.base_url, "gemini.base_url", &mut result);
        validate_url(&self.location.lookup_url, "location.lookup_url", &mut result);

        if self.gemini.model.trim().is_empty() {
            result.add_error("gemini.model", "Model name must not be empty");
        }

        if self.gemini.timeout_secs == 0 {
            result.add_error("gemini.timeout_secs", "Timeout must be greater than 0");
        }

        if !self.gemini.is_configured() {
            result.add_warning(
                "gemini.api_key",
                "Gemini API key not configured - set GEMINI_API_KEY",
            );
        }

        if self.images.width == 0 {
            result.add_error("images.width", "Image width must be greater than 0");
        } else if self.images.width > 4000 {
            result.add_warning("images.width", "Image width is unusually large (>4000)");
        }

        if self.images.height == 0 {
            result.add_error("images.height", "Image height must be greater than 0");
        } else if self.images.height > 4000 {
            result.add_warning("images.height", "Image height is unusually large (>4000)");
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within [-90, 90]");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "location.longitude",
                        "Longitude must be within [-180, 180]",
                    );
                }
            }
            (Some(_), None) => {
                result.add_error("location.longitude", "Latitude is set without longitude")
            }
            (None, Some(_)) => {
                result.add_error("location.latitude", "Longitude is set without latitude")
            }
            (None, None) => {
                if !self.location.allow_network_lookup {
                    result.add_warning(
                        "location",
                        "No fixed position and network lookup disabled - pass --lat/--lon",
                    );
                }
            }
        }

        result
    }

    /// Save configuration to `path`. The API key is never written back.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let mut persisted = self.clone();
        persisted.gemini.api_key = None;

        let contents =
            toml::to_string_pretty(&persisted).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("supper");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
