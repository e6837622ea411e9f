pub mod config;
pub mod error;

pub use config::{
    Config, GeminiConfig, ImagesConfig, Locale, LocationConfig, UiConfig, ValidationResult,
    API_KEY_ENV_VARS,
};
pub use error::{GeolocationError, NetworkError, RecommendationError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::debug!("Supper core initialized");
    Ok(())
}
