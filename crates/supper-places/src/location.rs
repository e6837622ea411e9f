//! Coordinate acquisition: fixed positions or an IP-based lookup.

use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use supper_core::{LocationConfig, NetworkError, ReqwestErrorExt};

use crate::types::{Coordinates, GeolocationError};

const USER_AGENT: &str = concat!("Supper/", env!("CARGO_PKG_VERSION"));

/// Source of the current position. One request, one answer; no tracking.
pub trait CoordinateProvider: Send + Sync {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// A position given up front (command line or config file)
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    latitude: f64,
    longitude: f64,
}

impl FixedPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl CoordinateProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Coordinates::new(self.latitude, self.longitude).map_err(|e| {
            tracing::warn!("Rejected fixed position: {}", e);
            GeolocationError::PositionUnavailable
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    message: Option<String>,
}

/// Approximate position from the public IP address (ip-api.com JSON format)
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    client: Option<Client>,
    url: String,
    /// False when network lookups are not allowed
    enabled: bool,
}

impl IpGeolocation {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| tracing::warn!("Failed to create geolocation client: {}", e))
            .ok();

        Self {
            client,
            url: url.into(),
            enabled: true,
        }
    }

    /// A lookup that always reports the permission as denied.
    pub fn denied() -> Self {
        Self {
            client: None,
            url: String::new(),
            enabled: false,
        }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        if !config.allow_network_lookup {
            return Self::denied();
        }
        Self::new(
            config.lookup_url.clone(),
            Duration::from_secs(config.lookup_timeout_secs),
        )
    }
}

impl CoordinateProvider for IpGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        if !self.enabled {
            return Err(GeolocationError::PermissionDenied);
        }
        let client = self.client.as_ref().ok_or(GeolocationError::Unknown)?;

        let response = client.get(&self.url).send().await.map_err(|e| {
            tracing::debug!("Position lookup request failed: {}", e);
            lookup_failure(e)
        })?;

        if !response.status().is_success() {
            tracing::debug!("Position lookup returned status {}", response.status());
            return Err(GeolocationError::PositionUnavailable);
        }

        let body: IpLookupResponse = response.json().await.map_err(|e| {
            tracing::debug!("Position lookup parse error: {}", e);
            lookup_failure(e)
        })?;

        if body.status.as_deref() != Some("success") {
            tracing::debug!(
                "Position lookup failed: {}",
                body.message.as_deref().unwrap_or("no message")
            );
            return Err(GeolocationError::PositionUnavailable);
        }

        let (lat, lon) = body
            .lat
            .zip(body.lon)
            .ok_or(GeolocationError::PositionUnavailable)?;
        let position =
            Coordinates::new(lat, lon).map_err(|_| GeolocationError::PositionUnavailable)?;

        tracing::info!(
            "Located near {}",
            body.city.as_deref().unwrap_or("an unnamed place")
        );
        Ok(position)
    }
}

fn lookup_failure(e: reqwest::Error) -> GeolocationError {
    match e.into_network_error() {
        NetworkError::Timeout => GeolocationError::Timeout,
        _ => GeolocationError::Unknown,
    }
}

/// Whichever coordinate source applies
#[derive(Debug, Clone)]
pub enum PositionSource {
    Fixed(FixedPosition),
    Lookup(IpGeolocation),
}

impl CoordinateProvider for PositionSource {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            PositionSource::Fixed(p) => p.current_position().await,
            PositionSource::Lookup(p) => p.current_position().await,
        }
    }
}

/// Prefer an explicit position, then the configured one, then a network lookup.
pub fn resolve_provider(config: &LocationConfig, explicit: Option<(f64, f64)>) -> PositionSource {
    match explicit.or_else(|| config.fixed_position()) {
        Some((lat, lon)) => PositionSource::Fixed(FixedPosition::new(lat, lon)),
        None => PositionSource::Lookup(IpGeolocation::from_config(config)),
    }
}
