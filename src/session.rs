//! One locate-then-recommend cycle at a time.
//!
//! The session owns the state a front-end renders: a busy flag, the current
//! phase, and either the results or a single error message.

use parking_lot::Mutex;
use supper_core::Locale;
use supper_places::{CoordinateProvider, PlaceResult, RecommendationFetcher};
use tokio::sync::Semaphore;

use crate::messages;

/// What a front-end should show right now
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FinderState {
    #[default]
    Idle,
    Locating,
    Searching,
    Loaded(Vec<PlaceResult>),
    /// The search worked but nothing was recommended
    Empty,
    Failed(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A search is already in progress")]
    Busy,
}

type StatusListener = Box<dyn Fn(&str) + Send + Sync>;

pub struct FinderSession {
    in_flight: Semaphore,
    state: Mutex<FinderState>,
    locale: Locale,
    on_status: Option<StatusListener>,
}

impl FinderSession {
    pub fn new(locale: Locale) -> Self {
        Self {
            in_flight: Semaphore::new(1),
            state: Mutex::new(FinderState::Idle),
            locale,
            on_status: None,
        }
    }

    /// Called with the progress message each time the phase changes.
    pub fn with_status_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_status = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> FinderState {
        self.state.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    /// Run one full cycle. Returns [`SessionError::Busy`] without touching
    /// state when a cycle is already outstanding.
    pub async fn find<P>(
        &self,
        coordinates: &P,
        fetcher: &RecommendationFetcher,
    ) -> Result<FinderState, SessionError>
    where
        P: CoordinateProvider,
    {
        let _permit = self.in_flight.try_acquire().map_err(|_| {
            tracing::debug!("Ignoring search request while busy");
            SessionError::Busy
        })?;

        self.enter(FinderState::Locating, messages::locating(self.locale));

        let position = match coordinates.current_position().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Could not get position: {}", e);
                let message = messages::geolocation(self.locale, e).to_string();
                return Ok(self.finish(FinderState::Failed(message)));
            }
        };
        tracing::info!("Got location: {}", position);

        self.enter(FinderState::Searching, messages::searching(self.locale));

        let next = match fetcher.fetch_nearby_places(position).await {
            Ok(places) if places.is_empty() => FinderState::Empty,
            Ok(places) => FinderState::Loaded(places),
            Err(e) => FinderState::Failed(e.to_string()),
        };

        Ok(self.finish(next))
    }

    fn enter(&self, phase: FinderState, status: &str) {
        *self.state.lock() = phase;
        if let Some(listener) = &self.on_status {
            listener(status);
        }
    }

    fn finish(&self, outcome: FinderState) -> FinderState {
        *self.state.lock() = outcome.clone();
        outcome
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::sync::Arc;
    use supper_core::{Config, GeminiConfig, GeolocationError};
    use supper_places::{Coordinates, FixedPosition};
    use tokio::sync::Notify;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Failing(GeolocationError);

    impl CoordinateProvider for Failing {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            Err(self.0)
        }
    }

    /// Holds the position back until released.
    struct Gated(Arc<Notify>);

    impl CoordinateProvider for Gated {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            self.0.notified().await;
            Err(GeolocationError::Timeout)
        }
    }

    fn fetcher(base_url: &str, api_key: Option<&str>) -> RecommendationFetcher {
        let config = Config {
            gemini: GeminiConfig {
                api_key: api_key.map(str::to_string),
                base_url: base_url.to_string(),
                ..GeminiConfig::default()
            },
            ..Config::default()
        };
        RecommendationFetcher::new(&config).unwrap()
    }

    async fn provider_returning(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_loaded() {
        let server = provider_returning(serde_json::json!({
            "candidates": [{ "groundingMetadata": { "groundingChunks": [
                { "maps": { "title": "Din Tai Fung", "uri": "https://maps.google.com/?cid=1" } }
            ] } }]
        }))
        .await;

        let session = FinderSession::new(Locale::En);
        let state = session
            .find(&FixedPosition::new(25.03, 121.56), &fetcher(&server.uri(), Some("k")))
            .await
            .unwrap();

        match state {
            FinderState::Loaded(places) => assert_eq!(places[0].display_name, "Din Tai Fung"),
            other => unreachable!("unexpected state {other:?}"),
        }
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_empty_is_not_failure() {
        let server = provider_returning(serde_json::json!({ "candidates": [] })).await;

        let session = FinderSession::new(Locale::En);
        let state = session
            .find(&FixedPosition::new(0.0, 0.0), &fetcher(&server.uri(), Some("k")))
            .await
            .unwrap();
        assert_eq!(state, FinderState::Empty);
    }

    #[tokio::test]
    async fn test_geolocation_failure_skips_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = FinderSession::new(Locale::ZhTw);
        let state = session
            .find(
                &Failing(GeolocationError::PermissionDenied),
                &fetcher(&server.uri(), Some("k")),
            )
            .await
            .unwrap();

        assert_eq!(
            state,
            FinderState::Failed(
                messages::geolocation(Locale::ZhTw, GeolocationError::PermissionDenied)
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_denied_location_shows_settings_hint() {
        let session = FinderSession::new(Locale::En);
        let state = session
            .find(
                &Failing(GeolocationError::PermissionDenied),
                &fetcher("http://127.0.0.1:9", Some("k")),
            )
            .await
            .unwrap();

        assert_eq!(
            state,
            FinderState::Failed(
                "You denied location access. Please enable it in your settings.".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_verbatim() {
        let session = FinderSession::new(Locale::En);
        let state = session
            .find(&FixedPosition::new(0.0, 0.0), &fetcher("http://127.0.0.1:9", None))
            .await
            .unwrap();
        assert_eq!(
            state,
            FinderState::Failed("GEMINI_API_KEY environment variable not set".to_string())
        );
    }

    #[tokio::test]
    async fn test_provider_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "code": 429, "message": "rate limited" }
            })))
            .mount(&server)
            .await;

        let session = FinderSession::new(Locale::En);
        let state = session
            .find(&FixedPosition::new(0.0, 0.0), &fetcher(&server.uri(), Some("k")))
            .await
            .unwrap();
        assert_eq!(
            state,
            FinderState::Failed("Failed to get recommendations: rate limited".to_string())
        );
    }

    #[tokio::test]
    async fn test_new_cycle_clears_previous_outcome() {
        let server = provider_returning(serde_json::json!({
            "candidates": [{ "groundingMetadata": { "groundingChunks": [
                { "maps": { "title": "A", "uri": "u1" } }
            ] } }]
        }))
        .await;
        let fetcher = fetcher(&server.uri(), Some("k"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let session = FinderSession::new(Locale::En)
            .with_status_listener(move |s| log.lock().push(s.to_string()));

        let first = session
            .find(&Failing(GeolocationError::Unknown), &fetcher)
            .await
            .unwrap();
        assert!(matches!(first, FinderState::Failed(_)));

        let second = session
            .find(&FixedPosition::new(1.0, 1.0), &fetcher)
            .await
            .unwrap();
        assert!(matches!(second, FinderState::Loaded(ref p) if p.len() == 1));
        assert_eq!(session.state(), second);

        assert_eq!(
            *seen.lock(),
            vec![
                messages::locating(Locale::En).to_string(),
                messages::locating(Locale::En).to_string(),
                messages::searching(Locale::En).to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_request_while_busy_is_rejected() {
        let gate = Arc::new(Notify::new());
        let session = FinderSession::new(Locale::En);
        let fetcher = fetcher("http://127.0.0.1:9", Some("k"));
        let gated = Gated(Arc::clone(&gate));

        let (first, second, _) = tokio::join!(
            session.find(&gated, &fetcher),
            async {
                tokio::task::yield_now().await;
                assert!(session.is_busy());
                assert_eq!(session.state(), FinderState::Locating);
                session.find(&FixedPosition::new(0.0, 0.0), &fetcher).await
            },
            async {
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                gate.notify_one();
            }
        );

        assert_eq!(second, Err(SessionError::Busy));
        assert_eq!(
            first.unwrap(),
            FinderState::Failed(
                messages::geolocation(Locale::En, GeolocationError::Timeout).to_string()
            )
        );
        assert!(!session.is_busy());
    }
}
