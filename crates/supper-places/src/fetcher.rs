//! Recommendation fetcher: coordinates in, restaurant cards out.

use std::sync::Arc;

use supper_core::Config;
use tracing::instrument;

use crate::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::image::{ImageResolver, PlaceholderImages};
use crate::provider::GeminiProvider;
use crate::types::{Coordinates, PlaceResult, PlacesError};

/// Prompt sent with every request.
pub const DINNER_PROMPT: &str =
    "推薦我附近適合吃晚餐的餐廳 (Recommend some good dinner restaurants near me)";

pub struct RecommendationFetcher {
    provider: GeminiProvider,
    api_key: Option<String>,
    images: Arc<dyn ImageResolver>,
}

impl RecommendationFetcher {
    /// Build a fetcher from configuration. A missing API key is not an error
    /// here; it fails each fetch instead.
    pub fn new(config: &Config) -> Result<Self, PlacesError> {
        let provider = GeminiProvider::new(&config.gemini)?;

        Ok(Self {
            provider,
            api_key: config.gemini.api_key().map(str::to_string),
            images: Arc::new(PlaceholderImages::from(&config.images)),
        })
    }

    /// Replace the placeholder image source.
    pub fn with_image_resolver(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.images = images;
        self
    }

    /// Ask the provider for dinner places near `coordinates`.
    ///
    /// An answer without grounding chunks is an empty list, not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_nearby_places(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(PlacesError::missing_api_key)?;

        let request = GenerateContentRequest::maps_grounded(DINNER_PROMPT, coordinates);

        let response = self
            .provider
            .generate_content(api_key, &request)
            .await
            .map_err(|e| {
                tracing::error!("Error fetching from Gemini API: {}", e);
                PlacesError::Fetch(e)
            })?;

        let places = places_from_response(&response, self.images.as_ref());
        tracing::info!(
            model = self.provider.model(),
            count = places.len(),
            "Fetched nearby places"
        );
        Ok(places)
    }
}

/// Turn the first candidate's grounding chunks into places, dropping chunks
/// without a map title and URI. Image seeds count surviving chunks only.
pub fn places_from_response(
    response: &GenerateContentResponse,
    images: &dyn ImageResolver,
) -> Vec<PlaceResult> {
    let chunks = response.first_grounding_chunks();

    let places: Vec<PlaceResult> = chunks
        .iter()
        .filter_map(|chunk| chunk.place())
        .enumerate()
        .map(|(index, (title, uri))| PlaceResult {
            display_name: title.to_string(),
            reference_uri: uri.to_string(),
            image_url: images.image_url(index + 1, title),
        })
        .collect();

    let dropped = chunks.len() - places.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Skipped grounding chunks without a place");
    }

    places
}
