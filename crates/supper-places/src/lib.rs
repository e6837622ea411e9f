//! Nearby restaurant recommendations for Supper.
//!
//! Asks Gemini with the Google Maps grounding tool for dinner places around a
//! position and turns the grounding chunks into [`PlaceResult`]s.

pub mod fetcher;
pub mod gemini;
pub mod image;
pub mod location;
pub mod provider;
pub mod types;

pub use fetcher::RecommendationFetcher;
pub use image::{ImageResolver, PlaceholderImages};
pub use location::{
    resolve_provider, CoordinateProvider, FixedPosition, IpGeolocation, PositionSource,
};
pub use provider::GeminiProvider;
pub use types::*;
