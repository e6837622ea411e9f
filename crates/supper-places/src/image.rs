//! Card image resolution.
//!
//! No photo source is integrated yet, so the default resolver hands out
//! deterministic placeholder images.

use supper_core::ImagesConfig;

const PLACEHOLDER_BASE: &str = "https://picsum.photos/seed";

/// Resolves the image shown on a place card.
///
/// `seed` is the 1-based position of the place in the returned list.
pub trait ImageResolver: Send + Sync {
    fn image_url(&self, seed: usize, display_name: &str) -> String;
}

/// Seeded placeholder images of a fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderImages {
    pub width: u32,
    pub height: u32,
}

impl PlaceholderImages {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PlaceholderImages {
    fn default() -> Self {
        Self::from(&ImagesConfig::default())
    }
}

impl From<&ImagesConfig> for PlaceholderImages {
    fn from(config: &ImagesConfig) -> Self {
        Self::new(config.width, config.height)
    }
}

impl ImageResolver for PlaceholderImages {
    fn image_url(&self, seed: usize, _display_name: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            PLACEHOLDER_BASE, seed, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_placeholder_size() {
        let images = PlaceholderImages::default();
        assert_eq!(
            images.image_url(1, "A"),
            "https://picsum.photos/seed/1/400/300"
        );
    }

    #[test]
    fn test_placeholder_depends_only_on_seed() {
        let images = PlaceholderImages::new(640, 480);
        assert_eq!(images.image_url(7, "A"), images.image_url(7, "B"));
        assert_ne!(images.image_url(7, "A"), images.image_url(8, "A"));
        assert_eq!(
            images.image_url(7, "A"),
            "https://picsum.photos/seed/7/640/480"
        );
    }
}
