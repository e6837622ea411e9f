//! Terminal output for a finished search.

use std::fmt::Write as _;

use supper_core::Locale;
use supper_places::PlaceResult;

use crate::messages;

/// Plain-text cards, numbered in recommendation order.
pub fn cards(places: &[PlaceResult]) -> String {
    let mut out = String::new();
    for (i, place) in places.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", i + 1, place.display_name);
        let _ = writeln!(out, "    {}", place.reference_uri);
        let _ = writeln!(out, "    image: {}", place.image_url);
    }
    out
}

pub fn json(places: &[PlaceResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(places)
}

pub fn error(locale: Locale, message: &str) -> String {
    format!("{}\n{}", messages::error_heading(locale), message)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn place(name: &str, seed: usize) -> PlaceResult {
        PlaceResult {
            display_name: name.to_string(),
            reference_uri: format!("https://maps.google.com/?cid={seed}"),
            image_url: format!("https://picsum.photos/seed/{seed}/400/300"),
        }
    }

    #[test]
    fn test_cards_keep_order() {
        let text = cards(&[place("Noodle Bar", 1), place("Hot Pot", 2)]);
        let noodle = text.find("Noodle Bar").unwrap();
        let hot_pot = text.find("Hot Pot").unwrap();
        assert!(noodle < hot_pot);
        assert!(text.starts_with(" 1. Noodle Bar\n"));
        assert!(text.contains(" 2. Hot Pot\n    https://maps.google.com/?cid=2\n"));
    }

    #[test]
    fn test_cards_empty() {
        assert!(cards(&[]).is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let out = json(&[place("A", 1)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["display_name"], "A");
        assert_eq!(value[0]["image_url"], "https://picsum.photos/seed/1/400/300");
    }

    #[test]
    fn test_error_block() {
        assert_eq!(error(Locale::ZhTw, "boom"), "發生錯誤\nboom");
    }
}
