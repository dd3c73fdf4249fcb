//! Property image gallery rules.
//!
//! Images are stored as an ordered JSON array on the property row. At most
//! [`MAX_IMAGES`] are allowed and at most one may be flagged as the main
//! image; when none is flagged the first image is used.

use serde::{Deserialize, Serialize};

/// Maximum number of images per property.
pub const MAX_IMAGES: usize = 10;

/// Shown when a property has no images at all.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1564013799919-ab600027ffc6?w=800&h=600&fit=crop";

/// One gallery entry. Serialized with the `isMain` key the browser client uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyImage {
    pub url: String,
    #[serde(default)]
    pub tag: String,
    #[serde(rename = "isMain", default)]
    pub is_main: bool,
}

/// Validate a gallery before it is persisted.
pub fn validate_images(images: &[PropertyImage]) -> Result<(), String> {
    if images.len() > MAX_IMAGES {
        return Err(format!(
            "A property may have at most {MAX_IMAGES} images, got {}",
            images.len()
        ));
    }
    if let Some(index) = images.iter().position(|img| img.url.trim().is_empty()) {
        return Err(format!("Image {index} has an empty url"));
    }
    let main_count = images.iter().filter(|img| img.is_main).count();
    if main_count > 1 {
        return Err(format!(
            "At most one image may be marked as main, got {main_count}"
        ));
    }
    Ok(())
}

/// Flag the first image as main when none is flagged.
pub fn normalize_main(images: &mut [PropertyImage]) {
    if !images.iter().any(|img| img.is_main) {
        if let Some(first) = images.first_mut() {
            first.is_main = true;
        }
    }
}

/// URL of the image to show on the listing card.
pub fn main_image_url(images: &[PropertyImage]) -> &str {
    images
        .iter()
        .find(|img| img.is_main)
        .or_else(|| images.first())
        .map(|img| img.url.as_str())
        .unwrap_or(PLACEHOLDER_IMAGE_URL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, is_main: bool) -> PropertyImage {
        PropertyImage {
            url: url.to_string(),
            tag: String::new(),
            is_main,
        }
    }

    #[test]
    fn test_too_many_images_rejected() {
        let images: Vec<_> = (0..=MAX_IMAGES).map(|i| image(&format!("u{i}"), false)).collect();
        assert!(validate_images(&images).unwrap_err().contains("at most"));
    }

    #[test]
    fn test_two_main_images_rejected() {
        let images = vec![image("a", true), image("b", true)];
        assert!(validate_images(&images).is_err());
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(validate_images(&[image("  ", false)]).is_err());
    }

    #[test]
    fn test_main_image_fallbacks() {
        assert_eq!(main_image_url(&[]), PLACEHOLDER_IMAGE_URL);
        assert_eq!(main_image_url(&[image("a", false), image("b", false)]), "a");
        assert_eq!(main_image_url(&[image("a", false), image("b", true)]), "b");
    }

    #[test]
    fn test_normalize_flags_first() {
        let mut images = vec![image("a", false), image("b", false)];
        normalize_main(&mut images);
        assert!(images[0].is_main);
        assert!(!images[1].is_main);
    }

    #[test]
    fn test_is_main_uses_camel_case_key() {
        let json = r#"{"url":"x","isMain":true}"#;
        let img: PropertyImage = serde_json::from_str(json).unwrap();
        assert!(img.is_main);
        assert_eq!(img.tag, "");
    }
}
