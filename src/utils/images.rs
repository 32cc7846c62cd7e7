use crate::error::FetchError;
use image::{GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

/// Check that a downloaded file really is a GIF and decodes cleanly.
///
/// Catches HTML error pages and placeholder images that slip past the size
/// threshold with a success status.
pub fn validate_gif(image_path: &Path) -> Result<(), FetchError> {
    let reader = ImageReader::open(image_path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| FetchError::InvalidContent {
            reason: format!("unreadable download: {}", e),
        })?;

    match reader.format() {
        Some(ImageFormat::Gif) => {}
        Some(other) => {
            return Err(FetchError::InvalidContent {
                reason: format!("expected GIF, got {:?}", other),
            })
        }
        None => {
            return Err(FetchError::InvalidContent {
                reason: "not an image".to_string(),
            })
        }
    }

    let img = reader.decode().map_err(|e| FetchError::InvalidContent {
        reason: format!("GIF decode failed: {}", e),
    })?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(FetchError::InvalidContent {
            reason: "GIF has invalid dimensions (0x0)".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Smallest well-formed GIF: one transparent pixel.
    pub(crate) const TINY_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF, 0xFF,
        0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
    ];

    #[test]
    fn accepts_real_gif() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dot.gif");
        std::fs::write(&path, TINY_GIF).unwrap();
        validate_gif(&path).unwrap();
    }

    #[test]
    fn rejects_html_page() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.gif");
        std::fs::write(&path, b"<!DOCTYPE html><html><body>Not Found</body></html>").unwrap();
        assert!(matches!(
            validate_gif(&path),
            Err(FetchError::InvalidContent { .. })
        ));
    }

    #[test]
    fn rejects_truncated_gif() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cut.gif");
        std::fs::write(&path, &TINY_GIF[..20]).unwrap();
        assert!(validate_gif(&path).is_err());
    }
}
