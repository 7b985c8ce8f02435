//! Logo embedding for rendered HTML

use crate::{PdfError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use tracing::{debug, warn};

/// Attribute the logo is referenced by in receipt templates
pub const LOGO_PLACEHOLDER: &str = r#"src="logo.png""#;

/// How many leading bytes are inspected when looking for an `<svg` root
const SVG_SNIFF_LEN: usize = 1024;

/// Detected logo format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFormat {
    Svg,
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl LogoFormat {
    /// MIME type used in the `data:` URI
    pub fn mime(self) -> &'static str {
        match self {
            LogoFormat::Svg => "image/svg+xml",
            LogoFormat::Png => "image/png",
            LogoFormat::Jpeg => "image/jpeg",
            LogoFormat::Gif => "image/gif",
            LogoFormat::WebP => "image/webp",
        }
    }
}

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detect the logo format from its bytes
pub fn detect_format(data: &[u8]) -> Result<LogoFormat> {
    if looks_like_svg(data) {
        return Ok(LogoFormat::Svg);
    }

    match image::guess_format(data)? {
        image::ImageFormat::Png => Ok(LogoFormat::Png),
        image::ImageFormat::Jpeg => Ok(LogoFormat::Jpeg),
        image::ImageFormat::Gif => Ok(LogoFormat::Gif),
        image::ImageFormat::WebP => Ok(LogoFormat::WebP),
        other => Err(PdfError::ImageError(format!(
            "Unsupported logo format: {other:?}"
        ))),
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(SVG_SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || ((text.starts_with("<?xml") || text.starts_with("<!--")) && text.contains("<svg"))
}

/// A logo image ready to be inlined into HTML
#[derive(Debug, Clone)]
pub struct LogoAsset {
    format: LogoFormat,
    encoded: String,
}

impl LogoAsset {
    /// Build from raw image bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = detect_format(data)?;
        Ok(Self {
            format,
            encoded: BASE64.encode(data),
        })
    }

    /// Load from a file
    ///
    /// A missing or unreadable logo is not an error for document generation:
    /// it is logged and `None` is returned so documents render without a logo.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "logo not readable, rendering without it");
                return None;
            }
        };

        match Self::from_bytes(&data) {
            Ok(logo) => {
                debug!(path = %path.display(), mime = logo.mime(), bytes = data.len(), "logo loaded");
                Some(logo)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "logo not usable, rendering without it");
                None
            }
        }
    }

    /// Detected format
    pub fn format(&self) -> LogoFormat {
        self.format
    }

    /// MIME type of the image
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `data:` URI for the image
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime(), self.encoded)
    }

    /// Replace every `src="logo.png"` in `html` with the inline image
    pub fn embed(&self, html: &str) -> String {
        html.replace(LOGO_PLACEHOLDER, &format!(r#"src="{}""#, self.data_uri()))
    }
}

/// Inline the logo if one is available, otherwise return the HTML unchanged
pub fn embed_logo(html: String, logo: Option<&LogoAsset>) -> String {
    match logo {
        Some(logo) => logo.embed(&html),
        None => html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#;

    #[test]
    fn test_detect_svg() {
        assert_eq!(detect_format(SVG.as_bytes()).unwrap(), LogoFormat::Svg);
        let with_prolog = format!("<?xml version=\"1.0\"?>\n{SVG}");
        assert_eq!(detect_format(with_prolog.as_bytes()).unwrap(), LogoFormat::Svg);
    }

    #[test]
    fn test_detect_raster_formats() {
        assert_eq!(detect_format(&PNG_HEADER).unwrap(), LogoFormat::Png);
        assert_eq!(
            detect_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]).unwrap(),
            LogoFormat::Jpeg
        );
        assert_eq!(detect_format(b"GIF89a\0\0").unwrap(), LogoFormat::Gif);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format(b"hello world").is_err());
    }

    #[test]
    fn test_data_uri() {
        let logo = LogoAsset::from_bytes(SVG.as_bytes()).unwrap();
        let uri = logo.data_uri();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        let payload = uri.trim_start_matches("data:image/svg+xml;base64,");
        assert_eq!(BASE64.decode(payload).unwrap(), SVG.as_bytes());
    }

    #[test]
    fn test_embed_replaces_placeholder() {
        let logo = LogoAsset::from_bytes(&PNG_HEADER).unwrap();
        let html = r#"<img src="logo.png" class="logo"><img src="other.png">"#;
        let embedded = logo.embed(html);
        assert!(embedded.starts_with(r#"<img src="data:image/png;base64,"#));
        assert!(embedded.contains(r#"<img src="other.png">"#));
        assert!(!embedded.contains(LOGO_PLACEHOLDER));
    }

    #[test]
    fn test_missing_logo_file() {
        assert!(LogoAsset::load("/definitely/not/here/logo.svg").is_none());
    }

    #[test]
    fn test_embed_without_logo_is_unchanged() {
        let html = r#"<img src="logo.png">"#.to_string();
        assert_eq!(embed_logo(html.clone(), None), html);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.svg");
        std::fs::write(&path, SVG).unwrap();
        let logo = LogoAsset::load(&path).unwrap();
        assert_eq!(logo.format(), LogoFormat::Svg);
    }
}
