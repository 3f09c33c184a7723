//! Image format sniffing and embedded payload parsing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use super::MediaError;

/// Image formats recognised from a payload header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    /// Infer the format from a payload header such as `data:image/webp;base64`.
    ///
    /// Falls back to PNG when nothing matches.
    pub fn sniff(header: &str) -> Self {
        let header = header.to_ascii_lowercase();
        if header.contains("jpeg") || header.contains("jpg") {
            ImageFormat::Jpeg
        } else if header.contains("png") {
            ImageFormat::Png
        } else if header.contains("webp") {
            ImageFormat::Webp
        } else if header.contains("gif") {
            ImageFormat::Gif
        } else {
            ImageFormat::Png
        }
    }

    /// File extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Png => ".png",
            ImageFormat::Webp => ".webp",
            ImageFormat::Gif => ".gif",
        }
    }
}

/// Marker that distinguishes an embedded payload from a reference
pub const DATA_URL_PREFIX: &str = "data:";

/// An inline image: header declaring the format plus a base64 body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedPayload<'a> {
    header: &'a str,
    body: &'a str,
}

impl<'a> EmbeddedPayload<'a> {
    /// Whether `value` carries inline data rather than a reference
    pub fn is_embedded(value: &str) -> bool {
        value.starts_with(DATA_URL_PREFIX)
    }

    /// Parse a `data:<header>,<body>` URL
    pub fn parse(value: &'a str) -> Result<Self, MediaError> {
        if !Self::is_embedded(value) {
            return Err(MediaError::MalformedPayload(
                "payload is not a data URL".to_string(),
            ));
        }
        let (header, body) = value.split_once(',').ok_or_else(|| {
            MediaError::MalformedPayload("data URL has no ',' separator".to_string())
        })?;
        Ok(Self { header, body })
    }

    /// Parse a data URL, or treat anything else as a bare base64 body
    pub fn parse_lenient(value: &'a str) -> Result<Self, MediaError> {
        if Self::is_embedded(value) {
            Self::parse(value)
        } else {
            Ok(Self {
                header: "",
                body: value,
            })
        }
    }

    pub fn header(&self) -> &'a str {
        self.header
    }

    pub fn format(&self) -> ImageFormat {
        ImageFormat::sniff(self.header)
    }

    /// Decode the body; ASCII whitespace (line-wrapped base64) is ignored
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        let compact: String = self
            .body
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        BASE64
            .decode(compact.as_bytes())
            .map_err(|e| MediaError::MalformedPayload(format!("invalid base64: {}", e)))
    }
}
