use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "3:4")]
    ClassicPortrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Classic,
        AspectRatio::ClassicPortrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::ClassicPortrait => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| StudioError::InvalidInput(format!("Unsupported aspect ratio: {}", s)))
    }
}

/// An input image, normalized to a mime type plus a bare base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Accepts either `data:<mime>;base64,<payload>` or a raw base64 payload.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(rest) = input.strip_prefix("data:") {
            if let Some((header, payload)) = rest.split_once(',') {
                let mime_type = header
                    .split(';')
                    .next()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_MIME_TYPE);
                return Self::new(mime_type, payload);
            }
        }
        // Anything with a comma but no data: prefix keeps the text after it.
        match input.split_once(',') {
            Some((_, payload)) if !payload.is_empty() => Self::new(DEFAULT_MIME_TYPE, payload),
            _ => Self::new(DEFAULT_MIME_TYPE, input),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A generated image as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    pub mime_type: String,
    pub data: String,
    pub model: String,
}

impl ImageArtifact {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| StudioError::ResponseError(format!("Invalid base64 image: {}", e)))
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

impl From<ImageArtifact> for ImageData {
    fn from(artifact: ImageArtifact) -> Self {
        ImageData::new(artifact.mime_type, artifact.data)
    }
}

/// Image-editing utilities applied to a base image.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOperation {
    FaceSwap { face: ImageData },
    Upscale,
    Background { prompt: Option<String> },
    Outpaint { aspect_ratio: AspectRatio },
}

impl EditOperation {
    pub fn name(&self) -> &'static str {
        match self {
            EditOperation::FaceSwap { .. } => "FACESWAP",
            EditOperation::Upscale => "UPSCALE",
            EditOperation::Background { .. } => "BACKGROUND",
            EditOperation::Outpaint { .. } => "OUTPAINT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait);
        assert_eq!(" 4:3 ".parse::<AspectRatio>().unwrap(), AspectRatio::Classic);
        assert!("21:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_aspect_ratio_serde() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
        let back: AspectRatio = serde_json::from_str("\"3:4\"").unwrap();
        assert_eq!(back, AspectRatio::ClassicPortrait);
    }

    #[test]
    fn test_parse_data_url() {
        let image = ImageData::parse("data:image/jpeg;base64,QUJD");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "QUJD");
    }

    #[test]
    fn test_parse_raw_payload() {
        let image = ImageData::parse("QUJD");
        assert_eq!(image.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(image.data, "QUJD");
        assert_eq!(image.to_data_url(), "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_from_bytes_and_decode() {
        let image = ImageData::from_bytes("image/png", b"hello");
        let artifact = ImageArtifact {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
            model: "test".into(),
        };
        assert_eq!(artifact.decode().unwrap(), b"hello");
        assert_eq!(artifact.extension(), "png");
    }

    #[test]
    fn test_decode_invalid_payload() {
        let artifact = ImageArtifact {
            mime_type: "image/png".into(),
            data: "not base64!!".into(),
            model: "test".into(),
        };
        assert!(matches!(artifact.decode(), Err(StudioError::ResponseError(_))));
    }
}
