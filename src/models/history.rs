use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Image,
    Code,
    Story,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationContent {
    /// A single data URL or a code string.
    Single(String),
    /// Story frames as data URLs.
    Frames(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub model: String,
    pub style: Option<String>,
    pub character_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationItem {
    pub id: String,
    pub kind: GenerationKind,
    pub content: GenerationContent,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<GenerationMetadata>,
}

impl GenerationItem {
    pub fn new(kind: GenerationKind, content: GenerationContent, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content,
            prompt: prompt.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: GenerationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
