use super::image::ImageData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trained character identity. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterIdentity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub thumbnail: ImageData,
    pub created_at: DateTime<Utc>,
}

impl CharacterIdentity {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        thumbnail: ImageData,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            thumbnail,
            created_at: Utc::now(),
        }
    }
}
