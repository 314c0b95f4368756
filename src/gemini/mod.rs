pub mod api;
pub mod image_client;
pub mod text_client;

use crate::{
    config::{GeminiConfig, DEFAULT_GENERATION_TIMEOUT},
    error::{Result, StudioError},
    models::{
        CharacterIdentity, EditOperation, GenerationRequest, ImageArtifact, ImageData,
    },
};
use std::sync::Arc;
use std::time::Duration;

pub use api::ContentApi;
pub use image_client::ImageClient;
pub use text_client::{extract_code_block, TextClient};

/// Handle to the generative API. Build one at startup and pass it around.
#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
    generation_timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api = Arc::new(ContentApi::new(&config)?);

        log::info!(
            "Gemini client ready (image model: {}, text model: {})",
            config.image_model(),
            config.text_model()
        );

        Ok(Self {
            text_client: TextClient::new(api.clone(), config.text_model()),
            image_client: ImageClient::new(api, config.image_model()),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        })
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// Builds a character identity from reference photos. The first image becomes
    /// the thumbnail.
    pub async fn train_character(
        &self,
        name: &str,
        images: &[ImageData],
    ) -> Result<CharacterIdentity> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudioError::InvalidInput("Character name is required".into()));
        }
        let images: Vec<ImageData> = images.iter().filter(|i| !i.is_empty()).cloned().collect();
        let Some(thumbnail) = images.first().cloned() else {
            return Err(StudioError::InvalidInput(
                "At least one reference image is required".into(),
            ));
        };

        let description = self
            .text_client
            .describe_character(name, &images)
            .await
            .map_err(|e| {
                log::error!("Training failed for '{}': {}", name, e);
                e
            })?
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| format!("A character named {}", name));

        Ok(CharacterIdentity::new(name, description, thumbnail))
    }

    /// Single, non-batched generation bounded by the generation deadline. Errors,
    /// including the deadline, reach the caller.
    pub async fn generate_image(&self, request: &GenerationRequest) -> Result<ImageArtifact> {
        let deadline = self.generation_timeout;
        tokio::time::timeout(deadline, self.image_client.generate(&request.compose()))
            .await
            .map_err(|_| {
                log::warn!("Image generation abandoned after {}ms", deadline.as_millis());
                StudioError::Timeout(deadline)
            })?
    }

    pub async fn edit_image(
        &self,
        base: &ImageData,
        operation: &EditOperation,
    ) -> Result<ImageArtifact> {
        self.image_client.edit(base, operation).await
    }

    pub async fn generate_component_code(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(StudioError::InvalidInput("Prompt is required".into()));
        }
        self.text_client.generate_component_code(prompt).await
    }
}
