use super::api::ContentApi;
use crate::{
    error::{Result, StudioError},
    models::{
        ComposedRequest, EditOperation, GenerateContentRequest, GenerateContentResponse,
        GenerationConfig, ImageArtifact, ImageData, Part,
    },
    pipeline::{aspect_hint, ImageGenerator},
};
use async_trait::async_trait;
use std::sync::Arc;

const DEFAULT_BACKGROUND_PROMPT: &str = "Change background to a clean studio setting.";

#[derive(Clone)]
pub struct ImageClient {
    api: Arc<ContentApi>,
    model: String,
}

impl ImageClient {
    pub fn new(api: Arc<ContentApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, request: &ComposedRequest) -> Result<ImageArtifact> {
        log::info!(
            "Generating {} image with {} reference(s) on {}",
            request.aspect_ratio,
            request.attachment_count(),
            self.model
        );

        let payload = GenerateContentRequest::new(request.parts.clone())
            .with_config(GenerationConfig::image(request.aspect_ratio));
        let response = self.api.generate_content(&self.model, &payload).await?;
        self.first_image(&response)
    }

    /// Runs an editing utility against `base`.
    pub async fn edit(&self, base: &ImageData, operation: &EditOperation) -> Result<ImageArtifact> {
        if base.is_empty() {
            return Err(StudioError::InvalidInput("Base image is empty".into()));
        }

        let mut parts = vec![Part::image(base)];
        let mut config = None;

        let instruction = match operation {
            EditOperation::FaceSwap { face } => {
                if face.is_empty() {
                    return Err(StudioError::InvalidInput("Face image is empty".into()));
                }
                parts.push(Part::image(face));
                "Swap the face of the person in the first image with the face from the \
                 second image. Keep pose, lighting, hair and clothing of the first image."
                    .to_string()
            }
            EditOperation::Upscale => {
                "High resolution, highly detailed, 4k remastered version of this image.".to_string()
            }
            EditOperation::Background { prompt } => prompt
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_BACKGROUND_PROMPT)
                .to_string(),
            EditOperation::Outpaint { aspect_ratio } => {
                config = Some(GenerationConfig::image(*aspect_ratio));
                format!(
                    "Extend this image to fill a {} frame ({}). Continue the existing scene \
                     seamlessly beyond the original borders without changing the original content.",
                    aspect_ratio,
                    aspect_hint(aspect_ratio.as_str())
                )
            }
        };
        parts.push(Part::text(instruction));

        log::info!("Running {} edit on {}", operation.name(), self.model);

        let mut payload = GenerateContentRequest::new(parts);
        if let Some(config) = config {
            payload = payload.with_config(config);
        }
        let response = self.api.generate_content(&self.model, &payload).await?;
        self.first_image(&response)
    }

    fn first_image(&self, response: &GenerateContentResponse) -> Result<ImageArtifact> {
        let image = response.first_inline_image().ok_or_else(|| {
            log::warn!(
                "No inline image in response (finish reason: {})",
                response.finish_reason().unwrap_or("none")
            );
            StudioError::NoImageReturned
        })?;

        Ok(ImageArtifact {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
            model: self.model.clone(),
        })
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate_image(&self, request: &ComposedRequest) -> Result<ImageArtifact> {
        self.generate(request).await
    }
}
