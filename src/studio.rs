use crate::{
    config::{Config, PipelineConfig},
    error::{Result, StudioError},
    gemini::GeminiClient,
    models::{
        CharacterIdentity, EditOperation, GenerationContent, GenerationItem, GenerationKind,
        GenerationMetadata, GenerationOptions, GenerationRequest, ImageArtifact, ImageData,
    },
    pipeline::BatchOrchestrator,
    registry::{CharacterRegistry, GenerationHistory},
};
use std::sync::Arc;

/// One user session: the API handle, the batch pipeline and the in-memory state.
///
/// Session state changes only here, and only once a call has resolved.
pub struct Studio {
    client: GeminiClient,
    orchestrator: BatchOrchestrator,
    characters: CharacterRegistry,
    history: GenerationHistory,
}

impl Studio {
    pub fn new(client: GeminiClient, pipeline: PipelineConfig) -> Self {
        let client = client.with_generation_timeout(pipeline.generation_timeout);
        let orchestrator = BatchOrchestrator::new(
            Arc::new(client.image().clone()),
            Arc::new(client.text().clone()),
            pipeline,
        );
        Self::with_orchestrator(client, orchestrator)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let client = GeminiClient::new(config.gemini)?;
        Ok(Self::new(client, config.pipeline))
    }

    pub fn with_orchestrator(client: GeminiClient, orchestrator: BatchOrchestrator) -> Self {
        Self {
            client,
            orchestrator,
            characters: CharacterRegistry::new(),
            history: GenerationHistory::new(),
        }
    }

    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator {
        &self.orchestrator
    }

    pub fn characters(&self) -> &CharacterRegistry {
        &self.characters
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    pub async fn train_character(
        &mut self,
        name: &str,
        images: &[ImageData],
    ) -> Result<Arc<CharacterIdentity>> {
        let character = self.client.train_character(name, images).await?;
        log::info!("Trained character '{}' ({})", character.name, character.id);
        Ok(self.characters.add(character))
    }

    pub fn remove_character(&mut self, id: &str) -> Option<Arc<CharacterIdentity>> {
        self.characters.remove(id)
    }

    /// Generation options preloaded with a registered character.
    pub fn options_for_character(&self, id: &str) -> Result<GenerationOptions> {
        let character = self
            .characters
            .get(id)
            .ok_or_else(|| StudioError::InvalidInput(format!("Unknown character: {}", id)))?;
        Ok(GenerationOptions::new().with_character(character.as_ref().clone()))
    }

    /// Single image, bounded by the pipeline's generation deadline. Failures,
    /// including the deadline, are returned to the caller.
    pub async fn generate_image(&mut self, request: &GenerationRequest) -> Result<ImageArtifact> {
        let artifact = self
            .orchestrator
            .generate_single(&request.compose())
            .await?;

        self.history.record(
            GenerationItem::new(
                GenerationKind::Image,
                GenerationContent::Single(artifact.to_data_url()),
                request.scene_text.clone(),
            )
            .with_metadata(self.metadata(&request.options)),
        );
        Ok(artifact)
    }

    pub async fn edit_image(
        &self,
        base: &ImageData,
        operation: &EditOperation,
    ) -> Result<ImageArtifact> {
        self.client.edit_image(base, operation).await
    }

    pub async fn generate_code(&mut self, prompt: &str) -> Result<String> {
        let code = self.client.generate_component_code(prompt).await?;
        self.history.record(
            GenerationItem::new(
                GenerationKind::Code,
                GenerationContent::Single(code.clone()),
                prompt,
            )
            .with_metadata(GenerationMetadata {
                model: self.client.text().model().to_string(),
                ..Default::default()
            }),
        );
        Ok(code)
    }

    /// Script to frames. Partial output is returned as-is; the story lands in the
    /// history only when at least one frame was produced.
    pub async fn generate_story<F>(
        &mut self,
        script: &str,
        frame_count: usize,
        options: &GenerationOptions,
        on_progress: F,
    ) -> Result<Vec<ImageArtifact>>
    where
        F: FnMut(usize, usize) + Send,
    {
        if script.trim().is_empty() {
            return Err(StudioError::InvalidInput("Script is empty".into()));
        }

        let frames = self
            .orchestrator
            .generate_story(script, frame_count, options, on_progress)
            .await;

        if frames.len() < frame_count {
            log::warn!(
                "Story finished with {}/{} frames",
                frames.len(),
                frame_count
            );
        }

        if !frames.is_empty() {
            self.history.record(
                GenerationItem::new(
                    GenerationKind::Story,
                    GenerationContent::Frames(frames.iter().map(|f| f.to_data_url()).collect()),
                    script,
                )
                .with_metadata(self.metadata(options)),
            );
        }
        Ok(frames)
    }

    fn metadata(&self, options: &GenerationOptions) -> GenerationMetadata {
        GenerationMetadata {
            model: self.client.image().model().to_string(),
            style: Some(options.style_preset.clone()).filter(|s| !s.is_empty()),
            character_id: options.character.as_ref().map(|c| c.id.clone()),
        }
    }
}
