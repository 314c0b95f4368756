use super::{
    composer::compose,
    script::split_script,
    traits::{ImageGenerator, SceneAnalyzer},
};
use crate::{
    config::PipelineConfig,
    error::{Result, StudioError},
    logger,
    models::{ComposedRequest, GenerationOptions, ImageArtifact},
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Runs one generation under a hard deadline. Every failure, including the
/// deadline, becomes `None` so a batch can carry on without the item.
pub async fn generate_one(
    generator: &dyn ImageGenerator,
    request: &ComposedRequest,
    deadline: Duration,
) -> Option<ImageArtifact> {
    match tokio::time::timeout(deadline, generator.generate_image(request)).await {
        Ok(Ok(artifact)) => Some(artifact),
        Ok(Err(e)) => {
            log::error!("Image generation failed: {}", e);
            None
        }
        Err(_) => {
            log::warn!(
                "Image generation abandoned after {}ms",
                deadline.as_millis()
            );
            None
        }
    }
}

/// Fans scene prompts out to the image model in fixed-size chunks.
///
/// Chunks run one after another; the scenes of a chunk run concurrently and the
/// chunk settles before the next one starts. Successful artifacts keep the input
/// order of their scenes. Failed scenes are dropped.
#[derive(Clone)]
pub struct BatchOrchestrator {
    generator: Arc<dyn ImageGenerator>,
    analyzer: Arc<dyn SceneAnalyzer>,
    config: PipelineConfig,
}

impl BatchOrchestrator {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        analyzer: Arc<dyn SceneAnalyzer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            analyzer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// One composed request under the generation deadline. Unlike batch items,
    /// failures are returned, with the deadline as `StudioError::Timeout`.
    pub async fn generate_single(&self, request: &ComposedRequest) -> Result<ImageArtifact> {
        let deadline = self.config.generation_timeout;
        tokio::time::timeout(deadline, self.generator.generate_image(request))
            .await
            .map_err(|_| {
                log::warn!("Image generation abandoned after {}ms", deadline.as_millis());
                StudioError::Timeout(deadline)
            })?
    }

    pub async fn generate_batch<S>(
        &self,
        scenes: &[S],
        options: &GenerationOptions,
    ) -> Vec<ImageArtifact>
    where
        S: AsRef<str> + Sync,
    {
        self.generate_batch_with_progress(scenes, options, |_, _| {})
            .await
    }

    /// `on_progress(attempted, total)` fires once per chunk. `attempted` counts
    /// scenes tried so far, not scenes that produced an image.
    pub async fn generate_batch_with_progress<S, F>(
        &self,
        scenes: &[S],
        options: &GenerationOptions,
        mut on_progress: F,
    ) -> Vec<ImageArtifact>
    where
        S: AsRef<str> + Sync,
        F: FnMut(usize, usize) + Send,
    {
        let total = scenes.len();
        if total == 0 {
            log::debug!("Batch requested with no scenes");
            return Vec::new();
        }

        let chunk_size = self.config.chunk_size.max(1);
        let deadline = self.config.generation_timeout;
        let _timer = logger::timer(&format!("batch of {} scenes", total));

        let mut completed = 0;
        let mut artifacts = Vec::with_capacity(total);

        for (index, chunk) in scenes.chunks(chunk_size).enumerate() {
            let generator = self.generator.as_ref();
            let attempts = chunk.iter().map(|scene| {
                let request = compose(scene.as_ref(), options);
                async move { generate_one(generator, &request, deadline).await }
            });

            let results = join_all(attempts).await;
            completed += chunk.len();

            let before = artifacts.len();
            artifacts.extend(results.into_iter().flatten());
            log::info!(
                "Chunk {} settled: {}/{} succeeded ({}/{} scenes attempted)",
                index + 1,
                artifacts.len() - before,
                chunk.len(),
                completed,
                total
            );

            on_progress(completed, total);
        }

        if artifacts.is_empty() {
            log::warn!("Batch produced no images ({} scenes attempted)", total);
        }

        artifacts
    }

    /// Splits `script` into exactly `frame_count` scenes.
    pub async fn split_script(&self, script: &str, frame_count: usize) -> Vec<String> {
        split_script(
            self.analyzer.as_ref(),
            script,
            frame_count,
            self.config.analysis_timeout,
        )
        .await
    }

    /// Splits a script into frames and renders them as one batch.
    pub async fn generate_story<F>(
        &self,
        script: &str,
        frame_count: usize,
        options: &GenerationOptions,
        on_progress: F,
    ) -> Vec<ImageArtifact>
    where
        F: FnMut(usize, usize) + Send,
    {
        let scenes = self.split_script(script, frame_count).await;
        log::info!("Story split into {} scenes", scenes.len());
        self.generate_batch_with_progress(&scenes, options, on_progress)
            .await
    }
}
