use crate::{
    error::Result,
    models::{ComposedRequest, ImageArtifact},
};
use async_trait::async_trait;

/// Anything that can turn a composed request into one image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, request: &ComposedRequest) -> Result<ImageArtifact>;
}

/// Splits a free-form script into a fixed number of visual scene descriptions.
#[async_trait]
pub trait SceneAnalyzer: Send + Sync {
    async fn split_into_scenes(&self, script: &str, count: usize) -> Result<Vec<String>>;
}
