use super::api::ContentApi;
use crate::{
    error::{Result, StudioError},
    models::{GenerateContentRequest, GenerationConfig, ImageData, Part},
    pipeline::SceneAnalyzer,
};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct TextClient {
    api: Arc<ContentApi>,
    model: String,
}

impl TextClient {
    pub fn new(api: Arc<ContentApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `parts` and returns the model's text.
    pub async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        self.try_generate(parts)
            .await?
            .ok_or_else(|| StudioError::ResponseError("Model returned no text".into()))
    }

    /// Like [`generate`](Self::generate) but an empty answer is `Ok(None)`.
    pub async fn try_generate(&self, parts: Vec<Part>) -> Result<Option<String>> {
        let request = GenerateContentRequest::new(parts);
        let response = self.api.generate_content(&self.model, &request).await?;
        Ok(response.text())
    }

    /// Produces a short, reusable visual description of the person in `images`.
    /// `None` when the model had nothing to say.
    pub async fn describe_character(
        &self,
        name: &str,
        images: &[ImageData],
    ) -> Result<Option<String>> {
        let mut parts: Vec<Part> = images.iter().map(Part::image).collect();
        parts.push(Part::text(format!(
            "Analyze these images of a specific character named \"{}\". Provide a highly \
             detailed visual description of their physical features, face structure, hair, \
             typical clothing style and vibe. Focus on consistent details that can be used \
             to recreate this character. Keep it under 100 words.",
            name
        )));

        log::info!(
            "Analyzing {} reference image(s) for character '{}'",
            images.len(),
            name
        );
        self.try_generate(parts).await
    }

    pub async fn generate_component_code(&self, prompt: &str) -> Result<String> {
        let text = self
            .generate(vec![Part::text(format!(
                "Generate a single-file React Functional Component using Tailwind CSS based on \
                 this request: \"{}\". Return ONLY the code within a markdown code block. Do not \
                 add explanations.",
                prompt
            ))])
            .await?;
        Ok(extract_code_block(&text))
    }
}

#[async_trait]
impl SceneAnalyzer for TextClient {
    async fn split_into_scenes(&self, script: &str, count: usize) -> Result<Vec<String>> {
        let prompt = format!(
            "Split the following story script into exactly {} sequential visual scene \
             descriptions for an illustrator. Each description must stand on its own and \
             describe what is visible in the frame. Return a JSON array of {} strings.\n\n\
             SCRIPT:\n{}",
            count, count, script
        );
        let request = GenerateContentRequest::new(vec![Part::text(prompt)])
            .with_config(GenerationConfig::string_list());
        let response = self.api.generate_content(&self.model, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| StudioError::ResponseError("Scene analysis returned no text".into()))?;

        serde_json::from_str::<Vec<String>>(extract_code_block(&text).trim())
            .map_err(|e| StudioError::ResponseError(format!("Unparseable scene list: {}", e)))
    }
}

/// Body of the first fenced code block, or the whole text when there is none.
pub fn extract_code_block(text: &str) -> String {
    let Some(start) = text.find("```") else {
        return text.trim().to_string();
    };
    let after_fence = &text[start + 3..];
    // Skip the language tag on the opening line.
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence,
    };
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim().to_string()
}
