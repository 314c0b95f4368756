use super::{
    character::CharacterIdentity,
    content::Part,
    image::{AspectRatio, ImageData},
};
use serde::{Deserialize, Serialize};

/// Optional photographic controls. `None` leaves the clause out of the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOptions {
    pub lighting: Option<String>,
    pub camera: Option<String>,
    pub color_grade: Option<String>,
}

impl AdvancedOptions {
    pub fn with_lighting(mut self, lighting: impl Into<String>) -> Self {
        self.lighting = Some(lighting.into());
        self
    }

    pub fn with_camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = Some(camera.into());
        self
    }

    pub fn with_color_grade(mut self, color_grade: impl Into<String>) -> Self {
        self.color_grade = Some(color_grade.into());
        self
    }
}

/// Everything besides the scene text that shapes a generated image. Shared by every
/// scene of a batch.
///
/// Defaults: square output, no style preset, no negative constraints, no references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub aspect_ratio: AspectRatio,
    pub style_preset: String,
    pub negative_constraints: Option<String>,
    pub character: Option<CharacterIdentity>,
    pub background_reference: Option<ImageData>,
    pub style_reference: Option<ImageData>,
    pub advanced: AdvancedOptions,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_style(mut self, style_preset: impl Into<String>) -> Self {
        self.style_preset = style_preset.into();
        self
    }

    pub fn with_negative_constraints(mut self, negative: impl Into<String>) -> Self {
        self.negative_constraints = Some(negative.into());
        self
    }

    pub fn with_character(mut self, character: CharacterIdentity) -> Self {
        self.character = Some(character);
        self
    }

    pub fn with_background_reference(mut self, image: ImageData) -> Self {
        self.background_reference = Some(image);
        self
    }

    pub fn with_style_reference(mut self, image: ImageData) -> Self {
        self.style_reference = Some(image);
        self
    }

    pub fn with_advanced(mut self, advanced: AdvancedOptions) -> Self {
        self.advanced = advanced;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub scene_text: String,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(scene_text: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            scene_text: scene_text.into(),
            options,
        }
    }

    pub fn compose(&self) -> ComposedRequest {
        crate::pipeline::compose(&self.scene_text, &self.options)
    }
}

/// Ordered attachments and instruction text, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedRequest {
    pub parts: Vec<Part>,
    pub aspect_ratio: AspectRatio,
}

impl ComposedRequest {
    pub fn instruction(&self) -> Option<&str> {
        self.parts.iter().rev().find_map(Part::as_text)
    }

    pub fn attachment_count(&self) -> usize {
        self.parts.iter().filter(|p| p.as_inline_data().is_some()).count()
    }
}
