//! Prompt composition, batched image generation and script-to-story assembly on top
//! of the Gemini `generateContent` API.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod studio;

pub use config::{Config, GeminiConfig, PipelineConfig};
pub use error::{Result, StudioError};
pub use gemini::{GeminiClient, ImageClient, TextClient};
pub use models::*;
pub use pipeline::{BatchOrchestrator, ImageGenerator, SceneAnalyzer};
pub use registry::{CharacterRegistry, GenerationHistory};
pub use studio::Studio;
