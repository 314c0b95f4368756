pub mod batch;
pub mod composer;
pub mod script;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use batch::{generate_one, BatchOrchestrator};
pub use composer::{aspect_hint, compose, style_description};
pub use script::{naive_split, normalize_scenes, split_script};
pub use traits::{ImageGenerator, SceneAnalyzer};
