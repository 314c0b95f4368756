pub mod character;
pub mod content;
pub mod generation;
pub mod history;
pub mod image;

pub use character::*;
pub use content::*;
pub use generation::*;
pub use history::*;
pub use image::*;
