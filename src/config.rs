use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CHUNK_SIZE: usize = 4;
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub image_model: Option<String>,
    pub text_model: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Tuning for the batch pipeline. Defaults: chunks of 4, 15s per image, 3s for
/// script analysis.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chunk_size: usize,
    pub generation_timeout: Duration,
    pub analysis_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub pipeline: PipelineConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: None,
            image_model: None,
            text_model: None,
            request_timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok();
        let base_url = env::var("GEMINI_BASE_URL").ok();
        let image_model = env::var("GEMINI_IMAGE_MODEL").ok();
        let text_model = env::var("GEMINI_TEXT_MODEL").ok();
        let request_timeout_secs = env::var("GEMINI_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok());

        GeminiConfig {
            api_key,
            base_url,
            image_model,
            text_model,
            request_timeout_secs,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_models(
        mut self,
        image_model: impl Into<String>,
        text_model: impl Into<String>,
    ) -> Self {
        self.image_model = Some(image_model.into());
        self.text_model = Some(text_model.into());
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let chunk_size = env::var("BATCH_CHUNK_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.chunk_size);
        let generation_timeout = env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.generation_timeout);
        let analysis_timeout = env::var("ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.analysis_timeout);

        PipelineConfig {
            chunk_size,
            generation_timeout,
            analysis_timeout,
        }
        .normalized()
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self.normalized()
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    // A zero chunk size would never make progress.
    fn normalized(mut self) -> Self {
        self.chunk_size = self.chunk_size.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            gemini: GeminiConfig::from_env(),
            pipeline: PipelineConfig::from_env(),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_pipeline(mut self, config: PipelineConfig) -> Self {
        self.pipeline = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let config = GeminiConfig::new();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.image_model(), "gemini-2.5-flash-image");
        assert_eq!(config.text_model(), "gemini-2.5-flash");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_gemini_builders() {
        let config = GeminiConfig::new()
            .with_api_key("key")
            .with_base_url("http://localhost:1234/")
            .with_models("img", "txt")
            .with_request_timeout(5);
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.base_url(), "http://localhost:1234");
        assert_eq!(config.image_model(), "img");
        assert_eq!(config.text_model(), "txt");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.chunk_size, 4);
        assert_eq!(config.generation_timeout, Duration::from_secs(15));
        assert_eq!(config.analysis_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let config = PipelineConfig::new().with_chunk_size(0);
        assert_eq!(config.chunk_size, 1);
    }
}
