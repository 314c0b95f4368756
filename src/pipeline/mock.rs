//! In-memory collaborators for pipeline tests.

use super::{
    composer::SCENE_ACTION_MARKER,
    traits::{ImageGenerator, SceneAnalyzer},
};
use crate::{
    error::{Result, StudioError},
    models::{ComposedRequest, ImageArtifact},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Echoes the scene text back as the artifact payload.
#[derive(Default)]
pub struct MockGenerator {
    hanging: Vec<String>,
    failing: Vec<String>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hang_on(mut self, scene: &str) -> Self {
        self.hanging.push(scene.to_string());
        self
    }

    pub fn fail_on(mut self, scene: &str) -> Self {
        self.failing.push(scene.to_string());
        self
    }

    pub fn delay_for(mut self, scene: &str, delay: Duration) -> Self {
        self.delays.insert(scene.to_string(), delay);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn scene_of(request: &ComposedRequest) -> String {
        request
            .instruction()
            .and_then(|text| text.rsplit_once(SCENE_ACTION_MARKER))
            .map(|(_, scene)| scene.trim().to_string())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageGenerator for MockGenerator {
    async fn generate_image(&self, request: &ComposedRequest) -> Result<ImageArtifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scene = Self::scene_of(request);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = if self.hanging.contains(&scene) {
            Duration::from_secs(3600)
        } else {
            self.delays
                .get(&scene)
                .copied()
                .unwrap_or(self.default_delay)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&scene) {
            return Err(StudioError::NoImageReturned);
        }

        Ok(ImageArtifact {
            mime_type: "image/png".to_string(),
            data: scene,
            model: "mock".to_string(),
        })
    }
}

pub struct MockAnalyzer {
    scenes: Option<Vec<String>>,
    delay: Duration,
}

impl MockAnalyzer {
    pub fn returning(scenes: Vec<&str>) -> Self {
        Self {
            scenes: Some(scenes.into_iter().map(String::from).collect()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            scenes: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SceneAnalyzer for MockAnalyzer {
    async fn split_into_scenes(&self, _script: &str, _count: usize) -> Result<Vec<String>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.scenes
            .clone()
            .ok_or_else(|| StudioError::ResponseError("analysis unavailable".into()))
    }
}
