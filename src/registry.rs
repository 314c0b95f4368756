//! Session state: trained characters and the generation history.

use crate::models::{CharacterIdentity, GenerationItem};
use std::sync::Arc;

/// Characters trained during this session, in training order. Entries are shared
/// and never mutated; they can only be added or removed.
#[derive(Debug, Default, Clone)]
pub struct CharacterRegistry {
    characters: Vec<Arc<CharacterIdentity>>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, character: CharacterIdentity) -> Arc<CharacterIdentity> {
        let character = Arc::new(character);
        self.characters.push(Arc::clone(&character));
        character
    }

    pub fn remove(&mut self, id: &str) -> Option<Arc<CharacterIdentity>> {
        let index = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<Arc<CharacterIdentity>> {
        self.characters.iter().find(|c| c.id == id).cloned()
    }

    pub fn list(&self) -> &[Arc<CharacterIdentity>] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// Newest-first list of everything generated this session.
#[derive(Debug, Default, Clone)]
pub struct GenerationHistory {
    items: Vec<GenerationItem>,
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item: GenerationItem) {
        self.items.insert(0, item);
    }

    pub fn items(&self) -> &[GenerationItem] {
        &self.items
    }

    pub fn latest(&self) -> Option<&GenerationItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
