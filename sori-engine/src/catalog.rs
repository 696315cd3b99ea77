//! Speaker catalogs

use crate::error::EngineError;

/// Ordered set of speaker identities captured from an engine at
/// initialization. The first entry is the deterministic fallback for
/// unknown speakers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerCatalog {
    speakers: Vec<String>,
}

impl SpeakerCatalog {
    /// Build a catalog, preserving engine order and dropping duplicates
    pub fn new(speakers: Vec<String>) -> Result<Self, EngineError> {
        let mut unique: Vec<String> = Vec::with_capacity(speakers.len());
        for speaker in speakers {
            if !unique.contains(&speaker) {
                unique.push(speaker);
            }
        }

        if unique.is_empty() {
            return Err(EngineError::Engine(
                "Engine reported no speakers".to_string(),
            ));
        }

        Ok(Self { speakers: unique })
    }

    /// Whether the catalog lists the given speaker exactly
    pub fn contains(&self, speaker: &str) -> bool {
        self.speakers.iter().any(|s| s == speaker)
    }

    /// The catalog's first entry, used for unknown speakers
    pub fn fallback(&self) -> &str {
        &self.speakers[0]
    }

    /// Map a requested speaker onto the catalog. Returns the resolved
    /// speaker and whether a remap happened.
    pub fn resolve<'a>(&'a self, requested: &'a str) -> (&'a str, bool) {
        if self.contains(requested) {
            (requested, false)
        } else {
            (self.fallback(), true)
        }
    }

    /// All speakers in catalog order
    pub fn speakers(&self) -> &[String] {
        &self.speakers
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}
