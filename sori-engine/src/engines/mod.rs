//! Speech engine implementations

pub mod hosted;
pub mod local;
pub mod scripted;

use crate::audio::EngineAudio;
use crate::config::VoiceSelection;
use crate::error::EngineError;
use async_trait::async_trait;

/// Trait for speech engines
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Generate audio for already-validated text and voice settings
    async fn generate(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<EngineAudio, EngineError>;

    /// Speaker identities this engine can voice, in engine order
    async fn list_speakers(&self) -> Result<Vec<String>, EngineError>;

    /// Check if the engine can serve requests
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}
