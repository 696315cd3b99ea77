//! Scripted engine
//! Closure-backed engine for embedding custom backends and driving tests

use crate::audio::EngineAudio;
use crate::config::VoiceSelection;
use crate::engines::SpeechEngine;
use crate::error::EngineError;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type GenerateFuture = Pin<Box<dyn Future<Output = Result<EngineAudio, EngineError>> + Send>>;
type GenerateFn = dyn Fn(String, VoiceSelection) -> GenerateFuture + Send + Sync;
type SpeakersFn = dyn Fn() -> Result<Vec<String>, EngineError> + Send + Sync;

/// Scripted engine wrapper
pub struct ScriptedEngine {
    name: String,
    generate_fn: Arc<GenerateFn>,
    speakers_fn: Arc<SpeakersFn>,
    available: bool,
}

impl ScriptedEngine {
    /// Create a scripted engine from a synchronous closure
    pub fn new<F>(name: impl Into<String>, speakers: Vec<String>, generate_fn: F) -> Self
    where
        F: Fn(&str, &VoiceSelection) -> Result<EngineAudio, EngineError> + Send + Sync + 'static,
    {
        let generate_fn = Arc::new(generate_fn);
        Self::from_async(name, speakers, move |text, voice| {
            let generate_fn = generate_fn.clone();
            Box::pin(async move { generate_fn(&text, &voice) })
        })
    }

    /// Create a scripted engine from a future-returning closure
    pub fn from_async<F>(name: impl Into<String>, speakers: Vec<String>, generate_fn: F) -> Self
    where
        F: Fn(String, VoiceSelection) -> GenerateFuture + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            generate_fn: Arc::new(generate_fn),
            speakers_fn: Arc::new(move || Ok(speakers.clone())),
            available: true,
        }
    }

    /// Override speaker listing, e.g. to model a catalog failure
    pub fn with_speakers_fn<F>(mut self, speakers_fn: F) -> Self
    where
        F: Fn() -> Result<Vec<String>, EngineError> + Send + Sync + 'static,
    {
        self.speakers_fn = Arc::new(speakers_fn);
        self
    }

    /// Mark the engine unavailable
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[async_trait]
impl SpeechEngine for ScriptedEngine {
    async fn generate(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<EngineAudio, EngineError> {
        (self.generate_fn)(text.to_string(), voice.clone()).await
    }

    async fn list_speakers(&self) -> Result<Vec<String>, EngineError> {
        (self.speakers_fn)()
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        &self.name
    }
}
