//! Engine lifecycle and the synthesis pipeline

use crate::audio::{encode_wav, EngineAudio, MIME_WAV};
use crate::catalog::SpeakerCatalog;
use crate::config::{EngineConfig, EngineKind, VoiceSelection};
use crate::engines::hosted::HostedTtsEngine;
use crate::engines::local::LocalModelEngine;
use crate::engines::SpeechEngine;
use crate::error::EngineError;
use sori_core::{infer_language, Error, Result, SynthesisRequest, SynthesisResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Lifecycle of the underlying engine. A handle moves through
/// `Uninitialized` and `Initializing` during construction and then stays
/// in `Ready` or `Failed` for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    /// No initialization attempt has started
    #[default]
    Uninitialized,
    /// Engine construction and catalog capture are in progress
    Initializing,
    /// Engine passed its pre-flight check and the catalog is captured
    Ready,
    /// Initialization failed; the message repeats on every request
    Failed(String),
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Uninitialized => write!(f, "uninitialized"),
            EngineState::Initializing => write!(f, "initializing"),
            EngineState::Ready => write!(f, "ready"),
            EngineState::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Process-wide handle to the active speech engine. Built once at startup
/// and shared behind an `Arc`; immutable afterwards.
pub struct EngineHandle {
    config: EngineConfig,
    engine_name: String,
    state: EngineState,
    engine: Option<Arc<dyn SpeechEngine>>,
    catalog: Option<SpeakerCatalog>,
    call_lock: Option<Mutex<()>>,
}

impl EngineHandle {
    /// Build the configured engine and capture its speaker catalog.
    ///
    /// Always returns a handle. A failed build lands in `Failed` so health
    /// checks stay observable while every synthesis attempt reports the
    /// recorded reason.
    pub async fn initialize(config: EngineConfig) -> Self {
        info!(
            "Engine state: {} ({} backend)",
            EngineState::Initializing,
            config.engine
        );

        if let Err(message) = config.validate() {
            return Self::failed(config, format!("Invalid configuration: {}", message));
        }

        let engine: std::result::Result<Arc<dyn SpeechEngine>, EngineError> = match config.engine {
            EngineKind::Hosted => {
                HostedTtsEngine::new(&config.hosted, config.request_timeout_secs)
                    .map(|engine| Arc::new(engine) as Arc<dyn SpeechEngine>)
            }
            EngineKind::LocalModel => LocalModelEngine::new(&config.local)
                .map(|engine| Arc::new(engine) as Arc<dyn SpeechEngine>),
        };

        match engine {
            Ok(engine) => Self::with_engine(config, engine).await,
            Err(e) => Self::failed(config, e.to_string()),
        }
    }

    /// Wrap an already-built engine. Runs the same pre-flight check and
    /// catalog capture as `initialize`.
    pub async fn with_engine(config: EngineConfig, engine: Arc<dyn SpeechEngine>) -> Self {
        let engine_name = engine.name().to_string();

        if !engine.is_available() {
            let message = format!("{} engine is not available", engine_name);
            return Self::failed_named(config, engine_name, message);
        }

        match engine.list_speakers().await.and_then(SpeakerCatalog::new) {
            Ok(catalog) => {
                info!(
                    "{} engine ready with {} speakers (fallback {})",
                    engine_name,
                    catalog.len(),
                    catalog.fallback()
                );
                let call_lock = config.serialize_engine_calls.then(|| Mutex::new(()));
                Self {
                    config,
                    engine_name,
                    state: EngineState::Ready,
                    engine: Some(engine),
                    catalog: Some(catalog),
                    call_lock,
                }
            }
            Err(e) => {
                let message = format!("Failed to load speaker catalog: {}", e);
                Self::failed_named(config, engine_name, message)
            }
        }
    }

    fn failed(config: EngineConfig, message: String) -> Self {
        let engine_name = config.engine_display_name();
        Self::failed_named(config, engine_name, message)
    }

    fn failed_named(config: EngineConfig, engine_name: String, message: String) -> Self {
        error!("Engine initialization failed: {}", message);
        Self {
            config,
            engine_name,
            state: EngineState::Failed(message),
            engine: None,
            catalog: None,
            call_lock: None,
        }
    }

    /// Run the full synthesis pipeline: validate the text, settle language
    /// and speaker, invoke the engine, and package the audio.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        let joined = request.text();
        let text = joined.trim();

        if text.is_empty() {
            return Err(Error::InvalidInput("No text provided".to_string()));
        }

        if text.contains('\0') {
            return Err(Error::InvalidInput("Text contains null bytes".to_string()));
        }

        const MAX_TEXT_LENGTH: usize = 100_000;
        if text.len() > MAX_TEXT_LENGTH {
            return Err(Error::InvalidInput(format!(
                "Text too long (max {} bytes)",
                MAX_TEXT_LENGTH
            )));
        }

        let language = match request.language() {
            Some(language) => language.to_string(),
            None => infer_language(
                text,
                &self.config.primary_language,
                &self.config.secondary_language,
            )?
            .to_string(),
        };

        let speaker = self.resolve_speaker(request.speaker());

        let style = request
            .prompt()
            .unwrap_or(&self.config.default_style)
            .to_string();

        let engine = match &self.state {
            EngineState::Ready => self
                .engine
                .as_ref()
                .cloned()
                .ok_or_else(|| Error::EngineUnavailable("Engine not initialized".to_string()))?,
            EngineState::Failed(message) => {
                return Err(Error::EngineUnavailable(format!(
                    "Engine failed to initialize: {}",
                    message
                )))
            }
            EngineState::Uninitialized | EngineState::Initializing => {
                return Err(Error::EngineUnavailable("Engine not initialized".to_string()))
            }
        };

        // Ready implies a captured catalog, so the speaker is resolved
        let speaker = speaker
            .ok_or_else(|| Error::EngineUnavailable("Engine not initialized".to_string()))?;

        let preview = if text.chars().count() > 50 {
            let truncated: String = text.chars().take(50).collect();
            format!("{}...", truncated)
        } else {
            text.to_string()
        };
        info!(
            "Generating audio for: {} (language {}, speaker {})",
            preview, language, speaker
        );

        let voice = VoiceSelection {
            language,
            speaker,
            style,
        };
        let audio = self.invoke(engine, text, &voice).await?;

        let result = match audio {
            EngineAudio::Samples { pcm, sample_rate } => {
                let bytes = encode_wav(&pcm, sample_rate).map_err(Error::from)?;
                SynthesisResult {
                    audio: bytes,
                    mime_type: MIME_WAV,
                    sample_rate,
                }
            }
            EngineAudio::Encoded {
                bytes,
                mime_type,
                sample_rate,
            } => SynthesisResult {
                audio: bytes,
                mime_type,
                sample_rate,
            },
        };

        const MAX_AUDIO_SIZE: usize = 10 * 1024 * 1024;
        if result.audio.len() > MAX_AUDIO_SIZE {
            return Err(Error::Synthesis(format!(
                "Generated audio too large ({} bytes, max {} bytes)",
                result.audio.len(),
                MAX_AUDIO_SIZE
            )));
        }

        info!(
            "Generated {} bytes of {} audio",
            result.audio.len(),
            result.mime_type
        );

        Ok(result)
    }

    /// Invoke the engine under the single-flight lock (when enabled) and
    /// the configured timeout. The timeout clock starts after the lock is
    /// held, so queued requests get their full allowance.
    async fn invoke(
        &self,
        engine: Arc<dyn SpeechEngine>,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<EngineAudio> {
        let _guard = match &self.call_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let limit = Duration::from_secs(self.config.request_timeout_secs);
        match tokio::time::timeout(limit, engine.generate(text, voice)).await {
            Ok(Ok(audio)) => Ok(audio),
            Ok(Err(e)) => Err(Error::from(e)),
            Err(_) => {
                warn!(
                    "Engine call exceeded {}s timeout",
                    self.config.request_timeout_secs
                );
                Err(Error::from(EngineError::Timeout(
                    self.config.request_timeout_secs,
                )))
            }
        }
    }

    /// Map the requested speaker onto the captured catalog, falling back
    /// to the configured default and then the catalog's first entry.
    /// Returns `None` when no catalog was captured.
    fn resolve_speaker(&self, requested: Option<&str>) -> Option<String> {
        let catalog = self.catalog.as_ref()?;
        let wanted = requested
            .or(self.config.default_speaker.as_deref())
            .unwrap_or_else(|| catalog.fallback());

        let (resolved, remapped) = catalog.resolve(wanted);
        if remapped {
            warn!(
                "Unknown speaker '{}', substituting catalog fallback '{}'",
                wanted, resolved
            );
        }

        Some(resolved.to_string())
    }

    /// Current lifecycle state
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Whether the engine passed initialization
    pub fn is_ready(&self) -> bool {
        self.state == EngineState::Ready
    }

    /// Display name of the configured engine, known even when `Failed`
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    /// Speakers captured at initialization, in engine order
    pub fn speakers(&self) -> Result<&[String]> {
        match (&self.state, &self.catalog) {
            (EngineState::Ready, Some(catalog)) => Ok(catalog.speakers()),
            (EngineState::Failed(message), _) => Err(Error::EngineUnavailable(format!(
                "Engine failed to initialize: {}",
                message
            ))),
            _ => Err(Error::EngineUnavailable("Engine not initialized".to_string())),
        }
    }

    /// Configuration the handle was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
