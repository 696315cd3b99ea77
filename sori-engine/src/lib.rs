//! Sori Engine - Speech synthesis backends
//!
//! This crate owns everything between a validated synthesis request and the
//! bytes of audio handed back to the HTTP layer:
//!
//! - `SpeechEngine` trait with hosted, local-model and scripted backends
//! - `EngineHandle` lifecycle (initialize once, then immutable) and the
//!   synthesis pipeline with single-flight queueing and timeouts
//! - Speaker catalogs with deterministic fallback
//! - Audio payloads and WAV container packaging

pub mod audio;
pub mod catalog;
pub mod config;
pub mod engines;
pub mod error;
pub mod handle;

pub use audio::{decode_wav, encode_wav, EngineAudio, MIME_MPEG, MIME_WAV};
pub use catalog::SpeakerCatalog;
pub use config::{EngineConfig, EngineKind, HostedEngineConfig, LocalModelConfig, VoiceSelection};
pub use engines::hosted::HostedTtsEngine;
pub use engines::local::LocalModelEngine;
pub use engines::scripted::ScriptedEngine;
pub use engines::SpeechEngine;
pub use error::EngineError;
pub use handle::{EngineHandle, EngineState};
