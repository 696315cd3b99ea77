//! Configuration for the speech service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine and voice-selection configuration, fixed at process start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which engine backend to run
    pub engine: EngineKind,

    /// Language used when the text is mostly non-ASCII script
    pub primary_language: String,

    /// Language used when the text is mostly ASCII
    pub secondary_language: String,

    /// Speaker applied when a request names none (falls back to the
    /// catalog's first entry when unset)
    pub default_speaker: Option<String>,

    /// Style instruction applied when a request names none
    pub default_style: String,

    /// Wall-clock limit for a single engine call, in seconds
    pub request_timeout_secs: u64,

    /// Funnel engine calls through a single-flight lock
    pub serialize_engine_calls: bool,

    /// Hosted backend settings
    pub hosted: HostedEngineConfig,

    /// Local model backend settings
    pub local: LocalModelConfig,
}

/// Engine backend selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EngineKind {
    /// Translate-style hosted TTS endpoint (returns MP3)
    Hosted,
    /// Local model runner invoked as a subprocess (returns WAV samples)
    LocalModel,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Hosted => write!(f, "hosted"),
            EngineKind::LocalModel => write!(f, "local"),
        }
    }
}

/// Hosted backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedEngineConfig {
    /// Endpoint serving translate-TTS requests
    pub endpoint: String,

    /// Client identifier sent with every request
    pub client: String,

    /// Nominal sample rate of the returned MP3 stream
    pub sample_rate: u32,
}

/// Local model backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalModelConfig {
    /// Synthesis runner executable (bare name is resolved on PATH)
    pub runner_path: PathBuf,

    /// Model identifier passed to the runner
    pub model_id: String,

    /// Display name reported by health checks and logs
    pub model_name: String,

    /// Speaker identities the model ships with; the first entry is the
    /// fallback for unknown speakers
    pub speakers: Vec<String>,
}

/// Voice settings for a single generation call, resolved from the request
/// and the configured defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSelection {
    /// Language code (e.g. "ko", "en")
    pub language: String,

    /// Speaker identity, already checked against the catalog
    pub speaker: String,

    /// Free-form style instruction
    pub style: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Hosted,
            primary_language: "ko".to_string(),
            secondary_language: "en".to_string(),
            default_speaker: None,
            default_style: "Natural speech".to_string(),
            request_timeout_secs: 30,
            serialize_engine_calls: true,
            hosted: HostedEngineConfig::default(),
            local: LocalModelConfig::default(),
        }
    }
}

impl Default for HostedEngineConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            client: "tw-ob".to_string(),
            sample_rate: 24_000,
        }
    }
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            runner_path: PathBuf::from("qwen3-tts"),
            model_id: "Qwen/Qwen3-TTS-12Hz-1.7B-CustomVoice".to_string(),
            model_name: "Qwen3-TTS".to_string(),
            speakers: vec![
                "Cherry".to_string(),
                "Ethan".to_string(),
                "Chelsie".to_string(),
                "Serena".to_string(),
            ],
        }
    }
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self {
            language: "ko".to_string(),
            speaker: "default".to_string(),
            style: "Natural speech".to_string(),
        }
    }
}

impl EngineConfig {
    /// Build configuration from `SORI_*` environment variables, starting
    /// from the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(engine) = std::env::var("SORI_ENGINE") {
            match engine.to_lowercase().as_str() {
                "hosted" | "gtts" => config.engine = EngineKind::Hosted,
                "local" | "qwen3-tts" => config.engine = EngineKind::LocalModel,
                _ => {}
            }
        }

        if let Ok(language) = std::env::var("SORI_PRIMARY_LANGUAGE") {
            config.primary_language = language;
        }

        if let Ok(language) = std::env::var("SORI_SECONDARY_LANGUAGE") {
            config.secondary_language = language;
        }

        if let Ok(speaker) = std::env::var("SORI_DEFAULT_SPEAKER") {
            if !speaker.is_empty() {
                config.default_speaker = Some(speaker);
            }
        }

        if let Ok(style) = std::env::var("SORI_DEFAULT_STYLE") {
            config.default_style = style;
        }

        if let Some(timeout) = read_env_number("SORI_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout;
        }

        if let Ok(serialize) = std::env::var("SORI_SERIALIZE_ENGINE_CALLS") {
            config.serialize_engine_calls = serialize != "0" && serialize.to_lowercase() != "false";
        }

        if let Ok(endpoint) = std::env::var("SORI_HOSTED_ENDPOINT") {
            config.hosted.endpoint = endpoint;
        }

        if let Ok(runner) = std::env::var("SORI_LOCAL_RUNNER") {
            config.local.runner_path = PathBuf::from(runner);
        }

        if let Ok(model_id) = std::env::var("SORI_LOCAL_MODEL_ID") {
            config.local.model_id = model_id;
        }

        if let Ok(speakers) = std::env::var("SORI_LOCAL_SPEAKERS") {
            let speakers: Vec<String> = speakers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !speakers.is_empty() {
                config.local.speakers = speakers;
            }
        }

        config
    }

    /// Name reported for the configured backend before (or instead of) a
    /// live engine instance
    pub fn engine_display_name(&self) -> String {
        match self.engine {
            EngineKind::Hosted => "gTTS".to_string(),
            EngineKind::LocalModel => self.local.model_name.clone(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_language_code(&self.primary_language)?;
        validate_language_code(&self.secondary_language)?;

        if let Some(ref speaker) = self.default_speaker {
            if speaker.is_empty() {
                return Err("Default speaker cannot be empty if provided".to_string());
            }
            if speaker.len() > 256 {
                return Err("Default speaker too long (max 256 chars)".to_string());
            }
        }

        if self.default_style.len() > 1024 {
            return Err("Default style too long (max 1024 chars)".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.request_timeout_secs > 300 {
            return Err("Request timeout too large (max 300 seconds)".to_string());
        }

        match self.engine {
            EngineKind::Hosted => self.hosted.validate(),
            EngineKind::LocalModel => self.local.validate(),
        }
    }
}

impl HostedEngineConfig {
    /// Validate hosted backend settings
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("Hosted endpoint cannot be empty".to_string());
        }

        if self.endpoint.len() > 2048 {
            return Err("Hosted endpoint URL too long (max 2048 chars)".to_string());
        }

        if self.endpoint.chars().any(|c| c == '\0' || c.is_control()) {
            return Err("Hosted endpoint contains invalid characters".to_string());
        }

        match url::Url::parse(&self.endpoint) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => {}
                scheme => {
                    return Err(format!(
                        "Unsupported URL scheme: {}. Only http:// and https:// are allowed.",
                        scheme
                    ))
                }
            },
            Err(e) => return Err(format!("Invalid hosted endpoint URL: {}", e)),
        }

        if self.client.is_empty() {
            return Err("Hosted client identifier cannot be empty".to_string());
        }

        if self.sample_rate == 0 {
            return Err("Sample rate must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl LocalModelConfig {
    /// Validate local backend settings
    pub fn validate(&self) -> Result<(), String> {
        if self.runner_path.as_os_str().is_empty() {
            return Err("Runner path cannot be empty".to_string());
        }

        if self.model_id.is_empty() {
            return Err("Model identifier cannot be empty".to_string());
        }

        if self.model_id.len() > 256 {
            return Err("Model identifier too long (max 256 chars)".to_string());
        }

        if self.model_name.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.speakers.is_empty() {
            return Err("Speaker list cannot be empty".to_string());
        }

        for speaker in &self.speakers {
            if speaker.is_empty() {
                return Err("Speaker names cannot be empty".to_string());
            }
            if speaker.chars().any(|c| c == '\0' || c.is_control()) {
                return Err("Speaker names contain invalid characters".to_string());
            }
        }

        Ok(())
    }
}

fn validate_language_code(language: &str) -> Result<(), String> {
    if language.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    if language.len() > 32 {
        return Err("Language code too long (max 32 chars)".to_string());
    }

    if !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(
            "Language code contains invalid characters (only alphanumeric and '-' allowed)"
                .to_string(),
        );
    }

    Ok(())
}

fn read_env_number(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
