//! Local model TTS engine
//! Runs a synthesis runner executable (local model inference) as a
//! subprocess and reads back the WAV it writes

use crate::audio::{decode_wav, EngineAudio};
use crate::config::{LocalModelConfig, VoiceSelection};
use crate::engines::SpeechEngine;
use crate::error::EngineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Local model engine
pub struct LocalModelEngine {
    runner_path: PathBuf,
    model_id: String,
    model_name: String,
    speakers: Vec<String>,
}

impl LocalModelEngine {
    /// Create a new local model engine
    pub fn new(config: &LocalModelConfig) -> Result<Self, EngineError> {
        if config.speakers.is_empty() {
            return Err(EngineError::Config(
                "Local model speaker list cannot be empty".to_string(),
            ));
        }

        let runner_path = resolve_runner(&config.runner_path)?;

        Ok(Self {
            runner_path,
            model_id: config.model_id.clone(),
            model_name: config.model_name.clone(),
            speakers: config.speakers.clone(),
        })
    }
}

/// Resolve the runner executable. Explicit paths must exist; a bare name
/// is looked up on PATH.
fn resolve_runner(path: &Path) -> Result<PathBuf, EngineError> {
    if path.is_absolute() || path.components().count() > 1 {
        if !path.exists() {
            return Err(EngineError::Config(format!(
                "Synthesis runner not found at: {:?}",
                path
            )));
        }
        return Ok(path.to_path_buf());
    }

    let output = std::process::Command::new("which").arg(path).output().ok();

    if let Some(output) = output {
        if output.status.success() {
            let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(PathBuf::from(path_str));
        }
    }

    Err(EngineError::Config(format!(
        "Synthesis runner {:?} not found. Install it or set an explicit runner path",
        path
    )))
}

#[async_trait]
impl SpeechEngine for LocalModelEngine {
    async fn generate(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<EngineAudio, EngineError> {
        let temp_file = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|e| EngineError::Engine(format!("Failed to create temp file: {}", e)))?;
        let output_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| EngineError::Engine("Invalid temp file path".to_string()))?;

        debug!(
            "Running {:?} for {} bytes of text (speaker {})",
            self.runner_path,
            text.len(),
            voice.speaker
        );

        // Arguments go straight to exec, never through a shell
        let output = Command::new(&self.runner_path)
            .arg("--model")
            .arg(&self.model_id)
            .arg("--text")
            .arg(text)
            .arg("--language")
            .arg(&voice.language)
            .arg("--speaker")
            .arg(&voice.speaker)
            .arg("--prompt")
            .arg(&voice.style)
            .arg("--output")
            .arg(output_path)
            .output()
            .await
            .map_err(|e| EngineError::Engine(format!("Failed to execute synthesis runner: {}", e)))?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Engine(format!(
                "Model synthesis failed: {}",
                error_msg.trim()
            )));
        }

        const MAX_OUTPUT_SIZE: u64 = 10 * 1024 * 1024;
        let file_size = std::fs::metadata(temp_file.path())
            .map_err(|e| EngineError::Engine(format!("Failed to stat runner output: {}", e)))?
            .len();
        if file_size > MAX_OUTPUT_SIZE {
            return Err(EngineError::Engine(format!(
                "Generated audio too large ({} bytes, max {} bytes)",
                file_size, MAX_OUTPUT_SIZE
            )));
        }

        let (pcm, sample_rate) = decode_wav(temp_file.path())?;
        debug!("Runner produced {} samples at {} Hz", pcm.len(), sample_rate);

        Ok(EngineAudio::Samples { pcm, sample_rate })
    }

    async fn list_speakers(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.speakers.clone())
    }

    fn is_available(&self) -> bool {
        // Runner must exist and be executable
        self.runner_path.exists()
            && std::fs::metadata(&self.runner_path)
                .map(|m| {
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        m.permissions().mode() & 0o111 != 0
                    }
                    #[cfg(not(unix))]
                    {
                        true
                    }
                })
                .unwrap_or(false)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
