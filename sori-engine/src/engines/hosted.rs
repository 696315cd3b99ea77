//! Hosted TTS engine
//! Thin client over a translate-style TTS endpoint that answers GET
//! requests with an MP3 stream

use crate::audio::{EngineAudio, MIME_MPEG};
use crate::config::{HostedEngineConfig, VoiceSelection};
use crate::engines::SpeechEngine;
use crate::error::EngineError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Hosted translate-TTS engine
pub struct HostedTtsEngine {
    client: Client,
    endpoint: String,
    client_id: String,
    sample_rate: u32,
}

impl HostedTtsEngine {
    /// Create a new hosted engine
    pub fn new(config: &HostedEngineConfig, timeout_secs: u64) -> Result<Self, EngineError> {
        let endpoint_url = Url::parse(&config.endpoint)
            .map_err(|e| EngineError::Config(format!("Invalid endpoint URL: {}", e)))?;

        // Only allow HTTP/HTTPS protocols
        match endpoint_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(EngineError::Config(format!(
                    "Unsupported URL scheme: {}. Only http:// and https:// are allowed.",
                    scheme
                )))
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EngineError::Engine(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client_id: config.client.clone(),
            sample_rate: config.sample_rate,
        })
    }
}

#[async_trait]
impl SpeechEngine for HostedTtsEngine {
    async fn generate(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<EngineAudio, EngineError> {
        debug!(
            "Requesting hosted synthesis: {} bytes of text, language {}",
            text.len(),
            voice.language
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", voice.language.as_str()),
                ("client", self.client_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| EngineError::Api(format!("Hosted TTS request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            // Limit error text size to keep messages bounded
            let error_text = response
                .text()
                .await
                .map(|s| {
                    if s.len() > 1000 {
                        // Use char iterator to avoid UTF-8 boundary issues
                        let truncated: String = s.chars().take(1000).collect();
                        format!("{}...", truncated)
                    } else {
                        s
                    }
                })
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EngineError::Api(format!(
                "Hosted TTS error ({}): {}",
                status, error_text
            )));
        }

        const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length > MAX_RESPONSE_SIZE as u64 {
                return Err(EngineError::Api(format!(
                    "Response too large ({} bytes, max {} bytes)",
                    content_length, MAX_RESPONSE_SIZE
                )));
            }
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Api(format!("Failed to read audio response: {}", e)))?;

        if audio_bytes.is_empty() {
            return Err(EngineError::Api(
                "Hosted TTS returned an empty body".to_string(),
            ));
        }

        if audio_bytes.len() > MAX_RESPONSE_SIZE {
            return Err(EngineError::Api(format!(
                "Response too large ({} bytes, max {} bytes)",
                audio_bytes.len(),
                MAX_RESPONSE_SIZE
            )));
        }

        Ok(EngineAudio::Encoded {
            bytes: audio_bytes,
            mime_type: MIME_MPEG,
            sample_rate: self.sample_rate,
        })
    }

    async fn list_speakers(&self) -> Result<Vec<String>, EngineError> {
        // The hosted service exposes no speaker selection
        Ok(vec!["default".to_string()])
    }

    fn is_available(&self) -> bool {
        !self.endpoint.is_empty()
    }

    fn name(&self) -> &str {
        "gTTS"
    }
}
