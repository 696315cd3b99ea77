//! Wire-level request and response types for the synthesis service.

use bytes::Bytes;
use serde::Deserialize;

/// Text as it may arrive on the wire: one string, or a sequence that is
/// joined with single spaces.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    One(String),
    Many(Vec<String>),
}

impl TextValue {
    pub fn joined(&self) -> String {
        match self {
            TextValue::One(s) => s.clone(),
            TextValue::Many(parts) => parts.join(" "),
        }
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::One(s.to_string())
    }
}

/// Optional fields that some callers nest under a `parameters` object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestParameters {
    pub language: Option<String>,
    pub speaker: Option<String>,
    pub prompt: Option<String>,
}

/// A synthesis request.
///
/// Two body shapes are accepted: the flat `{text, language, speaker, prompt}`
/// form and the `{inputs, parameters}` form. `text` takes precedence over
/// `inputs` unless it is absent or empty; top-level fields take precedence
/// over the `parameters` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SynthesisRequest {
    pub text: Option<TextValue>,
    pub inputs: Option<TextValue>,
    pub language: Option<String>,
    pub speaker: Option<String>,
    pub prompt: Option<String>,
    pub parameters: Option<RequestParameters>,
}

impl SynthesisRequest {
    /// Create a request with the given text and no overrides.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(TextValue::One(text.into())),
            ..Self::default()
        }
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Set the style prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// The effective text: `text` first, falling back to `inputs` when
    /// `text` is missing or empty.
    pub fn text(&self) -> String {
        let primary = self
            .text
            .as_ref()
            .map(TextValue::joined)
            .unwrap_or_default();
        if !primary.is_empty() {
            return primary;
        }
        self.inputs
            .as_ref()
            .map(TextValue::joined)
            .unwrap_or(primary)
    }

    /// The effective language override, if any.
    pub fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .or_else(|| self.parameters.as_ref().and_then(|p| p.language.as_deref()))
    }

    /// The effective speaker override, if any.
    pub fn speaker(&self) -> Option<&str> {
        self.speaker
            .as_deref()
            .or_else(|| self.parameters.as_ref().and_then(|p| p.speaker.as_deref()))
    }

    /// The effective style prompt, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .or_else(|| self.parameters.as_ref().and_then(|p| p.prompt.as_deref()))
    }
}

/// Packaged audio, ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: Bytes,
    pub mime_type: &'static str,
    pub sample_rate: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_body() {
        let req: SynthesisRequest =
            serde_json::from_str(r#"{"text": "hi", "language": "en", "speaker": "sunny"}"#)
                .unwrap();
        assert_eq!(req.text(), "hi");
        assert_eq!(req.language(), Some("en"));
        assert_eq!(req.speaker(), Some("sunny"));
        assert_eq!(req.prompt(), None);
    }

    #[test]
    fn test_inputs_alias() {
        let req: SynthesisRequest = serde_json::from_str(r#"{"inputs": "hello"}"#).unwrap();
        assert_eq!(req.text(), "hello");
    }

    #[test]
    fn test_inputs_sequence_is_joined() {
        let req: SynthesisRequest =
            serde_json::from_str(r#"{"inputs": ["hello", "there"]}"#).unwrap();
        assert_eq!(req.text(), "hello there");
    }

    #[test]
    fn test_text_sequence_is_joined() {
        let req: SynthesisRequest = serde_json::from_str(r#"{"text": ["a", "b", "c"]}"#).unwrap();
        assert_eq!(req.text(), "a b c");
    }

    #[test]
    fn test_empty_text_falls_back_to_inputs() {
        let req: SynthesisRequest =
            serde_json::from_str(r#"{"text": "", "inputs": "fallback"}"#).unwrap();
        assert_eq!(req.text(), "fallback");
    }

    #[test]
    fn test_text_wins_over_inputs() {
        let req: SynthesisRequest =
            serde_json::from_str(r#"{"text": "primary", "inputs": "ignored"}"#).unwrap();
        assert_eq!(req.text(), "primary");
    }

    #[test]
    fn test_parameters_block() {
        let req: SynthesisRequest = serde_json::from_str(
            r#"{"inputs": "hi", "parameters": {"speaker": "donghyun", "prompt": "calm"}}"#,
        )
        .unwrap();
        assert_eq!(req.speaker(), Some("donghyun"));
        assert_eq!(req.prompt(), Some("calm"));
        assert_eq!(req.language(), None);
    }

    #[test]
    fn test_top_level_wins_over_parameters() {
        let req: SynthesisRequest = serde_json::from_str(
            r#"{"text": "hi", "speaker": "top", "parameters": {"speaker": "nested"}}"#,
        )
        .unwrap();
        assert_eq!(req.speaker(), Some("top"));
    }

    #[test]
    fn test_missing_text_is_empty() {
        let req: SynthesisRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.text(), "");
    }

    #[test]
    fn test_builder() {
        let req = SynthesisRequest::new("hello")
            .with_language("en")
            .with_speaker("sunny")
            .with_prompt("cheerful");
        assert_eq!(req.text(), "hello");
        assert_eq!(req.language(), Some("en"));
        assert_eq!(req.speaker(), Some("sunny"));
        assert_eq!(req.prompt(), Some("cheerful"));
    }
}
