use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Source/target language hint sent alongside every snapshot
#[derive(Debug, Clone)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new("sv", "en")
    }
}

/// Successful backend payload for one snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResult {
    pub transcription: String,
    /// Null when the backend's translation step failed; the transcription is
    /// still usable on its own
    pub translation: Option<String>,
}

impl TranscriptionResult {
    /// Text to show the user: the translation when the backend produced one,
    /// otherwise the raw transcription
    pub fn display_text(&self) -> &str {
        self.translation.as_deref().unwrap_or(&self.transcription)
    }
}

/// Ways a single snapshot upload can fail.
///
/// Every variant is terminal for that one snapshot only; the capture loop
/// never sees these.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Error sending file: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Error sending file. Status code: {0}")]
    BackendStatus(StatusCode),
    #[error("Error: 'translation' not found in response: {0}")]
    MalformedResponse(String),
}

/// Client for the remote transcription/translation backend.
///
/// One multipart POST per snapshot, best effort: no retries, no cancellation
/// of in-flight requests.
pub struct UploadClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl UploadClient {
    /// Creates a client for the given endpoint.
    ///
    /// The request timeout is generous because the round trip is dominated
    /// by backend inference time.
    pub fn new(endpoint_url: String) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            client,
            endpoint_url,
        })
    }

    /// Uploads one encoded snapshot and returns the backend's verdict.
    ///
    /// # Arguments
    /// * `wav_bytes` - The snapshot container produced by the encoder
    /// * `languages` - Language pair hint for transcription and translation
    pub async fn send(
        &self,
        wav_bytes: Vec<u8>,
        languages: &LanguagePair,
    ) -> Result<TranscriptionResult, UploadError> {
        let audio_part = Part::bytes(wav_bytes)
            .file_name("clip.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .part("file", audio_part)
            .text("source_language", languages.source.clone())
            .text("target_language", languages.target.clone());

        let response = self
            .client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::BackendStatus(status));
        }

        let body = response.text().await?;
        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => return Err(UploadError::MalformedResponse(body)),
        };
        // A 2xx body without the translation key is an application-level
        // error even though transport succeeded.
        if value.get("translation").is_none() {
            return Err(UploadError::MalformedResponse(body));
        }
        serde_json::from_value(value).map_err(|_| UploadError::MalformedResponse(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_prefers_translation() {
        let result = TranscriptionResult {
            transcription: "hej".to_string(),
            translation: Some("hi".to_string()),
        };
        assert_eq!(result.display_text(), "hi");
    }

    #[test]
    fn display_text_falls_back_to_transcription() {
        let result = TranscriptionResult {
            transcription: "hej".to_string(),
            translation: None,
        };
        assert_eq!(result.display_text(), "hej");
    }

    #[test]
    fn default_language_pair_is_swedish_to_english() {
        let languages = LanguagePair::default();
        assert_eq!(languages.source, "sv");
        assert_eq!(languages.target, "en");
    }
}
