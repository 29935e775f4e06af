// Speech-to-text via the Google Cloud Speech recognize endpoint

use super::{provider_failure, request_error, SpeechRecognizer, StageError};
use crate::config::{Credentials, PipelineConfig};
use crate::pipeline::types::AudioClip;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Client for `v1/speech:recognize`
pub struct GoogleSpeechRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language_hint: String,
}

impl GoogleSpeechRecognizer {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            client: super::http_client(config),
            endpoint: config.speech_endpoint.clone(),
            api_key: credentials.google_api_key.clone(),
            language_hint: config.recognition_language.clone(),
        }
    }

    fn request_body(&self, clip: &AudioClip) -> RecognizeRequest {
        RecognizeRequest {
            config: RecognitionConfig {
                language_code: self.language_hint.clone(),
                sample_rate_hertz: clip.sample_rate(),
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(clip.bytes()),
            },
        }
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, StageError> {
        let url = format!("{}/v1/speech:recognize?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(clip))
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| StageError::Parse(e.to_string()))?;

        first_transcript(parsed)
    }
}

/// Top alternative of the first result. The recognizer answers `{}`
/// (no results at all) for silence or noise it cannot resolve.
fn first_transcript(response: RecognizeResponse) -> Result<String, StageError> {
    response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.alternatives.into_iter().next())
        .map(|alternative| alternative.transcript)
        .filter(|transcript| !transcript.trim().is_empty())
        .ok_or(StageError::Unrecognized)
}

#[derive(Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate_hertz: Option<u32>,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Deserialize)]
struct RecognitionAlternative {
    transcript: String,
}
