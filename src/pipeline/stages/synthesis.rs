// Text-to-speech via the Google Text-to-Speech synthesize endpoint

use super::{provider_failure, request_error, SpeechSynthesizer, StageError};
use crate::config::{Credentials, PipelineConfig};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Client for `v1/text:synthesize`. Neutral voice gender, MP3 output.
pub struct GoogleSpeechSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleSpeechSynthesizer {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            client: super::http_client(config),
            endpoint: config.tts_endpoint.clone(),
            api_key: credentials.google_api_key.clone(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechSynthesizer {
    async fn synthesize(&self, text: &str, voice_code: &str) -> Result<Vec<u8>, StageError> {
        let url = format!("{}/v1/text:synthesize?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&SynthesizeRequest {
                input: SynthesisInput { text },
                voice: VoiceSelection {
                    language_code: voice_code,
                    ssml_gender: "NEUTRAL",
                },
                audio_config: AudioConfig {
                    audio_encoding: "MP3",
                },
            })
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| StageError::Parse(e.to_string()))?;

        decode_audio(&parsed.audio_content)
    }
}

/// The synthesized audio arrives base64-encoded in the JSON body
fn decode_audio(content: &str) -> Result<Vec<u8>, StageError> {
    base64::engine::general_purpose::STANDARD
        .decode(content)
        .map_err(|e| StageError::Parse(format!("invalid audio content: {}", e)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}
