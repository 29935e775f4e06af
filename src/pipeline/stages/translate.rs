// Translation and language detection via the Google Translation v2 API

use super::{provider_failure, request_error, LanguageDetector, StageError, TextTranslator};
use crate::config::{Credentials, PipelineConfig};
use crate::pipeline::types::TargetLanguage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Client for `language/translate/v2` and its `detect` sibling.
///
/// The translate call carries only the text and the target code; the
/// provider re-detects the source language internally. The separately
/// detected language tag is for display only.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslator {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            client: super::http_client(config),
            endpoint: config.translate_endpoint.clone(),
            api_key: credentials.google_api_key.clone(),
        }
    }
}

#[async_trait]
impl TextTranslator for GoogleTranslator {
    async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, StageError> {
        let url = format!("{}/language/translate/v2?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&TranslateRequest {
                q: text,
                target: target.as_str(),
                format: "text",
            })
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| StageError::Parse(e.to_string()))?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|entry| entry.translated_text)
            .ok_or_else(|| StageError::Parse("empty translation result".to_string()))
    }
}

#[async_trait]
impl LanguageDetector for GoogleTranslator {
    async fn detect(&self, text: &str) -> Result<String, StageError> {
        let url = format!("{}/language/translate/v2/detect?key={}", self.endpoint, self.api_key);

        let response = self
            .client
            .post(&url)
            .json(&DetectRequest { q: text })
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let parsed: DetectResponse = response
            .json()
            .await
            .map_err(|e| StageError::Parse(e.to_string()))?;

        parsed
            .data
            .detections
            .into_iter()
            .next()
            .and_then(|candidates| candidates.into_iter().next())
            .map(|entry| entry.language)
            .ok_or_else(|| StageError::Parse("empty detection result".to_string()))
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Deserialize)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<TranslationEntry>,
}

#[derive(Deserialize)]
struct TranslationEntry {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    data: DetectionList,
}

#[derive(Deserialize)]
struct DetectionList {
    #[serde(default)]
    detections: Vec<Vec<DetectionEntry>>,
}

#[derive(Deserialize)]
struct DetectionEntry {
    language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_shape() {
        let body = TranslateRequest {
            q: "I am so happy today",
            target: "es",
            format: "text",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["q"], "I am so happy today");
        assert_eq!(json["target"], "es");
        assert_eq!(json["format"], "text");
    }

    #[test]
    fn test_translate_response_parse() {
        let parsed: TranslateResponse = serde_json::from_str(
            r#"{"data":{"translations":[{"translatedText":"Estoy muy feliz hoy","detectedSourceLanguage":"en"}]}}"#,
        )
        .unwrap();

        assert_eq!(parsed.data.translations[0].translated_text, "Estoy muy feliz hoy");
    }

    #[test]
    fn test_detect_response_parse() {
        let parsed: DetectResponse = serde_json::from_str(
            r#"{"data":{"detections":[[{"language":"en","isReliable":false,"confidence":0.92}]]}}"#,
        )
        .unwrap();

        assert_eq!(parsed.data.detections[0][0].language, "en");
    }
}
