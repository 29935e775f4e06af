// Sentiment scoring via the Google Natural Language API

use super::{provider_failure, request_error, SentimentAnalyzer, StageError};
use crate::config::{Credentials, PipelineConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Client for `v1/documents:analyzeSentiment`.
///
/// Sentiment is scored on the original transcript, not the translation.
pub struct GoogleSentimentAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleSentimentAnalyzer {
    pub fn new(config: &PipelineConfig, credentials: &Credentials) -> Self {
        Self {
            client: super::http_client(config),
            endpoint: config.language_endpoint.clone(),
            api_key: credentials.google_api_key.clone(),
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for GoogleSentimentAnalyzer {
    async fn analyze(&self, text: &str) -> Result<f32, StageError> {
        let url = format!(
            "{}/v1/documents:analyzeSentiment?key={}",
            self.endpoint, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeSentimentRequest {
                document: Document {
                    document_type: "PLAIN_TEXT",
                    content: text,
                },
                encoding_type: "UTF8",
            })
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let parsed: AnalyzeSentimentResponse = response
            .json()
            .await
            .map_err(|e| StageError::Parse(e.to_string()))?;

        Ok(parsed.document_sentiment.score)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest<'a> {
    document: Document<'a>,
    encoding_type: &'a str,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    document_type: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    document_sentiment: Sentiment,
}

#[derive(Deserialize)]
struct Sentiment {
    #[serde(default)]
    score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = AnalyzeSentimentRequest {
            document: Document {
                document_type: "PLAIN_TEXT",
                content: "This is terrible",
            },
            encoding_type: "UTF8",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["document"]["type"], "PLAIN_TEXT");
        assert_eq!(json["document"]["content"], "This is terrible");
        assert_eq!(json["encodingType"], "UTF8");
    }

    #[test]
    fn test_response_parse() {
        let parsed: AnalyzeSentimentResponse = serde_json::from_str(
            r#"{"documentSentiment":{"magnitude":0.6,"score":-0.5},"language":"en"}"#,
        )
        .unwrap();

        assert_eq!(parsed.document_sentiment.score, -0.5);
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let parsed: AnalyzeSentimentResponse =
            serde_json::from_str(r#"{"documentSentiment":{"magnitude":0.0}}"#).unwrap();
        assert_eq!(parsed.document_sentiment.score, 0.0);
    }
}
