// Collaborator seam - one trait per external capability provider

mod meaning;
mod sentiment;
mod speech;
mod synthesis;
mod translate;

pub use meaning::OpenAiMeaningExplainer;
pub use sentiment::GoogleSentimentAnalyzer;
pub use speech::GoogleSpeechRecognizer;
pub use synthesis::GoogleSpeechSynthesizer;
pub use translate::GoogleTranslator;

use crate::config::{Credentials, PipelineConfig};
use crate::pipeline::types::{AudioClip, TargetLanguage};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Converts a voice clip into text
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, StageError>;
}

/// Identifies the language of a piece of text
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<String, StageError>;
}

/// Translates text into a target language
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, StageError>;
}

/// Scores the sentiment of text
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<f32, StageError>;
}

/// Explains what the speaker really means
#[async_trait]
pub trait MeaningExplainer: Send + Sync {
    async fn explain(&self, text: &str) -> Result<String, StageError>;
}

/// Synthesizes spoken audio for text in a given voice language
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_code: &str) -> Result<Vec<u8>, StageError>;
}

/// The six collaborator handles one pipeline runs against.
///
/// Handles are injected rather than constructed globally so tests can
/// substitute fakes for any stage.
#[derive(Clone)]
pub struct Collaborators {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub detector: Arc<dyn LanguageDetector>,
    pub translator: Arc<dyn TextTranslator>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    pub explainer: Arc<dyn MeaningExplainer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl Collaborators {
    /// Wire up the production providers: Google Cloud for speech,
    /// detection, translation, sentiment and synthesis, OpenAI for
    /// meaning analysis. Detection rides on the translation client.
    pub fn google_openai(config: &PipelineConfig, credentials: &Credentials) -> Self {
        let translator = Arc::new(GoogleTranslator::new(config, credentials));

        Self {
            recognizer: Arc::new(GoogleSpeechRecognizer::new(config, credentials)),
            detector: translator.clone(),
            translator,
            sentiment: Arc::new(GoogleSentimentAnalyzer::new(config, credentials)),
            explainer: Arc::new(OpenAiMeaningExplainer::new(config, credentials)),
            synthesizer: Arc::new(GoogleSpeechSynthesizer::new(config, credentials)),
        }
    }
}

/// Error from a single collaborator call
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The recognizer could not map the audio to text
    #[error("could not understand audio")]
    Unrecognized,

    #[error("network error: {0}")]
    Network(String),

    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("timed out")]
    Timeout,
}

/// Shared HTTP client, with the per-call timeout every stage runs under
pub(crate) fn http_client(config: &PipelineConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.stage_timeout_ms))
        .build()
        .expect("Failed to create HTTP client")
}

pub(crate) fn request_error(err: reqwest::Error) -> StageError {
    if err.is_timeout() {
        StageError::Timeout
    } else {
        StageError::Network(err.to_string())
    }
}

pub(crate) async fn provider_failure(response: reqwest::Response) -> StageError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
    StageError::Provider { status, message }
}
