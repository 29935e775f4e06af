// Pipeline orchestrator - drives one clip through the six stages in order

use super::stages::{Collaborators, StageError};
use super::types::{
    AudioClip, MoodLabel, PipelineOutcome, PipelineReport, StageName, TargetLanguage,
};
use std::future::Future;

/// Drives the fixed stage sequence against injected collaborators.
///
/// Stages run strictly in order; every entity a stage produces is
/// created once and handed to the next stage unchanged.
pub struct Pipeline {
    collaborators: Collaborators,
}

impl Pipeline {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Run one clip through the whole pipeline.
    ///
    /// A clip the recognizer cannot resolve ends the run with
    /// `PipelineOutcome::TranscriptionFailed` and no further stage is
    /// called. Any other stage failure halts the run with an error
    /// naming the stage.
    pub async fn run(
        &self,
        clip: &AudioClip,
        target: TargetLanguage,
    ) -> Result<PipelineOutcome, PipelineError> {
        let text = match self
            .attempt(StageName::Transcription, || {
                self.collaborators.recognizer.transcribe(clip)
            })
            .await
        {
            Ok(text) => text,
            Err(PipelineError::Stage {
                source: StageError::Unrecognized,
                ..
            }) => return Ok(PipelineOutcome::TranscriptionFailed),
            Err(e) => return Err(e),
        };

        let source_language = self
            .attempt(StageName::Detection, || {
                self.collaborators.detector.detect(&text)
            })
            .await?;

        // The detected tag is not forwarded; the provider re-detects
        let translated_text = self
            .attempt(StageName::Translation, || {
                self.collaborators.translator.translate(&text, target)
            })
            .await?;

        // Sentiment and meaning both read the original transcript
        let sentiment_score = self
            .attempt(StageName::Sentiment, || {
                self.collaborators.sentiment.analyze(&text)
            })
            .await?;
        let mood = MoodLabel::from_score(sentiment_score);

        let meaning = self
            .attempt(StageName::Meaning, || {
                self.collaborators.explainer.explain(&text)
            })
            .await?;

        let audio = self
            .attempt(StageName::Synthesis, || {
                self.collaborators
                    .synthesizer
                    .synthesize(&translated_text, target.voice_code())
            })
            .await?;

        Ok(PipelineOutcome::Completed(PipelineReport {
            text,
            source_language,
            translated_text,
            mood,
            sentiment_score,
            meaning,
            audio,
        }))
    }

    /// Issue one collaborator call with a single retry.
    ///
    /// `Unrecognized` is a definitive answer from the recognizer, not a
    /// transient fault, and is returned without a second attempt.
    async fn attempt<T, F, Fut>(&self, stage: StageName, call: F) -> Result<T, PipelineError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StageError>>,
    {
        match call().await {
            Ok(value) => Ok(value),
            Err(StageError::Unrecognized) => Err(PipelineError::Stage {
                stage,
                source: StageError::Unrecognized,
            }),
            Err(first) => {
                eprintln!("⚠️  {} stage failed, retrying: {}", stage, first);
                call()
                    .await
                    .map_err(|source| PipelineError::Stage { stage, source })
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: StageName,
        source: StageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::{
        LanguageDetector, MeaningExplainer, SentimentAnalyzer, SpeechRecognizer,
        SpeechSynthesizer, TextTranslator,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CallLog {
        transcribe: AtomicUsize,
        detect: AtomicUsize,
        translate: AtomicUsize,
        sentiment: AtomicUsize,
        meaning: AtomicUsize,
        synthesize: AtomicUsize,
        meaning_inputs: Mutex<Vec<String>>,
        voice_codes: Mutex<Vec<String>>,
    }

    /// One fake standing in for all six collaborators
    struct FakeProviders {
        log: CallLog,
        transcript: Option<String>,
        score: f32,
        detect_failures: AtomicUsize,
    }

    impl FakeProviders {
        fn new(transcript: Option<&str>, score: f32) -> Arc<Self> {
            Arc::new(Self {
                log: CallLog::default(),
                transcript: transcript.map(str::to_string),
                score,
                detect_failures: AtomicUsize::new(0),
            })
        }

        fn failing_detection(transcript: &str, failures: usize) -> Arc<Self> {
            Arc::new(Self {
                log: CallLog::default(),
                transcript: Some(transcript.to_string()),
                score: 0.0,
                detect_failures: AtomicUsize::new(failures),
            })
        }

        fn collaborators(fake: &Arc<Self>) -> Collaborators {
            Collaborators {
                recognizer: fake.clone(),
                detector: fake.clone(),
                translator: fake.clone(),
                sentiment: fake.clone(),
                explainer: fake.clone(),
                synthesizer: fake.clone(),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for FakeProviders {
        async fn transcribe(&self, _clip: &AudioClip) -> Result<String, StageError> {
            self.log.transcribe.fetch_add(1, Ordering::SeqCst);
            self.transcript.clone().ok_or(StageError::Unrecognized)
        }
    }

    #[async_trait]
    impl LanguageDetector for FakeProviders {
        async fn detect(&self, _text: &str) -> Result<String, StageError> {
            self.log.detect.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .detect_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(StageError::Network("connection reset".to_string()));
            }
            Ok("en".to_string())
        }
    }

    #[async_trait]
    impl TextTranslator for FakeProviders {
        async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String, StageError> {
            self.log.translate.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}] {}", target.as_str(), text))
        }
    }

    #[async_trait]
    impl SentimentAnalyzer for FakeProviders {
        async fn analyze(&self, _text: &str) -> Result<f32, StageError> {
            self.log.sentiment.fetch_add(1, Ordering::SeqCst);
            Ok(self.score)
        }
    }

    #[async_trait]
    impl MeaningExplainer for FakeProviders {
        async fn explain(&self, text: &str) -> Result<String, StageError> {
            self.log.meaning.fetch_add(1, Ordering::SeqCst);
            self.log.meaning_inputs.lock().unwrap().push(text.to_string());
            Ok("The speaker is sincere.".to_string())
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeProviders {
        async fn synthesize(&self, _text: &str, voice_code: &str) -> Result<Vec<u8>, StageError> {
            self.log.synthesize.fetch_add(1, Ordering::SeqCst);
            self.log.voice_codes.lock().unwrap().push(voice_code.to_string());
            Ok(b"mp3".to_vec())
        }
    }

    fn clip() -> AudioClip {
        AudioClip::new(vec![0; 64])
    }

    #[tokio::test]
    async fn test_happy_path_spanish() {
        let fake = FakeProviders::new(Some("I am so happy today"), 0.62);
        let pipeline = Pipeline::new(FakeProviders::collaborators(&fake));

        let outcome = pipeline.run(&clip(), TargetLanguage::Es).await.unwrap();
        let report = match outcome {
            PipelineOutcome::Completed(report) => report,
            other => panic!("expected completed outcome, got {:?}", other),
        };

        assert_eq!(report.text, "I am so happy today");
        assert_eq!(report.source_language, "en");
        assert_eq!(report.translated_text, "[es] I am so happy today");
        assert_eq!(report.mood, MoodLabel::Positive);
        assert_eq!(report.score_formatted(), "0.62");
        assert!(!report.audio.is_empty());

        // Sentiment and meaning both saw the original transcript
        assert_eq!(
            fake.log.meaning_inputs.lock().unwrap().as_slice(),
            ["I am so happy today"]
        );
        assert_eq!(fake.log.voice_codes.lock().unwrap().as_slice(), ["es"]);
    }

    #[tokio::test]
    async fn test_mandarin_uses_regional_voice_code() {
        let fake = FakeProviders::new(Some("This is terrible"), -0.5);
        let pipeline = Pipeline::new(FakeProviders::collaborators(&fake));

        let outcome = pipeline.run(&clip(), TargetLanguage::Zh).await.unwrap();
        let report = match outcome {
            PipelineOutcome::Completed(report) => report,
            other => panic!("expected completed outcome, got {:?}", other),
        };

        assert_eq!(report.mood, MoodLabel::Negative);
        assert_eq!(fake.log.voice_codes.lock().unwrap().as_slice(), ["cmn-CN"]);
    }

    #[tokio::test]
    async fn test_transcription_failure_short_circuits() {
        let fake = FakeProviders::new(None, 0.9);
        let pipeline = Pipeline::new(FakeProviders::collaborators(&fake));

        let outcome = pipeline.run(&clip(), TargetLanguage::En).await.unwrap();
        assert!(matches!(outcome, PipelineOutcome::TranscriptionFailed));

        // Unrecognized is definitive: exactly one recognizer call, no retry
        assert_eq!(fake.log.transcribe.load(Ordering::SeqCst), 1);

        // And nothing downstream ever ran
        assert_eq!(fake.log.detect.load(Ordering::SeqCst), 0);
        assert_eq!(fake.log.translate.load(Ordering::SeqCst), 0);
        assert_eq!(fake.log.sentiment.load(Ordering::SeqCst), 0);
        assert_eq!(fake.log.meaning.load(Ordering::SeqCst), 0);
        assert_eq!(fake.log.synthesize.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_stage_retries_once() {
        let fake = FakeProviders::failing_detection("hello", 1);
        let pipeline = Pipeline::new(FakeProviders::collaborators(&fake));

        let outcome = pipeline.run(&clip(), TargetLanguage::Fr).await.unwrap();
        assert!(matches!(outcome, PipelineOutcome::Completed(_)));
        assert_eq!(fake.log.detect.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stage_failing_twice_halts_run() {
        let fake = FakeProviders::failing_detection("hello", 2);
        let pipeline = Pipeline::new(FakeProviders::collaborators(&fake));

        let err = pipeline.run(&clip(), TargetLanguage::Fr).await.unwrap_err();
        let PipelineError::Stage { stage, .. } = err;
        assert_eq!(stage, StageName::Detection);

        assert_eq!(fake.log.detect.load(Ordering::SeqCst), 2);
        assert_eq!(fake.log.translate.load(Ordering::SeqCst), 0);
        assert_eq!(fake.log.synthesize.load(Ordering::SeqCst), 0);
    }
}
