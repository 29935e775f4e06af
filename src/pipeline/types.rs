// Core types for the voice translation pipeline

use serde::{Deserialize, Serialize};

/// Languages offered as translation targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    En,
    Es,
    Fr,
    De,
    Hi,
    Zh,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 6] = [
        TargetLanguage::En,
        TargetLanguage::Es,
        TargetLanguage::Fr,
        TargetLanguage::De,
        TargetLanguage::Hi,
        TargetLanguage::Zh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::En => "en",
            TargetLanguage::Es => "es",
            TargetLanguage::Fr => "fr",
            TargetLanguage::De => "de",
            TargetLanguage::Hi => "hi",
            TargetLanguage::Zh => "zh",
        }
    }

    /// Voice language code used for speech synthesis.
    ///
    /// The synthesis voice catalog has no plain "zh" entry; Mandarin
    /// (Mainland China) voices are listed under "cmn-CN".
    pub fn voice_code(&self) -> &'static str {
        match self {
            TargetLanguage::Zh => "cmn-CN",
            other => other.as_str(),
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "en" => Some(TargetLanguage::En),
            "es" => Some(TargetLanguage::Es),
            "fr" => Some(TargetLanguage::Fr),
            "de" => Some(TargetLanguage::De),
            "hi" => Some(TargetLanguage::Hi),
            "zh" => Some(TargetLanguage::Zh),
            _ => None,
        }
    }
}

/// A captured voice clip, raw WAV bytes
#[derive(Debug, Clone)]
pub struct AudioClip {
    bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if the bytes carry a RIFF/WAVE header
    pub fn is_wav(&self) -> bool {
        self.bytes.len() >= 12 && &self.bytes[0..4] == b"RIFF" && &self.bytes[8..12] == b"WAVE"
    }

    /// Sample rate from the `fmt ` chunk, if the header is well formed
    pub fn sample_rate(&self) -> Option<u32> {
        if !self.is_wav() {
            return None;
        }

        let mut pos = 12;
        while pos + 8 <= self.bytes.len() {
            let id = &self.bytes[pos..pos + 4];
            let size = u32::from_le_bytes(self.bytes[pos + 4..pos + 8].try_into().ok()?) as usize;
            if id == b"fmt " {
                let data = self.bytes.get(pos + 8..pos + 8 + size)?;
                if data.len() < 8 {
                    return None;
                }
                return Some(u32::from_le_bytes(data[4..8].try_into().ok()?));
            }
            // Chunks are word aligned
            pos += 8 + size + (size & 1);
        }

        None
    }
}

/// Three-way mood classification derived from a sentiment score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Positive,
    Negative,
    Neutral,
}

impl MoodLabel {
    /// Scores above 0.3 are positive, below -0.3 negative. Both
    /// boundaries classify as neutral.
    pub fn from_score(score: f32) -> Self {
        if score > 0.3 {
            MoodLabel::Positive
        } else if score < -0.3 {
            MoodLabel::Negative
        } else {
            MoodLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Positive => "Positive",
            MoodLabel::Negative => "Negative",
            MoodLabel::Neutral => "Neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoodLabel::Positive => "😊",
            MoodLabel::Negative => "😠",
            MoodLabel::Neutral => "😐",
        }
    }
}

/// The six pipeline stages, in execution order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Transcription,
    Detection,
    Translation,
    Sentiment,
    Meaning,
    Synthesis,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Transcription => "transcription",
            StageName::Detection => "detection",
            StageName::Translation => "translation",
            StageName::Sentiment => "sentiment",
            StageName::Meaning => "meaning",
            StageName::Synthesis => "synthesis",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full bundle of per-stage results from one completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Transcribed speech, exactly as the recognizer returned it
    pub text: String,

    /// Detected source language code (display only)
    pub source_language: String,

    /// Translation of `text` into the target language
    pub translated_text: String,

    /// Mood derived from `sentiment_score`
    pub mood: MoodLabel,

    /// Raw sentiment score, nominally in [-1.0, 1.0]
    pub sentiment_score: f32,

    /// What the speaker really means, per the language model
    pub meaning: String,

    /// Synthesized speech for `translated_text`, MP3 bytes
    #[serde(skip_serializing)]
    pub audio: Vec<u8>,
}

impl PipelineReport {
    /// Sentiment score rendered to exactly two decimal places
    pub fn score_formatted(&self) -> String {
        format!("{:.2}", self.sentiment_score)
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Every stage completed
    Completed(PipelineReport),

    /// The recognizer could not resolve the clip to text; no further
    /// stage ran
    TranscriptionFailed,
}
