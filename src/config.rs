// Configuration for the pipeline and its providers

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::types::TargetLanguage;

pub const CONFIG_FILE: &str = ".parlance.json";

/// Runtime configuration, loaded from `.parlance.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory watched for newly captured clips
    #[serde(default = "default_clips_dir")]
    pub clips_dir: String,

    /// File patterns to ignore (glob patterns)
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Whether to watch hidden files/directories
    #[serde(default)]
    pub watch_hidden: bool,

    /// Translation target used when none is given explicitly
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Language hint passed to the speech recognizer
    #[serde(default = "default_recognition_language")]
    pub recognition_language: String,

    /// OpenAI model used for meaning analysis
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// OpenAI API endpoint
    #[serde(default = "default_openai_endpoint")]
    pub openai_endpoint: String,

    /// Google Speech-to-Text endpoint
    #[serde(default = "default_speech_endpoint")]
    pub speech_endpoint: String,

    /// Google Translation endpoint
    #[serde(default = "default_translate_endpoint")]
    pub translate_endpoint: String,

    /// Google Natural Language endpoint
    #[serde(default = "default_language_endpoint")]
    pub language_endpoint: String,

    /// Google Text-to-Speech endpoint
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    /// Timeout applied to every provider call, in milliseconds
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout_ms: u64,
}

fn default_clips_dir() -> String {
    "./clips".to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    vec!["**/.git/**".to_string(), "**/*.tmp".to_string(), "**/*.part".to_string()]
}

fn default_debounce() -> u64 {
    200
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_recognition_language() -> String {
    "en-US".to_string()
}

fn default_openai_model() -> String {
    std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string())
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_speech_endpoint() -> String {
    "https://speech.googleapis.com".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_language_endpoint() -> String {
    "https://language.googleapis.com".to_string()
}

fn default_tts_endpoint() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_stage_timeout() -> u64 {
    30000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clips_dir: default_clips_dir(),
            ignore_patterns: default_ignore_patterns(),
            debounce_ms: default_debounce(),
            watch_hidden: false,
            target_language: default_target_language(),
            recognition_language: default_recognition_language(),
            openai_model: default_openai_model(),
            openai_endpoint: default_openai_endpoint(),
            speech_endpoint: default_speech_endpoint(),
            translate_endpoint: default_translate_endpoint(),
            language_endpoint: default_language_endpoint(),
            tts_endpoint: default_tts_endpoint(),
            stage_timeout_ms: default_stage_timeout(),
        }
    }
}

/// `.parlance.json` from the current directory, then the home directory
pub fn find_config() -> Option<PathBuf> {
    let local_config = PathBuf::from(CONFIG_FILE);
    if local_config.exists() {
        return Some(local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(CONFIG_FILE);
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}

impl PipelineConfig {
    /// Load from the discovered config file, or fall back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match find_config() {
            Some(path) => {
                println!("📝 Loading config from: {}", path.display());
                Self::load_from(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a pretty-printed example config (for `--init`)
    pub fn write_example(path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&Self::default())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// The configured default target, parsed
    pub fn default_target(&self) -> Result<TargetLanguage, ConfigError> {
        TargetLanguage::parse(&self.target_language).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "unknown target language: {} (expected one of en, es, fr, de, hi, zh)",
                self.target_language
            ))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clips_dir.is_empty() {
            return Err(ConfigError::Invalid("clips_dir cannot be empty".to_string()));
        }
        if self.stage_timeout_ms == 0 {
            return Err(ConfigError::Invalid("stage_timeout_ms cannot be 0".to_string()));
        }
        self.default_target()?;
        Ok(())
    }
}

/// Provider credentials, read once at process start.
///
/// A missing key is fatal before any run begins.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub google_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            google_api_key: require_env("GOOGLE_API_KEY")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingCredential(name.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
