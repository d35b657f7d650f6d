use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcription config
    pub transcription: TranscriptionConfig,

    /// ffmpeg/ffprobe config
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Recognition engine type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionEngine {
    // @engine: whisper.cpp CLI
    #[default]
    WhisperCpp,
    // @engine: Python whisper CLI
    OpenAiWhisper,
}

impl TranscriptionEngine {
    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::WhisperCpp => "whisper.cpp",
            Self::OpenAiWhisper => "OpenAI Whisper",
        }
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::WhisperCpp => "whispercpp".to_string(),
            Self::OpenAiWhisper => "openaiwhisper".to_string(),
        }
    }
}

// Implement Display trait for TranscriptionEngine
impl std::fmt::Display for TranscriptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranscriptionEngine
impl std::str::FromStr for TranscriptionEngine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "whispercpp" | "whisper-cpp" | "whisper.cpp" => Ok(Self::WhisperCpp),
            "openaiwhisper" | "openai-whisper" | "whisper" => Ok(Self::OpenAiWhisper),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Engine configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    // @field: Engine type identifier
    #[serde(rename = "type")]
    pub engine_type: String,

    // @field: Binary path or name
    #[serde(default = "String::new")]
    pub binary: String,

    // @field: Model path (whisper.cpp) or model name (OpenAI whisper)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Timeout seconds
    #[serde(default = "default_engine_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Extra CLI arguments appended verbatim
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl EngineConfig {
    // @param engine_type: Engine enum
    // @returns: Engine config with defaults
    pub fn new(engine_type: TranscriptionEngine) -> Self {
        match engine_type {
            TranscriptionEngine::WhisperCpp => Self {
                engine_type: "whispercpp".to_string(),
                binary: default_whispercpp_binary(),
                model: default_whispercpp_model(),
                timeout_secs: default_engine_timeout_secs(),
                extra_args: Vec::new(),
            },
            TranscriptionEngine::OpenAiWhisper => Self {
                engine_type: "openaiwhisper".to_string(),
                binary: default_openai_whisper_binary(),
                model: default_openai_whisper_model(),
                timeout_secs: default_engine_timeout_secs(),
                extra_args: Vec::new(),
            },
        }
    }
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Recognition engine to use
    #[serde(default)]
    pub engine: TranscriptionEngine,

    /// Available engine configurations
    #[serde(default)]
    pub available_engines: Vec<EngineConfig>,

    /// ISO 639 language hint for recognition, None for auto-detection
    #[serde(default)]
    pub language: Option<String>,

    /// Translate the transcript to English (engine-level)
    #[serde(default)]
    pub translate: bool,
}

/// ffmpeg/ffprobe configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FfmpegConfig {
    /// ffmpeg binary path or name
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// ffprobe binary path or name
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Sample rate handed to the recognition engines
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Timeout per ffmpeg invocation in seconds
    #[serde(default = "default_ffmpeg_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            sample_rate: default_sample_rate(),
            timeout_secs: default_ffmpeg_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_engine_timeout_secs() -> u64 {
    600
}

fn default_ffmpeg_timeout_secs() -> u64 {
    300
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_whispercpp_binary() -> String {
    "whisper-cli".to_string()
}

fn default_openai_whisper_binary() -> String {
    "whisper".to_string()
}

fn default_whispercpp_model() -> String {
    // ggml models live under the user's data dir unless configured otherwise
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("subsync")
        .join("models")
        .join("ggml-base.bin")
        .to_string_lossy()
        .to_string()
}

fn default_openai_whisper_model() -> String {
    "base".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate the language hint when one is set
        if let Some(language) = &self.transcription.language {
            crate::language_utils::validate_language_code(language)?;
        }

        // The active engine must have a configuration entry
        if self.transcription.get_active_engine_config().is_none() {
            return Err(anyhow!(
                "No configuration entry for engine '{}'",
                self.transcription.engine
            ));
        }

        // A model is required for both engines
        if self.transcription.get_model().is_empty() {
            return Err(anyhow!(
                "A model is required for engine '{}'",
                self.transcription.engine
            ));
        }

        if self.ffmpeg.sample_rate == 0 {
            return Err(anyhow!("ffmpeg.sample_rate must be non-zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            transcription: TranscriptionConfig::default(),
            ffmpeg: FfmpegConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranscriptionConfig {
    /// Get the active engine configuration from the available_engines array
    pub fn get_active_engine_config(&self) -> Option<&EngineConfig> {
        let engine_str = self.engine.to_lowercase_string();
        self.available_engines
            .iter()
            .find(|e| e.engine_type == engine_str)
    }

    /// Get a specific engine configuration by type
    pub fn get_engine_config(&self, engine_type: &TranscriptionEngine) -> Option<&EngineConfig> {
        let engine_str = engine_type.to_lowercase_string();
        self.available_engines
            .iter()
            .find(|e| e.engine_type == engine_str)
    }

    /// Get the binary for the active engine
    pub fn get_binary(&self) -> String {
        if let Some(engine_config) = self.get_active_engine_config() {
            if !engine_config.binary.is_empty() {
                return engine_config.binary.clone();
            }
        }

        // Default fallback based on engine type
        match self.engine {
            TranscriptionEngine::WhisperCpp => default_whispercpp_binary(),
            TranscriptionEngine::OpenAiWhisper => default_openai_whisper_binary(),
        }
    }

    /// Get the model for the active engine
    pub fn get_model(&self) -> String {
        if let Some(engine_config) = self.get_active_engine_config() {
            if !engine_config.model.is_empty() {
                return engine_config.model.clone();
            }
        }

        // Default fallback based on engine type
        match self.engine {
            TranscriptionEngine::WhisperCpp => default_whispercpp_model(),
            TranscriptionEngine::OpenAiWhisper => default_openai_whisper_model(),
        }
    }

    /// Get the timeout for the active engine
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(engine_config) = self.get_active_engine_config() {
            if engine_config.timeout_secs > 0 {
                return engine_config.timeout_secs;
            }
        }

        default_engine_timeout_secs()
    }

    /// Get the extra arguments for the active engine
    pub fn get_extra_args(&self) -> Vec<String> {
        self.get_active_engine_config()
            .map(|e| e.extra_args.clone())
            .unwrap_or_default()
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        let mut config = Self {
            engine: TranscriptionEngine::default(),
            available_engines: Vec::new(),
            language: None,
            translate: false,
        };

        // Add default engines
        config.available_engines.push(EngineConfig::new(TranscriptionEngine::WhisperCpp));
        config.available_engines.push(EngineConfig::new(TranscriptionEngine::OpenAiWhisper));

        config
    }
}
