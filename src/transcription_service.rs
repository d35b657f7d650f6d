use anyhow::{Result, Context, anyhow};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};

use crate::app_config::{TranscriptionConfig, TranscriptionEngine as ConfigEngine};
use crate::engines::Engine;
use crate::engines::whisper_cpp::{WhisperCpp, WhisperCppRequest};
use crate::engines::openai_whisper::{OpenAiWhisper, OpenAiWhisperRequest};
use crate::language_utils;
use crate::subtitle_processor::Segment;

// @module: Transcription service over recognition engine adapters

// @enum: Available engine implementations
enum EngineImpl {
    // @variant: whisper.cpp CLI
    WhisperCpp {
        // @field: Adapter instance
        client: WhisperCpp,
    },

    // @variant: Python whisper CLI
    OpenAiWhisper {
        // @field: Adapter instance
        client: OpenAiWhisper,
    },
}

// @struct: Transcription service facade
pub struct TranscriptionService {
    // @field: Selected engine implementation
    engine: EngineImpl,

    // @field: Normalized ISO 639-1 language hint
    language: Option<String>,

    // @field: Translate-to-English flag
    translate: bool,
}

impl TranscriptionService {
    // @creates: Service from the transcription config section
    pub fn new(config: TranscriptionConfig) -> Result<Self> {
        let language = match &config.language {
            Some(code) => Some(
                language_utils::normalize_for_engine(code)
                    .with_context(|| format!("Invalid recognition language: {}", code))?,
            ),
            None => None,
        };

        let binary = config.get_binary();
        let model = config.get_model();
        let timeout_secs = config.get_timeout_secs();
        let extra_args = config.get_extra_args();

        let engine = match config.engine {
            ConfigEngine::WhisperCpp => EngineImpl::WhisperCpp {
                client: WhisperCpp::new(binary, PathBuf::from(model), timeout_secs, extra_args),
            },
            ConfigEngine::OpenAiWhisper => EngineImpl::OpenAiWhisper {
                client: OpenAiWhisper::new(binary, model, timeout_secs, extra_args),
            },
        };

        Ok(TranscriptionService {
            engine,
            language,
            translate: config.translate,
        })
    }

    /// Check that the selected engine can run at all
    pub async fn check_availability(&self) -> Result<()> {
        match &self.engine {
            EngineImpl::WhisperCpp { client } => client
                .check_availability()
                .await
                .context("whisper.cpp engine is not available"),
            EngineImpl::OpenAiWhisper { client } => client
                .check_availability()
                .await
                .context("OpenAI whisper engine is not available"),
        }
    }

    /// Transcribe a prepared WAV file into time-stamped segments
    ///
    /// `work_dir` receives the engine's transcript files; callers normally
    /// pass a tempdir that disappears with the run.
    pub async fn transcribe_file(&self, audio: &Path, work_dir: &Path) -> Result<Vec<Segment>> {
        if let Some(language) = &self.language {
            let name = language_utils::get_language_name(language).unwrap_or_else(|_| language.clone());
            debug!("Recognition language hint: {}", name);
        }

        let segments = match &self.engine {
            EngineImpl::WhisperCpp { client } => {
                let request = WhisperCppRequest {
                    audio: audio.to_path_buf(),
                    work_dir: work_dir.to_path_buf(),
                    language: self.language.clone(),
                    translate: self.translate,
                };
                let response = client.transcribe(request).await?;
                WhisperCpp::extract_segments(&response)?
            }
            EngineImpl::OpenAiWhisper { client } => {
                let request = OpenAiWhisperRequest {
                    audio: audio.to_path_buf(),
                    work_dir: work_dir.to_path_buf(),
                    language: self.language.clone(),
                    translate: self.translate,
                };
                let response = client.transcribe(request).await?;
                OpenAiWhisper::extract_segments(&response)?
            }
        };

        let validated = Self::validate_segments(segments)?;
        info!("Recognized {} segments", validated.len());

        Ok(validated)
    }

    // @validates: Engine output against the segment contract (0 <= start <= end)
    // @drops: Segments with empty text (silence/noise artifacts)
    fn validate_segments(segments: Vec<Segment>) -> Result<Vec<Segment>> {
        let mut validated = Vec::with_capacity(segments.len());

        for (idx, segment) in segments.into_iter().enumerate() {
            if segment.text.trim().is_empty() {
                warn!("Dropping empty segment {} [{:.2}s - {:.2}s]", idx + 1, segment.start, segment.end);
                continue;
            }

            if !segment.start.is_finite() || segment.start < 0.0 || !segment.end.is_finite() {
                return Err(anyhow!(
                    "Engine produced an invalid timestamp in segment {} ({} - {})",
                    idx + 1,
                    segment.start,
                    segment.end
                ));
            }

            if segment.end < segment.start {
                return Err(anyhow!(
                    "Engine produced segment {} ending before it starts ({}s < {}s)",
                    idx + 1,
                    segment.end,
                    segment.start
                ));
            }

            validated.push(segment);
        }

        Ok(validated)
    }

    /// Engine display name for progress messages
    pub fn engine_name(&self) -> &str {
        match &self.engine {
            EngineImpl::WhisperCpp { .. } => "whisper.cpp",
            EngineImpl::OpenAiWhisper { .. } => "OpenAI Whisper",
        }
    }
}
