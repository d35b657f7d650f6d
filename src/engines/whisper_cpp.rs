/*!
 * Adapter for the whisper.cpp command-line frontend.
 *
 * whisper.cpp (`whisper-cli`, historically `main`) takes a 16 kHz mono WAV
 * file and, with `-oj`, writes a JSON transcript next to the requested
 * output prefix. Timestamps arrive as integral milliseconds under
 * `transcription[].offsets`.
 */

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use crate::engines::Engine;
use crate::errors::EngineError;
use crate::subtitle_processor::Segment;

// @struct: whisper.cpp CLI adapter
#[derive(Debug, Clone)]
pub struct WhisperCpp {
    // @field: Binary path or name
    binary: String,

    // @field: GGML model file path
    model: PathBuf,

    // @field: Timeout in seconds
    timeout_secs: u64,

    // @field: Extra arguments appended verbatim
    extra_args: Vec<String>,
}

/// Request for the whisper.cpp engine
#[derive(Debug, Clone)]
pub struct WhisperCppRequest {
    /// 16 kHz mono WAV input
    pub audio: PathBuf,

    /// Directory to place the JSON transcript in
    pub work_dir: PathBuf,

    /// ISO 639-1 language hint, None for auto-detection
    pub language: Option<String>,

    /// Translate the transcript to English
    pub translate: bool,
}

/// Raw JSON transcript written by `whisper-cli -oj`
#[derive(Debug, Deserialize)]
pub struct WhisperCppResponse {
    /// Recognized sentence segments
    pub transcription: Vec<CppSegment>,
}

/// One segment of the whisper.cpp transcript
#[derive(Debug, Deserialize)]
pub struct CppSegment {
    /// Millisecond offsets into the audio
    pub offsets: CppOffsets,

    /// Recognized text (whisper emits a leading space)
    pub text: String,
}

/// Start/end offsets in milliseconds
#[derive(Debug, Deserialize)]
pub struct CppOffsets {
    pub from: u64,
    pub to: u64,
}

impl WhisperCpp {
    // @creates: Adapter from resolved config values
    pub fn new(binary: String, model: PathBuf, timeout_secs: u64, extra_args: Vec<String>) -> Self {
        WhisperCpp {
            binary,
            model,
            timeout_secs,
            extra_args,
        }
    }

    // @builds: Discrete argument list for one request
    fn build_args(&self, request: &WhisperCppRequest, output_prefix: &PathBuf) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            self.model.to_string_lossy().to_string(),
            "-f".to_string(),
            request.audio.to_string_lossy().to_string(),
            "-oj".to_string(),
            "-of".to_string(),
            output_prefix.to_string_lossy().to_string(),
            "-np".to_string(),
        ];

        if let Some(language) = &request.language {
            args.push("-l".to_string());
            args.push(language.clone());
        }

        if request.translate {
            args.push("-tr".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Engine for WhisperCpp {
    type Request = WhisperCppRequest;
    type Response = WhisperCppResponse;

    async fn transcribe(&self, request: Self::Request) -> Result<Self::Response, EngineError> {
        if !request.audio.exists() {
            return Err(EngineError::SpawnFailed(format!(
                "audio file does not exist: {:?}",
                request.audio
            )));
        }

        let output_prefix = request.work_dir.join("transcript");
        let args = self.build_args(&request, &output_prefix);

        debug!("Running {} with {} args", self.binary, args.len());

        let future = Command::new(&self.binary).args(&args).output();

        let timeout = Duration::from_secs(self.timeout_secs);
        let result = tokio::select! {
            result = future => {
                result.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        EngineError::BinaryNotFound(self.binary.clone())
                    } else {
                        EngineError::SpawnFailed(e.to_string())
                    }
                })?
            },
            _ = tokio::time::sleep(timeout) => {
                return Err(EngineError::Timeout(self.timeout_secs));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(EngineError::ExecutionFailed {
                status: result.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        // `-of prefix` makes whisper.cpp write `prefix.json`
        let json_path = output_prefix.with_extension("json");
        let content = std::fs::read_to_string(&json_path).map_err(|e| {
            EngineError::ParseError(format!("missing transcript {:?}: {}", json_path, e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| EngineError::ParseError(format!("invalid transcript JSON: {}", e)))
    }

    async fn check_availability(&self) -> Result<(), EngineError> {
        if !self.model.exists() {
            return Err(EngineError::SpawnFailed(format!(
                "model file does not exist: {:?}",
                self.model
            )));
        }

        Command::new(&self.binary)
            .arg("--help")
            .output()
            .await
            .map_err(|_| EngineError::BinaryNotFound(self.binary.clone()))?;

        Ok(())
    }

    fn extract_segments(response: &Self::Response) -> Result<Vec<Segment>, EngineError> {
        let segments = response
            .transcription
            .iter()
            .map(|seg| {
                Segment::new(
                    seg.offsets.from as f64 / 1000.0,
                    seg.offsets.to as f64 / 1000.0,
                    seg.text.trim(),
                )
            })
            .collect();

        Ok(segments)
    }
}
