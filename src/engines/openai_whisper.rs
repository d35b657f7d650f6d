/*!
 * Adapter for the reference Python `whisper` command-line tool.
 *
 * `whisper audio.wav --model base --output_format json --output_dir DIR`
 * writes `audio.json` with float-second timestamps under `segments[]`.
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

// @struct: OpenAI whisper CLI adapter
#[derive(Debug, Clone)]
pub struct OpenAiWhisper {
    // @field: Binary path or name
    binary: String,

    // @field: Model name (tiny/base/small/medium/large)
    model: String,

    // @field: Timeout in seconds
    timeout_secs: u64,

    // @field: Extra arguments appended verbatim
    extra_args: Vec<String>,
}

/// Request for the OpenAI whisper engine
#[derive(Debug, Clone)]
pub struct OpenAiWhisperRequest {
    /// Audio input (any format ffmpeg can decode; we hand it the WAV anyway)
    pub audio: PathBuf,

    /// Directory to place the JSON transcript in
    pub work_dir: PathBuf,

    /// ISO 639-1 language hint, None for auto-detection
    pub language: Option<String>,

    /// Translate the transcript to English
    pub translate: bool,
}

/// Raw JSON transcript written by the whisper CLI
#[derive(Debug, Deserialize)]
pub struct OpenAiWhisperResponse {
    /// Full transcript text
    #[serde(default)]
    pub text: String,

    /// Recognized sentence segments
    pub segments: Vec<PySegment>,
}

/// One segment of the whisper transcript
#[derive(Debug, Deserialize)]
pub struct PySegment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Recognized text (whisper emits a leading space)
    pub text: String,
}

impl OpenAiWhisper {
    // @creates: Adapter from resolved config values
    pub fn new(binary: String, model: String, timeout_secs: u64, extra_args: Vec<String>) -> Self {
        OpenAiWhisper {
            binary,
            model,
            timeout_secs,
            extra_args,
        }
    }

    // @builds: Discrete argument list for one request
    fn build_args(&self, request: &OpenAiWhisperRequest) -> Vec<String> {
        let mut args = vec![
            request.audio.to_string_lossy().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            request.work_dir.to_string_lossy().to_string(),
            "--verbose".to_string(),
            "False".to_string(),
        ];

        if let Some(language) = &request.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }

        if request.translate {
            args.push("--task".to_string());
            args.push("translate".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Engine for OpenAiWhisper {
    type Request = OpenAiWhisperRequest;
    type Response = OpenAiWhisperResponse;

    async fn transcribe(&self, request: Self::Request) -> Result<Self::Response, EngineError> {
        if !request.audio.exists() {
            return Err(EngineError::SpawnFailed(format!(
                "audio file does not exist: {:?}",
                request.audio
            )));
        }

        let args = self.build_args(&request);
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

        // The CLI names the transcript after the input file stem
        let stem = request
            .audio
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());
        let json_path = request.work_dir.join(format!("{}.json", stem));

        let content = std::fs::read_to_string(&json_path).map_err(|e| {
            EngineError::ParseError(format!("missing transcript {:?}: {}", json_path, e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| EngineError::ParseError(format!("invalid transcript JSON: {}", e)))
    }

    async fn check_availability(&self) -> Result<(), EngineError> {
        Command::new(&self.binary)
            .arg("--help")
            .output()
            .await
            .map_err(|_| EngineError::BinaryNotFound(self.binary.clone()))?;

        Ok(())
    }

    fn extract_segments(response: &Self::Response) -> Result<Vec<Segment>, EngineError> {
        let segments = response
            .segments
            .iter()
            .map(|seg| Segment::new(seg.start, seg.end, seg.text.trim()))
            .collect();

        Ok(segments)
    }
}
