use std::path::Path;
use std::time::Duration;
use log::{error, debug};
use serde_json::Value;
use tokio::process::Command;

use crate::app_config::FfmpegConfig;
use crate::errors::MediaError;

// @module: ffmpeg/ffprobe adapter for decoding and subtitle rendering

// @struct: Transcoder wrapper around the configured ffmpeg binaries
#[derive(Debug, Clone)]
pub struct MediaProcessor {
    // @field: ffmpeg binary path or name
    ffmpeg: String,

    // @field: ffprobe binary path or name
    ffprobe: String,

    // @field: Target sample rate for recognition input
    sample_rate: u32,

    // @field: Per-invocation timeout
    timeout_secs: u64,
}

impl MediaProcessor {
    // @creates: Processor from the ffmpeg config section
    pub fn from_config(config: &FfmpegConfig) -> Self {
        MediaProcessor {
            ffmpeg: config.ffmpeg_path.clone(),
            ffprobe: config.ffprobe_path.clone(),
            sample_rate: config.sample_rate,
            timeout_secs: config.timeout_secs,
        }
    }

    /// Check that the configured ffmpeg binary exists and runs
    pub async fn ensure_available(&self) -> Result<(), MediaError> {
        let result = Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .await
            .map_err(|_| MediaError::FfmpegNotFound(self.ffmpeg.clone()))?;

        if !result.status.success() {
            return Err(MediaError::FfmpegNotFound(self.ffmpeg.clone()));
        }

        Ok(())
    }

    /// Probe the duration of a media file in seconds
    pub async fn probe_duration<P: AsRef<Path>>(&self, path: P) -> Result<f64, MediaError> {
        let path = path.as_ref();

        let output = self
            .run_with_timeout(Command::new(&self.ffprobe).args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                path.to_str().unwrap_or_default(),
            ]))
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::ProbeFailed(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: Value = serde_json::from_str(&stdout)
            .map_err(|e| MediaError::ProbeFailed(format!("invalid ffprobe JSON: {}", e)))?;

        json.get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| MediaError::ProbeFailed("no duration in ffprobe output".to_string()))
    }

    /// Decode any input to the mono PCM WAV the recognition engines expect
    pub async fn convert_to_wav<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input: P1,
        output: P2,
    ) -> Result<(), MediaError> {
        let input = input.as_ref();
        let output = output.as_ref();

        debug!("Converting {:?} to {} Hz mono WAV", input, self.sample_rate);

        let result = self
            .run_with_timeout(Command::new(&self.ffmpeg).args([
                "-y",
                "-i",
                input.to_str().unwrap_or_default(),
                "-vn",
                "-ar",
                &self.sample_rate.to_string(),
                "-ac",
                "1",
                "-c:a",
                "pcm_s16le",
                output.to_str().unwrap_or_default(),
            ]))
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Audio conversion failed: {}", filtered);
            return Err(MediaError::ConversionFailed(filtered));
        }

        Ok(())
    }

    /// Render a subtitle file onto a video via the ffmpeg subtitles filter
    pub async fn burn_subtitles<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
        &self,
        input: P1,
        subtitles: P2,
        output: P3,
    ) -> Result<(), MediaError> {
        let input = input.as_ref();
        let subtitles = subtitles.as_ref();
        let output = output.as_ref();

        let filter = format!("subtitles={}", Self::escape_filter_path(subtitles));

        let result = self
            .run_with_timeout(Command::new(&self.ffmpeg).args([
                "-y",
                "-i",
                input.to_str().unwrap_or_default(),
                "-vf",
                &filter,
                "-c:a",
                "copy",
                output.to_str().unwrap_or_default(),
            ]))
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Subtitle burn failed: {}", filtered);
            return Err(MediaError::BurnFailed(filtered));
        }

        Ok(())
    }

    /// Attach a subtitle file to audio as a soft subtitle stream (MKA output)
    ///
    /// Audio-only inputs have no video stream for the subtitles filter to
    /// draw on, so the synced result carries the SRT as its own stream.
    pub async fn mux_subtitles<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
        &self,
        input: P1,
        subtitles: P2,
        output: P3,
    ) -> Result<(), MediaError> {
        let input = input.as_ref();
        let subtitles = subtitles.as_ref();
        let output = output.as_ref();

        let result = self
            .run_with_timeout(Command::new(&self.ffmpeg).args([
                "-y",
                "-i",
                input.to_str().unwrap_or_default(),
                "-i",
                subtitles.to_str().unwrap_or_default(),
                "-map",
                "0",
                "-map",
                "1",
                "-c",
                "copy",
                "-c:s",
                "srt",
                output.to_str().unwrap_or_default(),
            ]))
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Subtitle mux failed: {}", filtered);
            return Err(MediaError::BurnFailed(filtered));
        }

        Ok(())
    }

    // @runs: Command with output capture, bounded by the configured timeout
    async fn run_with_timeout(&self, command: &mut Command) -> Result<std::process::Output, MediaError> {
        let future = command.output();

        let timeout = Duration::from_secs(self.timeout_secs);
        tokio::select! {
            result = future => {
                result.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        MediaError::FfmpegNotFound(self.ffmpeg.clone())
                    } else {
                        MediaError::ConversionFailed(e.to_string())
                    }
                })
            },
            _ = tokio::time::sleep(timeout) => {
                Err(MediaError::Timeout(self.timeout_secs))
            }
        }
    }

    /// Escape a path for use inside an ffmpeg filter argument
    ///
    /// The filter graph parser treats `\`, `'`, `:`, `[`, `]`, `,` and `;`
    /// specially even when the whole filter string is a single argv element.
    pub fn escape_filter_path<P: AsRef<Path>>(path: P) -> String {
        let raw = path.as_ref().to_string_lossy();
        let mut escaped = String::with_capacity(raw.len());

        for c in raw.chars() {
            if matches!(c, '\\' | '\'' | ':' | '[' | ']' | ',' | ';' | '=') {
                escaped.push('\\');
            }
            escaped.push(c);
        }

        escaped
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Stream #",
            "      Metadata:",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "size=",
            "frame=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| line.starts_with(p) || trimmed.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}
