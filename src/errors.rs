/*!
 * Error types for the subsync application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur during subtitle synthesis and parsing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp value outside `[0, +inf)` was passed to the formatter
    #[error("Invalid timestamp value: {0} (must be a finite, non-negative number of seconds)")]
    InvalidTimestamp(f64),

    /// A segment ends before it starts
    #[error("Segment {index}: end time {end}s precedes start time {start}s")]
    OrderingViolation {
        /// 1-based position of the offending segment
        index: usize,
        /// Segment start in seconds
        start: f64,
        /// Segment end in seconds
        end: f64,
    },

    /// SRT content could not be parsed back into entries
    #[error("Failed to parse SRT content: {0}")]
    ParseError(String),
}

/// Errors that can occur when driving a recognition engine subprocess
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary is not installed or not on PATH
    #[error("Engine binary not found: {0}")]
    BinaryNotFound(String),

    /// Error spawning the engine process
    #[error("Failed to spawn engine process: {0}")]
    SpawnFailed(String),

    /// The engine process exited with a non-zero status
    #[error("Engine exited with status {status}: {stderr}")]
    ExecutionFailed {
        /// Process exit code (-1 when killed by signal)
        status: i32,
        /// Captured stderr, trimmed to meaningful lines
        stderr: String,
    },

    /// Error parsing the engine's transcript output
    #[error("Failed to parse engine output: {0}")]
    ParseError(String),

    /// The engine did not finish within the configured timeout
    #[error("Engine timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that can occur when invoking ffmpeg/ffprobe
#[derive(Error, Debug)]
pub enum MediaError {
    /// ffmpeg (or ffprobe) is not installed or not on PATH
    #[error("Transcoder binary not found: {0}")]
    FfmpegNotFound(String),

    /// ffprobe failed to inspect the input
    #[error("Failed to probe media: {0}")]
    ProbeFailed(String),

    /// Audio conversion to WAV failed
    #[error("Audio conversion failed: {0}")]
    ConversionFailed(String),

    /// Rendering subtitles onto the media failed
    #[error("Subtitle rendering failed: {0}")]
    BurnFailed(String),

    /// The transcoder did not finish within the configured timeout
    #[error("Transcoder timed out after {0} seconds")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a recognition engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from subtitle synthesis
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the transcoder
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
