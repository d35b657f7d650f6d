/*!
 * Recognition engine adapters.
 *
 * This module contains adapters for local speech-recognition CLIs:
 * - WhisperCpp: the whisper.cpp command-line frontend (`whisper-cli`)
 * - OpenAiWhisper: the reference Python `whisper` command-line tool
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::EngineError;
use crate::subtitle_processor::Segment;

/// Common trait for all recognition engines
///
/// This trait defines the interface that all engine adapters must follow,
/// allowing them to be used interchangeably by the transcription service.
#[async_trait]
pub trait Engine: Send + Sync + Debug {
    /// The request type for this engine
    type Request: Send + Sync;

    /// The response type for this engine
    type Response: Send + Sync;

    /// Run a transcription request through this engine
    ///
    /// # Arguments
    /// * `request` - The request to run
    ///
    /// # Returns
    /// * `Result<Self::Response, EngineError>` - The engine's raw output or an error
    async fn transcribe(&self, request: Self::Request) -> Result<Self::Response, EngineError>;

    /// Check that the engine binary is installed and usable
    ///
    /// # Returns
    /// * `Result<(), EngineError>` - Ok if the engine can run, or an error
    async fn check_availability(&self) -> Result<(), EngineError>;

    /// Extract time-stamped segments from the engine response
    ///
    /// # Arguments
    /// * `response` - The response from the engine
    ///
    /// # Returns
    /// * `Result<Vec<Segment>, EngineError>` - The recognized segments
    fn extract_segments(response: &Self::Response) -> Result<Vec<Segment>, EngineError>;
}

pub mod whisper_cpp;
pub mod openai_whisper;
