/*!
 * # subsync - Subtitle synchronization from speech recognition
 *
 * A Rust library for generating synced SRT subtitles from audio and video
 * files using local speech-recognition engines.
 *
 * ## Features
 *
 * - Decode any ffmpeg-supported input to recognition-ready audio
 * - Transcribe speech with local engines:
 *   - whisper.cpp (`whisper-cli`)
 *   - OpenAI Whisper (Python CLI)
 * - Synthesize standards-compliant SRT documents from transcript segments
 * - Burn subtitles onto video or mux them next to audio via ffmpeg
 * - Batch processing of whole directories
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle synthesis, parsing, and file handling
 * - `transcription_service`: Recognition engine selection and dispatch
 * - `engines`: Adapters for local speech-recognition CLIs:
 *   - `engines::whisper_cpp`: whisper.cpp CLI adapter
 *   - `engines::openai_whisper`: Python whisper CLI adapter
 * - `media`: ffmpeg/ffprobe invocation for decoding and rendering
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod engines;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod subtitle_processor;
pub mod transcription_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use media::MediaProcessor;
pub use subtitle_processor::{format_timestamp, format_timestamp_ms, synthesize, Segment, SubtitleCollection, SubtitleEntry};
pub use transcription_service::TranscriptionService;
pub use language_utils::{language_codes_match, normalize_for_engine, get_language_name};
pub use errors::{AppError, EngineError, MediaError, SubtitleError};
