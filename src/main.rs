// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::Path;
use std::path::PathBuf;
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, TranscriptionEngine};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod engines;
mod errors;
mod file_utils;
mod language_utils;
mod media;
mod subtitle_processor;
mod transcription_service;

/// CLI Wrapper for TranscriptionEngine to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranscriptionEngine {
    WhisperCpp,
    OpenAiWhisper,
}

impl From<CliTranscriptionEngine> for TranscriptionEngine {
    fn from(cli_engine: CliTranscriptionEngine) -> Self {
        match cli_engine {
            CliTranscriptionEngine::WhisperCpp => TranscriptionEngine::WhisperCpp,
            CliTranscriptionEngine::OpenAiWhisper => TranscriptionEngine::OpenAiWhisper,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate synced subtitles for a media file (default command)
    Sync(SyncArgs),

    /// Generate shell completions for subsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SyncArgs {
    /// Input media file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Recognition engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliTranscriptionEngine>,

    /// Model path (whisper.cpp) or model name (OpenAI whisper)
    #[arg(short, long)]
    model: Option<String>,

    /// Language code of the speech (e.g., 'en', 'es', 'fr'); auto-detect when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Translate the transcript to English
    #[arg(short, long)]
    translate: bool,

    /// Write the synced SRT without rendering it onto the media
    #[arg(short, long)]
    srt_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subsync - speech-recognition subtitle synchronizer
///
/// Recognizes speech in audio or video files with a local whisper engine,
/// synthesizes a synced SRT subtitle file, and renders it back onto the media
/// with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "subsync")]
#[command(author = "subsync contributors")]
#[command(version = "1.0.0")]
#[command(about = "Speech-recognition subtitle synchronizer")]
#[command(long_about = "subsync transcribes audio/video files with a local whisper engine and writes
perfectly synced SRT subtitles, optionally rendering them onto the media.

EXAMPLES:
    subsync movie.mkv                        # Sync subtitles using default config
    subsync -f movie.mkv                     # Force overwrite existing outputs
    subsync -e openai-whisper -m base in.mp3 # Use a specific engine and model
    subsync -l en podcast.mp3                # Pin the speech language to English
    subsync -s movie.mkv                     # Only write the SRT, skip rendering
    subsync --log-level debug /media/        # Process a directory with debug logging
    subsync completions bash > subsync.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED ENGINES:
    whisper-cpp    - whisper.cpp CLI (default; needs a ggml model file)
    openai-whisper - Python whisper CLI (models fetched by name)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input media file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Recognition engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliTranscriptionEngine>,

    /// Model path (whisper.cpp) or model name (OpenAI whisper)
    #[arg(short, long)]
    model: Option<String>,

    /// Language code of the speech (e.g., 'en', 'es', 'fr'); auto-detect when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Translate the transcript to English
    #[arg(short, long)]
    translate: bool,

    /// Write the synced SRT without rendering it onto the media
    #[arg(short, long)]
    srt_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subsync", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Sync(args)) => run_sync(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let sync_args = SyncArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                engine: cli.engine,
                model: cli.model,
                language: cli.language,
                translate: cli.translate,
                srt_only: cli.srt_only,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_sync(sync_args).await
        }
    }
}

async fn run_sync(options: SyncArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(engine) = &options.engine {
            config.transcription.engine = engine.clone().into();
        }

        if let Some(model) = &options.model {
            // Find the engine config and update the model
            let engine_str = config.transcription.engine.to_lowercase_string();
            if let Some(engine_config) = config
                .transcription
                .available_engines
                .iter_mut()
                .find(|e| e.engine_type == engine_str)
            {
                engine_config.model = model.clone();
            }
        }

        if let Some(language) = &options.language {
            config.transcription.language = Some(language.clone());
        }

        if options.translate {
            config.transcription.translate = true;
        }

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(engine) = &options.engine {
            config.transcription.engine = engine.clone().into();
        }

        if let Some(model) = &options.model {
            let engine_str = config.transcription.engine.to_lowercase_string();
            if let Some(engine_config) = config
                .transcription
                .available_engines
                .iter_mut()
                .find(|e| e.engine_type == engine_str)
            {
                engine_config.model = model.clone();
            }
        }

        if let Some(language) = &options.language {
            config.transcription.language = Some(language.clone());
        }

        if options.translate {
            config.transcription.translate = true;
        }

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config.clone())?.skip_render(options.srt_only);

    // Run the controller with the input file(s)
    if options.input_path.is_file() {
        // Process a single file
        controller
            .run(
                options.input_path.clone(),
                options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
                options.force_overwrite,
            )
            .await?;
    } else if options.input_path.is_dir() {
        // Process a directory
        controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

// @converts: Config log level to a log crate level filter
fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
