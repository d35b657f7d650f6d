use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::app_config::Config;
use crate::file_utils::{self, FileManager, FileType};
use crate::media::MediaProcessor;
use crate::subtitle_processor::SubtitleCollection;
use crate::transcription_service::TranscriptionService;

// @module: Application controller for subtitle synchronization

/// Main application controller for the recognize-synthesize-render pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Skip the final render step, leaving only the SRT
    skip_render: bool,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            skip_render: false,
        })
    }

    /// Leave the synced SRT on disk without rendering it onto the media
    pub fn skip_render(mut self, skip: bool) -> Self {
        self.skip_render = skip;
        self
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.transcription.get_active_engine_config().is_some()
    }

    /// Run the main workflow with an input media file and output directory
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(input_file, output_dir, &multi_progress, force_overwrite).await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input file exists
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        // Ensure the output directory exists
        file_utils::FileManager::ensure_dir(&output_dir)?;

        // Detect file type up front; subtitle files have nothing to recognize
        let file_type = FileManager::detect_file_type(&input_file).await?;
        if file_type == FileType::Subtitle {
            return Err(anyhow::anyhow!(
                "Input is already a subtitle file: {:?}",
                input_file
            ));
        }
        if file_type == FileType::Unknown {
            return Err(anyhow::anyhow!(
                "Input is not a media file ffmpeg can decode: {:?}",
                input_file
            ));
        }

        // Check if the synced subtitle already exists
        let srt_path = FileManager::generate_output_path(&input_file, &output_dir, "synced", "srt");
        if srt_path.exists() && !force_overwrite {
            warn!("Skipping file, synced subtitle already exists (use -f to force overwrite)");
            return Ok(());
        }

        let media = MediaProcessor::from_config(&self.config.ffmpeg);
        let service = TranscriptionService::new(self.config.transcription.clone())?;

        // Fail fast when the external binaries are missing
        media.ensure_available().await.context("ffmpeg is not available")?;
        service.check_availability().await?;

        // Scratch space for the WAV and the engine transcript; removed on drop
        let work_dir = TempDir::new().context("Failed to create working directory")?;

        if let Ok(duration) = media.probe_duration(&input_file).await {
            debug!("Input duration: {:.1}s", duration);
        }

        // Decode to the mono 16 kHz WAV the engines expect
        let convert_progress = Self::create_spinner(multi_progress, "Converting audio...");
        let wav_path = work_dir.path().join("audio.wav");
        media
            .convert_to_wav(&input_file, &wav_path)
            .await
            .context("Failed to convert input to WAV")?;
        convert_progress.finish_with_message("Audio converted");

        // Recognize speech
        let transcribe_progress = Self::create_spinner(
            multi_progress,
            format!("Transcribing with {}...", service.engine_name()),
        );
        let segments = service
            .transcribe_file(&wav_path, work_dir.path())
            .await
            .context("Transcription failed")?;
        transcribe_progress.finish_with_message(format!("Transcribed {} segments", segments.len()));

        // Synthesize and persist the subtitle document
        let subtitles = SubtitleCollection::from_segments(input_file.clone(), &segments)?;
        subtitles.write_to_srt(&srt_path)?;
        info!("Wrote synced subtitles: {:?}", srt_path);

        if log::max_level() >= log::LevelFilter::Debug {
            debug!("Subtitle preview:\n{}", subtitles.to_srt_string());
        }

        // Render the subtitles onto the media unless asked not to
        if !self.skip_render && !subtitles.entries.is_empty() {
            let render_progress = Self::create_spinner(multi_progress, "Rendering subtitles...");
            let output_media = self.render_output(&media, &input_file, &srt_path, &output_dir, file_type, force_overwrite).await?;
            match output_media {
                Some(path) => render_progress.finish_with_message(format!("Rendered {:?}", path)),
                None => render_progress.finish_with_message("Render skipped"),
            }
        }

        let elapsed = start_time.elapsed();
        info!("Completed in {}", Self::format_duration(elapsed));

        Ok(())
    }

    // @renders: Burn onto video, soft-mux next to audio
    async fn render_output(
        &self,
        media: &MediaProcessor,
        input_file: &Path,
        srt_path: &Path,
        output_dir: &Path,
        file_type: FileType,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let output_media = match file_type {
            FileType::Video => {
                let extension = input_file
                    .extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_else(|| "mkv".to_string());
                FileManager::generate_output_path(input_file, output_dir, "synced", &extension)
            }
            // Audio gets the SRT as a soft stream; MKA carries both
            _ => FileManager::generate_output_path(input_file, output_dir, "synced", "mka"),
        };

        if output_media.exists() && !force_overwrite {
            warn!("Skipping render, output already exists (use -f to force overwrite)");
            return Ok(None);
        }

        match file_type {
            FileType::Video => {
                media
                    .burn_subtitles(input_file, srt_path, &output_media)
                    .await
                    .context("Failed to burn subtitles onto video")?;
            }
            _ => {
                media
                    .mux_subtitles(input_file, srt_path, &output_media)
                    .await
                    .context("Failed to mux subtitles into audio container")?;
            }
        }

        Ok(Some(output_media))
    }

    /// Process every media file under a directory
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        info!("Processing directory: {:?}", input_dir);

        let mut processed_count = 0;
        let mut failed_count = 0;

        for entry in WalkDir::new(&input_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();

            if path.is_dir() || !Self::is_media_file(path).await {
                continue;
            }

            // Skip artifacts from a previous run
            if path
                .file_stem()
                .map(|s| s.to_string_lossy().ends_with(".synced"))
                .unwrap_or(false)
            {
                continue;
            }

            info!("Processing: {:?}", path);

            let output_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            if let Err(e) = self.run(path.to_path_buf(), output_dir, force_overwrite).await {
                error!("Error processing file: {}", e);
                failed_count += 1;
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} files ({} failed)", processed_count, failed_count);

        Ok(())
    }

    // Helper function to check if a file is audio or video
    async fn is_media_file(path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        matches!(
            FileManager::detect_file_type(path).await,
            Ok(FileType::Audio) | Ok(FileType::Video)
        )
    }

    // @creates: Spinner attached to the shared progress display
    fn create_spinner(multi_progress: &MultiProgress, message: impl Into<String>) -> ProgressBar {
        let spinner = multi_progress.add(ProgressBar::new_spinner());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    // @formats: Duration as human-readable minutes and seconds
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
