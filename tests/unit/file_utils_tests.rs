/*!
 * Tests for file utility functionality
 */

use anyhow::Result;
use std::path::PathBuf;
use subsync::file_utils::{FileManager, FileType};
use crate::common;

/// Test file existence check
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file_path = common::create_test_file(&temp_dir.path().to_path_buf(), "exists.txt", "content")?;

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test directory existence check
#[test]
fn test_dir_exists_withExistingDir_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(temp_dir.path().join("missing")));
    Ok(())
}

/// Test directory creation with parents
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAllParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(nested.is_dir());
    Ok(())
}

/// Test output path generation
#[test]
fn test_generate_output_path_withMediaFile_shouldTagAndRetarget() {
    let output = FileManager::generate_output_path(
        PathBuf::from("/media/show/episode.mkv"),
        PathBuf::from("/media/show"),
        "synced",
        "srt",
    );

    assert_eq!(output, PathBuf::from("/media/show/episode.synced.srt"));
}

/// Test finding files by extension
#[test]
fn test_find_files_withMixedExtensions_shouldFilterCaseInsensitive() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "one.srt", "x")?;
    common::create_test_file(&dir, "two.SRT", "x")?;
    common::create_test_file(&dir, "three.txt", "x")?;

    let found = FileManager::find_files(&dir, "srt")?;
    assert_eq!(found.len(), 2);

    let found_dotted = FileManager::find_files(&dir, ".srt")?;
    assert_eq!(found_dotted.len(), 2);
    Ok(())
}

/// Test read/write round trip
#[test]
fn test_write_to_file_withNestedTarget_shouldCreateParentAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("deep").join("file.txt");

    FileManager::write_to_file(&target, "round trip")?;
    assert_eq!(FileManager::read_to_string(&target)?, "round trip");
    Ok(())
}

/// Test detection of subtitle files by extension
#[tokio::test]
async fn test_detect_file_type_withSrtExtension_shouldReturnSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let subtitle = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "sample.srt")?;

    let file_type = FileManager::detect_file_type(&subtitle).await?;
    assert_eq!(file_type, FileType::Subtitle);
    Ok(())
}

/// Test detection of audio and video files by extension
#[tokio::test]
async fn test_detect_file_type_withMediaExtensions_shouldClassifyByExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    // Extension-based detection does not read the content
    let audio = common::create_test_file(&dir, "track.mp3", "")?;
    let video = common::create_test_file(&dir, "clip.mkv", "")?;

    assert_eq!(FileManager::detect_file_type(&audio).await?, FileType::Audio);
    assert_eq!(FileManager::detect_file_type(&video).await?, FileType::Video);
    Ok(())
}

/// Test detection falls back to content sniffing for unknown extensions
#[tokio::test]
async fn test_detect_file_type_withSrtContentButOddExtension_shouldReturnSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n";
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "subtitle.bak", content)?;

    let file_type = FileManager::detect_file_type(&path).await?;
    assert_eq!(file_type, FileType::Subtitle);
    Ok(())
}

/// Test detection errors on missing files
#[tokio::test]
async fn test_detect_file_type_withMissingFile_shouldFail() {
    let result = FileManager::detect_file_type(PathBuf::from("/no/such/file.mkv")).await;
    assert!(result.is_err());
}
