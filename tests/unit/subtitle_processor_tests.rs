/*!
 * Tests for subtitle synthesis functionality
 */

use std::fmt::Write;
use anyhow::Result;
use subsync::errors::SubtitleError;
use subsync::subtitle_processor::{
    format_timestamp, format_timestamp_ms, synthesize, Segment, SubtitleCollection, SubtitleEntry,
};
use crate::common;

/// Test timestamp formatting at zero
#[test]
fn test_format_timestamp_withZero_shouldFormatAllZeros() {
    assert_eq!(format_timestamp(0.0).unwrap(), "00:00:00,000");
}

/// Test timestamp formatting across all fields
#[test]
fn test_format_timestamp_withHoursMinutesSeconds_shouldFormatEachField() {
    assert_eq!(format_timestamp(3661.5).unwrap(), "01:01:01,500");
}

/// Test rounding to the nearest millisecond without crossing the second
#[test]
fn test_format_timestamp_withSubMillisecondValue_shouldRoundToNearestMs() {
    assert_eq!(format_timestamp(59.999).unwrap(), "00:00:59,999");
}

/// Test that a fraction rounding up to a full second carries cleanly
#[test]
fn test_format_timestamp_withFractionRoundingToFullSecond_shouldCarryIntoSeconds() {
    assert_eq!(format_timestamp(1.9996).unwrap(), "00:00:02,000");
}

/// Test fixed output width for values below 100 hours
#[test]
fn test_format_timestamp_withValuesBelow100Hours_shouldBeTwelveChars() {
    let pattern = regex::Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}$").unwrap();

    for &seconds in &[0.0, 0.001, 1.0, 59.999, 60.0, 3599.5, 3600.0, 86399.0, 359999.999] {
        let formatted = format_timestamp(seconds).unwrap();
        assert_eq!(formatted.len(), 12, "wrong width for {}: {}", seconds, formatted);
        assert!(pattern.is_match(&formatted), "bad shape for {}: {}", seconds, formatted);
    }
}

/// Test that hours widen past 99 instead of wrapping
#[test]
fn test_format_timestamp_withMoreThan99Hours_shouldWidenHoursField() {
    // 360000 s = 100 h
    assert_eq!(format_timestamp(360000.0).unwrap(), "100:00:00,000");
    assert_eq!(format_timestamp(360000.0).unwrap().len(), 13);
}

/// Test rejection of negative input
#[test]
fn test_format_timestamp_withNegativeValue_shouldFail() {
    let err = format_timestamp(-1.0).unwrap_err();
    assert!(matches!(err, SubtitleError::InvalidTimestamp(_)));
}

/// Test rejection of non-finite input
#[test]
fn test_format_timestamp_withNonFiniteValue_shouldFail() {
    assert!(format_timestamp(f64::NAN).is_err());
    assert!(format_timestamp(f64::INFINITY).is_err());
}

/// Test the millisecond-based formatting primitive
#[test]
fn test_format_timestamp_ms_withKnownValues_shouldFormatCorrectly() {
    assert_eq!(format_timestamp_ms(0), "00:00:00,000");
    assert_eq!(format_timestamp_ms(5025678), "01:23:45,678");
    assert_eq!(format_timestamp_ms(61234), "00:01:01,234");
}

/// Test synthesis of an empty segment sequence
#[test]
fn test_synthesize_withNoSegments_shouldYieldEmptyDocument() {
    assert_eq!(synthesize(&[]).unwrap(), "");
}

/// Test the exact document produced for two segments
#[test]
fn test_synthesize_withTwoSegments_shouldMatchExpectedDocument() {
    let document = synthesize(&common::sample_segments()).unwrap();

    let expected = "1\n00:00:00,000 --> 00:00:01,500\nHi\n\n2\n00:00:01,500 --> 00:00:03,000\nThere\n\n";
    assert_eq!(document, expected);
}

/// Test that entry indices count up from 1 in input order
#[test]
fn test_synthesize_withSeveralSegments_shouldNumberEntriesFromOne() {
    let segments = vec![
        Segment::new(0.0, 1.0, "a"),
        Segment::new(1.0, 2.0, "b"),
        Segment::new(2.0, 3.0, "c"),
    ];

    let entries = SubtitleCollection::parse_srt_string(&synthesize(&segments).unwrap()).unwrap();
    let seq_nums: Vec<usize> = entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(seq_nums, vec![1, 2, 3]);
}

/// Test rejection of a segment ending before it starts
#[test]
fn test_synthesize_withMisorderedSegment_shouldFailWithoutOutput() {
    let segments = vec![
        Segment::new(0.0, 1.0, "fine"),
        Segment::new(5.0, 2.0, "backwards"),
    ];

    let err = synthesize(&segments).unwrap_err();
    match err {
        SubtitleError::OrderingViolation { index, start, end } => {
            assert_eq!(index, 2);
            assert_eq!(start, 5.0);
            assert_eq!(end, 2.0);
        }
        other => panic!("expected OrderingViolation, got {:?}", other),
    }
}

/// Test that a zero-length segment is accepted (start == end)
#[test]
fn test_synthesize_withZeroLengthSegment_shouldSucceed() {
    let segments = vec![Segment::new(1.0, 1.0, "blip")];
    let document = synthesize(&segments).unwrap();
    assert!(document.contains("00:00:01,000 --> 00:00:01,000"));
}

/// Test determinism of synthesis
#[test]
fn test_synthesize_withSameInputTwice_shouldProduceIdenticalOutput() {
    let segments = common::sample_segments();
    assert_eq!(synthesize(&segments).unwrap(), synthesize(&segments).unwrap());
}

/// Test parse-then-serialize round trip
#[test]
fn test_parse_srt_string_withSynthesizedDocument_shouldRoundTripByteIdentical() -> Result<()> {
    let document = synthesize(&common::sample_segments())?;

    let entries = SubtitleCollection::parse_srt_string(&document)?;
    let mut reserialized = String::new();
    for entry in &entries {
        write!(reserialized, "{}", entry)?;
    }

    assert_eq!(reserialized, document);
    Ok(())
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

/// Test timestamp parsing back to milliseconds
#[test]
fn test_parse_timestamp_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5025678);

    let formatted = format_timestamp_ms(ms);
    assert_eq!(formatted, ts);
}

/// Test timestamp parsing rejects out-of-range components
#[test]
fn test_parse_timestamp_withInvalidComponents_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:61,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());
}

/// Test entry derivation from a segment
#[test]
fn test_from_segment_withValidSegment_shouldConvertToMilliseconds() {
    let entry = SubtitleEntry::from_segment(7, &Segment::new(1.25, 2.5, "  padded  ")).unwrap();

    assert_eq!(entry.seq_num, 7);
    assert_eq!(entry.start_time_ms, 1250);
    assert_eq!(entry.end_time_ms, 2500);
    assert_eq!(entry.text, "padded");
}

/// Test multi-line text survives parsing
#[test]
fn test_parse_srt_string_withMultiLineText_shouldKeepAllLines() -> Result<()> {
    let srt_content = "1\n00:00:01,000 --> 00:00:04,000\nHello world\n\n2\n00:00:05,000 --> 00:00:08,000\nTest subtitle\nSecond line\n\n";

    let entries = SubtitleCollection::parse_srt_string(srt_content)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "Hello world");
    assert_eq!(entries[1].text, "Test subtitle\nSecond line");
    Ok(())
}

/// Test parsing rejects malformed content
#[test]
fn test_parse_srt_string_withMalformedContent_shouldFail() {
    assert!(SubtitleCollection::parse_srt_string("not an srt document\n").is_err());
}

/// Test collection construction and SRT file writing
#[test]
fn test_write_to_srt_withCollection_shouldWriteSerializedDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt_path = temp_dir.path().join("out.srt");

    let collection = SubtitleCollection::from_segments(
        temp_dir.path().join("audio.wav"),
        &common::sample_segments(),
    )?;
    collection.write_to_srt(&srt_path)?;

    let written = std::fs::read_to_string(&srt_path)?;
    assert_eq!(written, collection.to_srt_string());
    assert!(written.starts_with("1\n00:00:00,000 --> 00:00:01,500\nHi\n"));
    Ok(())
}
