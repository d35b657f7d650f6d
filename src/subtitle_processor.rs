use std::fmt;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

// @module: Subtitle synthesis from recognition segments

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Time-stamped transcript segment from a recognition engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Segment {
    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Recognized text
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
        }
    }
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number (1-based)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Subtitle entry derived from a segment and its 1-based position
    // @validates: Time range before any output is produced
    pub fn from_segment(seq_num: usize, segment: &Segment) -> Result<Self, SubtitleError> {
        if !segment.start.is_finite() || segment.start < 0.0 {
            return Err(SubtitleError::InvalidTimestamp(segment.start));
        }
        if !segment.end.is_finite() {
            return Err(SubtitleError::InvalidTimestamp(segment.end));
        }
        if segment.end < segment.start {
            return Err(SubtitleError::OrderingViolation {
                index: seq_num,
                start: segment.start,
                end: segment.end,
            });
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms: seconds_to_ms(segment.start),
            end_time_ms: seconds_to_ms(segment.end),
            text: segment.text.trim().to_string(),
        })
    }

    /// Parse an SRT timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow::anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow::anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp_ms(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp_ms(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

// @converts: Float seconds to whole milliseconds, rounding to the nearest ms
//
// Rounding happens on the total rather than the fractional part alone, so a
// fraction that rounds up to a full second carries into the seconds field
// instead of producing a 4-digit millisecond group.
fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).round() as u64
}

/// Format a number of seconds as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// The hours field is not clamped: inputs beyond 99 hours render with as
/// many digits as needed rather than wrapping around.
pub fn format_timestamp(seconds: f64) -> Result<String, SubtitleError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SubtitleError::InvalidTimestamp(seconds));
    }

    Ok(format_timestamp_ms(seconds_to_ms(seconds)))
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Serialize recognition segments into an SRT document.
///
/// Entries are numbered from 1 in input order; input order encodes playback
/// order. Each block is `index / time-range / text / blank line`, and the
/// document ends with a blank line after the final block. An empty segment
/// slice yields an empty document.
///
/// Fails without producing any output if a segment has a negative or
/// non-finite time, or ends before it starts.
pub fn synthesize(segments: &[Segment]) -> Result<String, SubtitleError> {
    let mut entries = Vec::with_capacity(segments.len());
    for (idx, segment) in segments.iter().enumerate() {
        entries.push(SubtitleEntry::from_segment(idx + 1, segment)?);
    }

    let mut document = String::new();
    for entry in &entries {
        // Display cannot fail when writing to a String
        let _ = write!(document, "{}", entry);
    }

    Ok(document)
}

/// Collection of subtitle entries tied to a source media file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source media file the entries were recognized from
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection for a source file
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    // @creates: Collection from engine segments, numbered from 1 in input order
    pub fn from_segments(source_file: PathBuf, segments: &[Segment]) -> Result<Self, SubtitleError> {
        let mut entries = Vec::with_capacity(segments.len());
        for (idx, segment) in segments.iter().enumerate() {
            entries.push(SubtitleEntry::from_segment(idx + 1, segment)?);
        }

        Ok(SubtitleCollection {
            source_file,
            entries,
        })
    }

    /// Serialize all entries to an SRT document string
    pub fn to_srt_string(&self) -> String {
        let mut document = String::new();
        for entry in &self.entries {
            let _ = write!(document, "{}", entry);
        }
        document
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Parse SRT format string into subtitle entries
    ///
    /// Used for previews and round-trip checks; re-serializing the parsed
    /// entries reproduces the input byte-for-byte for well-formed documents.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let mut entries = Vec::new();

        let mut current_seq_num: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut finalize = |seq_num: Option<usize>,
                            times: Option<(u64, u64)>,
                            text: &str|
         -> Result<(), SubtitleError> {
            if let (Some(seq_num), Some((start_ms, end_ms))) = (seq_num, times) {
                if text.trim().is_empty() {
                    return Err(SubtitleError::ParseError(format!(
                        "entry {} has no text",
                        seq_num
                    )));
                }
                entries.push(SubtitleEntry::new(
                    seq_num,
                    start_ms,
                    end_ms,
                    text.trim_end().to_string(),
                ));
            }
            Ok(())
        };

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            // Blank line terminates the current entry
            if trimmed.is_empty() {
                finalize(current_seq_num, current_times, &current_text)?;
                current_seq_num = None;
                current_times = None;
                current_text.clear();
                continue;
            }

            // Sequence number opens a new entry
            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
                return Err(SubtitleError::ParseError(format!(
                    "expected sequence number at line {}, found: {}",
                    line_no + 1,
                    trimmed
                )));
            }

            // Time range follows the sequence number
            if current_seq_num.is_some() && current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    let start_ms = Self::captured_ms(&caps, 1);
                    let end_ms = Self::captured_ms(&caps, 5);
                    current_times = Some((start_ms, end_ms));
                    continue;
                }
                return Err(SubtitleError::ParseError(format!(
                    "expected time range at line {}, found: {}",
                    line_no + 1,
                    trimmed
                )));
            }

            // Everything else is subtitle text
            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }

        // Final entry when the document does not end in a blank line
        finalize(current_seq_num, current_times, &current_text)?;

        Ok(entries)
    }

    // @converts: Regex capture group quartet starting at start_idx to milliseconds
    fn captured_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let field = |i: usize| -> u64 {
            caps.get(start_idx + i)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + field(3)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
