//! Batch and lazy parsing of whole logs.
//!
//! The batch entry points read every line before returning, keeping the
//! original relative order of records inside each table. [`Records`] exposes
//! the same classification as a one-pass iterator so callers can stop early.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;

use roam_model::{LogRecord, ParseOptions, ParseStats, ParsedLog};
use tracing::debug;

use crate::classify::classify_line;
use crate::decode::{decode_lossy, utf16_bom};
use crate::error::{IngestError, Result};
use crate::normalize::{normalize_access, normalize_fticks};

/// Records produced by one line: zero, one, or two (both grammars matched).
#[derive(Debug, Default)]
struct LineRecords {
    first: Option<LogRecord>,
    second: Option<LogRecord>,
}

impl Iterator for LineRecords {
    type Item = LogRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.first.take().or_else(|| self.second.take())
    }
}

/// Classify and normalize one line, updating the line-level counters.
fn process_line(line_number: usize, raw: &str, stats: &mut ParseStats) -> LineRecords {
    stats.lines += 1;
    let line = raw.trim();
    if line.is_empty() {
        stats.blank_lines += 1;
        return LineRecords::default();
    }

    let matched = classify_line(line);
    if !matched.is_match() {
        stats.unmatched_lines += 1;
        return LineRecords::default();
    }

    let access = matched
        .access()
        .map(|fields| normalize_access(line_number, fields));
    let fticks = matched
        .fticks()
        .map(|fields| normalize_fticks(line_number, fields));

    if access.as_ref().is_some_and(|r| r.timestamp.is_none()) {
        stats.unparsed_timestamps += 1;
    }
    if fticks.as_ref().is_some_and(|r| r.timestamp.is_none()) {
        stats.unparsed_timestamps += 1;
    }
    LineRecords {
        first: access.map(LogRecord::Access),
        second: fticks.map(LogRecord::Fticks),
    }
}

/// Lazy, finite, one-pass sequence of records over in-memory text.
///
/// Line numbers are 1-based. Restart by calling [`records`] again.
pub struct Records<'a> {
    lines: Enumerate<Lines<'a>>,
    pending: LineRecords,
    stats: ParseStats,
}

impl Records<'_> {
    /// Counters for the lines consumed so far.
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }
}

impl Iterator for Records<'_> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(record);
            }
            let (index, line) = self.lines.next()?;
            self.pending = process_line(index + 1, line, &mut self.stats);
        }
    }
}

/// Iterate the records of `text` lazily.
pub fn records(text: &str) -> Records<'_> {
    Records {
        lines: text.lines().enumerate(),
        pending: LineRecords::default(),
        stats: ParseStats::default(),
    }
}

/// Accumulates records into the two tables, honouring the record limit.
struct Collector {
    parsed: ParsedLog,
    limit: Option<usize>,
}

impl Collector {
    fn new(options: &ParseOptions) -> Self {
        Self {
            parsed: ParsedLog::default(),
            limit: options.max_records,
        }
    }

    fn is_full(&self) -> bool {
        self.limit
            .is_some_and(|limit| self.parsed.stats.records() >= limit)
    }

    /// Returns false once the limit is reached.
    fn push(&mut self, record: LogRecord) -> bool {
        if self.is_full() {
            self.parsed.stats.truncated = true;
            return false;
        }
        self.parsed.push(record);
        true
    }

    fn finish(mut self, line_stats: &ParseStats) -> ParsedLog {
        let stats = &mut self.parsed.stats;
        stats.lines = line_stats.lines;
        stats.blank_lines = line_stats.blank_lines;
        stats.unmatched_lines = line_stats.unmatched_lines;
        stats.unparsed_timestamps = line_stats.unparsed_timestamps;
        debug!(
            lines = stats.lines,
            access_records = stats.access_records,
            fticks_records = stats.fticks_records,
            unmatched_lines = stats.unmatched_lines,
            unparsed_timestamps = stats.unparsed_timestamps,
            truncated = stats.truncated,
            "log parsed"
        );
        self.parsed
    }
}

/// Parse in-memory text into the access and F-TICKS tables.
pub fn parse_str(text: &str, options: &ParseOptions) -> ParsedLog {
    let mut collector = Collector::new(options);
    let mut iter = records(text);
    for record in iter.by_ref() {
        if !collector.push(record) {
            break;
        }
    }
    collector.finish(iter.stats())
}

/// Parse raw bytes, dropping invalid UTF-8 sequences.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> ParsedLog {
    parse_str(&decode_lossy(bytes), options)
}

/// Parse a line-oriented stream. Each line is decoded on its own, so one
/// damaged line never affects its neighbours.
pub fn parse_reader<R: BufRead>(mut reader: R, options: &ParseOptions) -> Result<ParsedLog> {
    let mut collector = Collector::new(options);
    let mut stats = ParseStats::default();
    let mut buffer = Vec::new();
    let mut line_number = 0usize;

    'lines: loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;
        let text = decode_lossy(&buffer);
        for record in process_line(line_number, &text, &mut stats) {
            if !collector.push(record) {
                break 'lines;
            }
        }
    }

    Ok(collector.finish(&stats))
}

/// Read and parse a log file.
///
/// # Errors
///
/// Fails when the file is missing or unreadable, or larger than
/// `options.max_file_bytes`. A UTF-16 file is transcoded as a whole; any
/// other file is decoded line by line.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParsedLog> {
    let file_err = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let metadata = std::fs::metadata(path).map_err(file_err)?;
    if metadata.len() > options.max_file_bytes {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: options.max_file_bytes,
        });
    }

    let mut reader = BufReader::new(File::open(path).map_err(file_err)?);
    let mut head = [0u8; 2];
    let mut filled = 0;
    while filled < head.len() {
        let read = reader.read(&mut head[filled..]).map_err(file_err)?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    if let Some(encoding) = utf16_bom(&head[..filled]) {
        debug!(path = %path.display(), encoding, "transcoding log file");
        let mut bytes = head[..filled].to_vec();
        reader.read_to_end(&mut bytes).map_err(file_err)?;
        return Ok(parse_bytes(&bytes, options));
    }

    debug!(path = %path.display(), bytes = metadata.len(), "reading log file");
    let stream = (&head[..filled]).chain(reader);
    parse_reader(BufReader::new(stream), options).map_err(|err| match err {
        IngestError::StreamRead(source) => file_err(source),
        other => other,
    })
}
