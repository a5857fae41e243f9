//! Typed records extracted from access and F-TICKS log lines.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{EventKind, FticksOutcome};

/// One `Access-Accept` / `Access-Reject` line.
///
/// Only the event kind and server IP are guaranteed; every other field is an
/// optional capture and stays `None` when the line does not carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// 1-based line number in the source text.
    pub line: usize,
    /// `None` when the timestamp text did not parse.
    pub timestamp: Option<NaiveDateTime>,
    pub event: EventKind,
    pub username: Option<String>,
    pub station_id: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub server_ip: String,
    pub cui: Option<String>,
}

impl AccessEvent {
    /// Realm part of the username (after the first `@`), if any.
    pub fn realm(&self) -> Option<&str> {
        self.username
            .as_deref()
            .and_then(|user| user.split_once('@'))
            .map(|(_, realm)| realm)
    }
}

/// One `F-TICKS/eduroam/<version>#...` line.
///
/// Segment values are the raw text between delimiters; an empty segment is an
/// empty string, never `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FticksEvent {
    pub line: usize,
    pub timestamp: Option<NaiveDateTime>,
    /// `REALM` segment; empty when the segment is absent.
    pub realm: String,
    pub visiting_country: String,
    pub visiting_institution: String,
    pub csi: String,
    pub result: String,
    pub outcome: FticksOutcome,
}

impl FticksEvent {
    /// Builds the record and derives the outcome from `result`.
    pub fn new(
        line: usize,
        timestamp: Option<NaiveDateTime>,
        realm: String,
        visiting_country: String,
        visiting_institution: String,
        csi: String,
        result: String,
    ) -> Self {
        let outcome = FticksOutcome::from_result(&result);
        Self {
            line,
            timestamp,
            realm,
            visiting_country,
            visiting_institution,
            csi,
            result,
            outcome,
        }
    }

    pub fn reason(&self) -> &'static str {
        self.outcome.reason()
    }
}

/// A record produced from a single log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Access(AccessEvent),
    Fticks(FticksEvent),
}

impl LogRecord {
    pub fn line(&self) -> usize {
        match self {
            LogRecord::Access(event) => event.line,
            LogRecord::Fticks(event) => event.line,
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            LogRecord::Access(event) => event.timestamp,
            LogRecord::Fticks(event) => event.timestamp,
        }
    }
}

/// Counters collected while parsing. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines: usize,
    pub blank_lines: usize,
    pub access_records: usize,
    pub fticks_records: usize,
    pub unmatched_lines: usize,
    pub unparsed_timestamps: usize,
    /// Parsing stopped early because of a record limit.
    pub truncated: bool,
}

impl ParseStats {
    pub fn records(&self) -> usize {
        self.access_records + self.fticks_records
    }
}

/// The two parallel tables extracted from one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub access: Vec<AccessEvent>,
    pub fticks: Vec<FticksEvent>,
    pub stats: ParseStats,
}

impl ParsedLog {
    /// No line matched either grammar.
    pub fn is_empty(&self) -> bool {
        self.access.is_empty() && self.fticks.is_empty()
    }

    pub fn push(&mut self, record: LogRecord) {
        match record {
            LogRecord::Access(event) => {
                self.stats.access_records += 1;
                self.access.push(event);
            }
            LogRecord::Fticks(event) => {
                self.stats.fticks_records += 1;
                self.fticks.push(event);
            }
        }
    }
}
