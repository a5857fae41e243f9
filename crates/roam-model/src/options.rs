//! Run options for parsing and reporting.

use serde::{Deserialize, Serialize};

/// Default upper bound for a whole-file read (512 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 512 * 1024 * 1024;

/// Default length of top-N rankings.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Stop after this many records (access + F-TICKS). `None` reads all.
    pub max_records: Option<usize>,
    /// Refuse files larger than this.
    pub max_file_bytes: u64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_records: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_max_records(mut self, limit: Option<usize>) -> Self {
        self.max_records = limit;
        self
    }

    #[must_use]
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub top_n: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

impl ReportOptions {
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}
