//! Data model for eduroam access-log and F-TICKS analysis.
//!
//! Records are created once by the parser, enriched once, and then only read
//! by the aggregation and output stages.

pub mod columns;
pub mod enums;
pub mod error;
pub mod options;
pub mod records;
pub mod session;

pub use enums::{EventKind, FticksOutcome, SessionKind, UserOrigin};
pub use error::{ModelError, Result};
pub use options::{DEFAULT_MAX_FILE_BYTES, DEFAULT_TOP_N, ParseOptions, ReportOptions};
pub use records::{AccessEvent, FticksEvent, LogRecord, ParseStats, ParsedLog};
pub use session::{EnrichedSession, INTERNATIONAL_JURISDICTION, UNKNOWN_JURISDICTION};
