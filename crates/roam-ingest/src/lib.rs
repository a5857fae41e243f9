//! Eduroam log ingestion.
//!
//! Turns raw RADIUS access-log and F-TICKS text into the two typed record
//! tables of [`roam_model::ParsedLog`].
//!
//! # Pipeline
//!
//! - **Decode**: lossy UTF-8, invalid bytes dropped ([`decode_lossy`])
//! - **Classify**: both grammars tried on every line ([`classify_line`])
//! - **Normalize**: timestamps parsed, absent fields kept as `None`
//!
//! Lines matching neither grammar are skipped and only counted.
//!
//! # Example
//!
//! ```ignore
//! use roam_ingest::parse_file;
//! use roam_model::ParseOptions;
//!
//! let parsed = parse_file(Path::new("radius.log"), &ParseOptions::default())?;
//! if parsed.is_empty() {
//!     println!("No valid eduroam log entries found");
//! }
//! ```

mod classify;
mod decode;
mod error;
mod normalize;
mod parser;

// === Error Types ===
pub use error::{IngestError, Result};

// === Classification ===
pub use classify::{AccessFields, FticksFields, LineMatch, classify_line, match_access, match_fticks};

// === Normalization ===
pub use normalize::{LOG_TIMESTAMP_FORMAT, normalize_access, normalize_fticks, parse_timestamp};

// === Parsing ===
pub use decode::decode_lossy;
pub use parser::{Records, parse_bytes, parse_file, parse_reader, parse_str, records};
