//! Flat-table output for parsed and enriched logs.
//!
//! Tables are built as polars `DataFrame`s with stable column names and
//! written with the `csv` crate. Reports are written as JSON.

pub mod error;
pub mod export;
pub mod frame;

pub use error::{OutputError, Result};
pub use export::{
    ACCESS_CSV, ExportTables, ExportedFiles, FTICKS_CSV, REPORT_JSON, SESSIONS_CSV, export_all,
    read_csv_frame, write_csv, write_csv_file, write_json_file,
};
pub use frame::{access_frame, cell_text, fticks_frame, session_frame};
