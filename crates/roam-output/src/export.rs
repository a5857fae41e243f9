//! CSV and JSON export, plus CSV read-back.
//!
//! CSV files are UTF-8, comma separated, with one header row of column
//! names and no index column. Null cells are written as empty fields.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, CsvReadOptions, DataFrame, SerReader};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{OutputError, Result};
use crate::frame::cell_text;

/// File name of the exported access table.
pub const ACCESS_CSV: &str = "access_filtered.csv";
/// File name of the exported F-TICKS table.
pub const FTICKS_CSV: &str = "fticks_filtered.csv";
/// File name of the exported session table.
pub const SESSIONS_CSV: &str = "sessions.csv";
/// File name of the JSON analysis report.
pub const REPORT_JSON: &str = "report.json";

/// Write `df` as CSV into any writer.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> std::result::Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(df.get_column_names().iter().map(|name| name.as_str()))?;

    let columns = df.get_columns();
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for row in 0..df.height() {
        record.clear();
        for column in columns {
            let value = column.get(row).unwrap_or(AnyValue::Null);
            record.push(cell_text(&value).unwrap_or_default());
        }
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Write `df` to `path`, replacing any existing file.
pub fn write_csv_file(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(df, BufWriter::new(file)).map_err(|source| OutputError::CsvWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = df.height(), "csv written");
    Ok(())
}

/// Read an exported CSV back with every column as a string column.
/// Empty fields come back as null.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let csv_err = |e: polars::prelude::PolarsError| OutputError::CsvRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_err)?
        .finish()
        .map_err(csv_err)
}

/// Serialize `report` as pretty-printed JSON.
pub fn write_json_file<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Tables written by [`export_all`].
#[derive(Debug)]
pub struct ExportTables<'a, R> {
    pub access: &'a DataFrame,
    pub fticks: &'a DataFrame,
    pub sessions: &'a DataFrame,
    pub report: &'a R,
}

/// Paths of the files written by [`export_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub access: PathBuf,
    pub fticks: PathBuf,
    pub sessions: PathBuf,
    pub report: PathBuf,
}

/// Write the three CSV tables and the JSON report into `dir`, creating it
/// if needed.
pub fn export_all<R: Serialize>(tables: &ExportTables<'_, R>, dir: &Path) -> Result<ExportedFiles> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let files = ExportedFiles {
        access: dir.join(ACCESS_CSV),
        fticks: dir.join(FTICKS_CSV),
        sessions: dir.join(SESSIONS_CSV),
        report: dir.join(REPORT_JSON),
    };
    write_csv_file(tables.access, &files.access)?;
    write_csv_file(tables.fticks, &files.fticks)?;
    write_csv_file(tables.sessions, &files.sessions)?;
    write_json_file(tables.report, &files.report)?;

    info!(dir = %dir.display(), "export complete");
    Ok(files)
}
