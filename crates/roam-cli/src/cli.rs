//! CLI argument definitions for the eduroam log analyzer.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use roam_model::{DEFAULT_MAX_FILE_BYTES, DEFAULT_TOP_N, EventKind, ParseOptions, UserOrigin};
use roam_report::{AccessFilter, DateRange, FticksFilter, RoamingFilter, SessionFilter};
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "roam-analyzer",
    version,
    about = "eduroam log analyzer - parse RADIUS access logs and F-TICKS records",
    long_about = "Parse eduroam RADIUS access-log lines and F-TICKS accounting records.\n\n\
                  Classifies users as domestic or foreign, infers home and visited\n\
                  jurisdictions, flags roaming sessions, and exports the tables as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow usernames and other identifying values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Prefix log lines with a timestamp (always on with --log-file).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

impl Cli {
    /// Logging configuration for these flags. An explicit `--log-level`
    /// beats `-v`/`-q`, which beat `RUST_LOG`.
    pub fn log_config(&self, stderr_is_terminal: bool) -> LogConfig {
        let level_filter = match self.log_level {
            Some(LogLevelArg::Error) => LevelFilter::ERROR,
            Some(LogLevelArg::Warn) => LevelFilter::WARN,
            Some(LogLevelArg::Info) => LevelFilter::INFO,
            Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
            Some(LogLevelArg::Trace) => LevelFilter::TRACE,
            None => self.verbosity.tracing_level_filter(),
        };
        let format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        let ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && stderr_is_terminal,
        };
        LogConfig::default()
            .with_level_filter(level_filter)
            .with_env_filter(!(self.verbosity.is_present() || self.log_level.is_some()))
            .with_format(format)
            .with_timestamps(self.log_timestamps || self.log_file.is_some())
            .with_target(self.log_target)
            .with_ansi(ansi)
            .with_log_file(self.log_file.clone())
            .with_log_data(self.log_data)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one of the parsed tables.
    Parse(ParseArgs),

    /// Print headline metrics and rankings.
    Summary(SummaryArgs),

    /// Print one user's connection history.
    User(UserArgs),

    /// Write filtered tables as CSV plus a JSON report.
    Export(ExportArgs),
}

/// Input log and parse limits shared by every subcommand.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Path to the log file.
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Stop after this many records.
    #[arg(long = "max-records", value_name = "N")]
    pub max_records: Option<usize>,

    /// Refuse files larger than this many bytes.
    #[arg(long = "max-file-size", value_name = "BYTES", default_value_t = DEFAULT_MAX_FILE_BYTES)]
    pub max_file_bytes: u64,
}

impl InputArgs {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_max_records(self.max_records)
            .with_max_file_bytes(self.max_file_bytes)
    }
}

#[derive(Parser)]
pub struct ParseArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Table to print.
    #[arg(long = "table", value_enum, default_value = "access")]
    pub table: TableArg,

    /// Print at most this many rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

/// Filters over the enriched session table.
#[derive(Args, Clone, Default)]
pub struct SessionFilterArgs {
    /// Keep only users of this origin (repeatable).
    #[arg(long = "origin", value_enum)]
    pub origins: Vec<OriginArg>,

    /// Keep only this access outcome (repeatable).
    #[arg(long = "event", value_enum)]
    pub events: Vec<EventArg>,

    /// Keep only users from this home jurisdiction (repeatable).
    #[arg(long = "home", value_name = "JURISDICTION")]
    pub home_jurisdictions: Vec<String>,

    /// Roaming selection.
    #[arg(long = "roaming", value_enum, default_value = "all")]
    pub roaming: RoamingArg,

    /// First day to include (YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<NaiveDate>,
}

impl SessionFilterArgs {
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }

    pub fn event_kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| EventKind::from(*e)).collect()
    }

    pub fn session_filter(&self) -> SessionFilter {
        SessionFilter::default()
            .with_origins(self.origins.iter().map(|o| UserOrigin::from(*o)).collect())
            .with_events(self.event_kinds())
            .with_home_jurisdictions(self.home_jurisdictions.clone())
            .with_roaming(self.roaming.into())
            .with_dates(self.date_range())
    }
}

#[derive(Parser)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub filters: SessionFilterArgs,

    /// Number of entries in each ranking.
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
}

#[derive(Parser)]
pub struct UserArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Username to look up, e.g. alice@iitd.ac.in.
    #[arg(value_name = "USERNAME")]
    pub username: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory for the exported files (created if missing).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub filters: SessionFilterArgs,

    /// Keep access rows whose username realm is this domain (repeatable).
    #[arg(long = "domain", value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// Keep access rows from this station id (repeatable).
    #[arg(long = "station-id", value_name = "ID")]
    pub station_ids: Vec<String>,

    /// Keep F-TICKS rows with this RESULT (repeatable).
    #[arg(long = "result", value_name = "RESULT")]
    pub results: Vec<String>,

    /// Keep F-TICKS rows with this VISINST (repeatable).
    #[arg(long = "visinst", value_name = "INSTITUTION")]
    pub visiting_institutions: Vec<String>,

    /// Keep F-TICKS rows with this VISCOUNTRY (repeatable).
    #[arg(long = "viscountry", value_name = "CODE")]
    pub visiting_countries: Vec<String>,

    /// Keep F-TICKS rows with this CSI (repeatable).
    #[arg(long = "csi", value_name = "CSI")]
    pub csis: Vec<String>,

    /// Number of entries in each ranking of the report.
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
}

impl ExportArgs {
    pub fn access_filter(&self) -> AccessFilter {
        AccessFilter {
            dates: self.filters.date_range(),
            events: self.filters.event_kinds(),
            domains: self.domains.iter().map(|d| d.trim().to_lowercase()).collect(),
            station_ids: self.station_ids.clone(),
        }
    }

    pub fn fticks_filter(&self) -> FticksFilter {
        FticksFilter {
            results: self.results.clone(),
            visiting_institutions: self.visiting_institutions.clone(),
            visiting_countries: self.visiting_countries.clone(),
            csis: self.csis.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TableArg {
    Access,
    Fticks,
    Sessions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OriginArg {
    Domestic,
    Foreign,
}

impl From<OriginArg> for UserOrigin {
    fn from(value: OriginArg) -> Self {
        match value {
            OriginArg::Domestic => UserOrigin::Domestic,
            OriginArg::Foreign => UserOrigin::Foreign,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventArg {
    Accept,
    Reject,
}

impl From<EventArg> for EventKind {
    fn from(value: EventArg) -> Self {
        match value {
            EventArg::Accept => EventKind::Accept,
            EventArg::Reject => EventKind::Reject,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RoamingArg {
    #[default]
    All,
    RoamingOnly,
    NonRoamingOnly,
}

impl From<RoamingArg> for RoamingFilter {
    fn from(value: RoamingArg) -> Self {
        match value {
            RoamingArg::All => RoamingFilter::All,
            RoamingArg::RoamingOnly => RoamingFilter::RoamingOnly,
            RoamingArg::NonRoamingOnly => RoamingFilter::NonRoamingOnly,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
