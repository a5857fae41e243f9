//! Aggregation over enriched eduroam sessions.
//!
//! Everything here is a read-only reduction of a session slice: per-user
//! and per-institution summaries, time buckets, rankings, and the row
//! filters used by the dashboard and CLI. Equal counts in a ranking keep
//! the order in which their keys were first seen.

pub mod aggregate;
pub mod counter;
pub mod filter;
pub mod overview;
pub mod report;

pub use aggregate::{
    InstitutionSummary, OutcomeCounts, TimeBuckets, UserSummary, institution_summaries,
    time_buckets, user_summaries, user_summary,
};
pub use counter::OrderedCounter;
pub use filter::{
    AccessFilter, DateRange, FticksFilter, RoamingFilter, SessionFilter, newest_first,
    oldest_first,
};
pub use overview::{
    OriginOutcome, Overview, PeakHour, RankedInstitution, RoamingPattern, outcomes_by_origin,
    overview, peak_hours, roaming_patterns, top_institutions,
};
pub use report::{AnalysisReport, PEAK_HOURS, build_report};
