//! Complete analysis of one session table.

use serde::Serialize;
use tracing::debug;

use roam_model::{EnrichedSession, ReportOptions};

use crate::aggregate::{InstitutionSummary, TimeBuckets, institution_summaries, time_buckets};
use crate::overview::{
    OriginOutcome, Overview, PeakHour, RankedInstitution, RoamingPattern, outcomes_by_origin,
    overview, peak_hours, roaming_patterns, top_institutions,
};

/// Number of peak hours listed in a report.
pub const PEAK_HOURS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport<'a> {
    pub overview: Overview,
    pub institutions: Vec<InstitutionSummary<'a>>,
    pub top_institutions: Vec<RankedInstitution>,
    pub roaming_patterns: Vec<RoamingPattern>,
    pub outcomes_by_origin: Vec<OriginOutcome>,
    pub peak_hours: Vec<PeakHour>,
    pub time_buckets: TimeBuckets,
}

pub fn build_report<'a>(sessions: &'a [EnrichedSession], options: &ReportOptions) -> AnalysisReport<'a> {
    let report = AnalysisReport {
        overview: overview(sessions),
        institutions: institution_summaries(sessions),
        top_institutions: top_institutions(sessions, options.top_n),
        roaming_patterns: roaming_patterns(sessions, options.top_n),
        outcomes_by_origin: outcomes_by_origin(sessions),
        peak_hours: peak_hours(sessions, PEAK_HOURS),
        time_buckets: time_buckets(sessions),
    };
    debug!(
        sessions = sessions.len(),
        institutions = report.institutions.len(),
        roaming_patterns = report.roaming_patterns.len(),
        "report built"
    );
    report
}
