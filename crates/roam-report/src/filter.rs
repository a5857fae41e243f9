//! Row filters for the session table and the two raw tables.
//!
//! An empty selection list means "no restriction". Records without a
//! timestamp fail any date-bounded filter.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use roam_model::{AccessEvent, EnrichedSession, EventKind, FticksEvent, UserOrigin};

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, timestamp: Option<NaiveDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = timestamp.map(|ts| ts.date()) else {
            return false;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoamingFilter {
    #[default]
    All,
    RoamingOnly,
    NonRoamingOnly,
}

impl RoamingFilter {
    pub fn accepts(&self, is_roaming: bool) -> bool {
        match self {
            RoamingFilter::All => true,
            RoamingFilter::RoamingOnly => is_roaming,
            RoamingFilter::NonRoamingOnly => !is_roaming,
        }
    }
}

fn selected<T: PartialEq>(selection: &[T], value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

fn selected_opt<T: PartialEq>(selection: &[T], value: Option<&T>) -> bool {
    selection.is_empty() || value.is_some_and(|v| selection.contains(v))
}

/// Filter over enriched sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFilter {
    pub origins: Vec<UserOrigin>,
    /// Sessions without an access event (F-TICKS rows) fail a non-empty list.
    pub events: Vec<EventKind>,
    pub home_jurisdictions: Vec<String>,
    pub roaming: RoamingFilter,
    pub dates: DateRange,
}

impl SessionFilter {
    #[must_use]
    pub fn with_origins(mut self, origins: Vec<UserOrigin>) -> Self {
        self.origins = origins;
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Vec<EventKind>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_home_jurisdictions(mut self, jurisdictions: Vec<String>) -> Self {
        self.home_jurisdictions = jurisdictions;
        self
    }

    #[must_use]
    pub fn with_roaming(mut self, roaming: RoamingFilter) -> Self {
        self.roaming = roaming;
        self
    }

    #[must_use]
    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = dates;
        self
    }

    pub fn matches(&self, session: &EnrichedSession) -> bool {
        selected(&self.origins, &session.origin)
            && selected_opt(&self.events, session.event.as_ref())
            && selected(&self.home_jurisdictions, &session.home_jurisdiction)
            && self.roaming.accepts(session.is_roaming)
            && self.dates.contains(session.timestamp)
    }

    /// Matching sessions, original order preserved.
    pub fn apply(&self, sessions: &[EnrichedSession]) -> Vec<EnrichedSession> {
        sessions
            .iter()
            .filter(|session| self.matches(session))
            .cloned()
            .collect()
    }
}

/// Filter over the raw access table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessFilter {
    pub dates: DateRange,
    pub events: Vec<EventKind>,
    /// Lower-cased realm domains.
    pub domains: Vec<String>,
    pub station_ids: Vec<String>,
}

impl AccessFilter {
    pub fn matches(&self, event: &AccessEvent) -> bool {
        let domain = event.realm().map(|realm| realm.trim().to_lowercase());
        self.dates.contains(event.timestamp)
            && selected(&self.events, &event.event)
            && selected_opt(&self.domains, domain.as_ref())
            && selected_opt(&self.station_ids, event.station_id.as_ref())
    }

    /// Matching rows, newest first, unknown timestamps last.
    pub fn apply(&self, events: &[AccessEvent]) -> Vec<AccessEvent> {
        let mut rows: Vec<AccessEvent> = events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect();
        rows.sort_by(|a, b| newest_first(a.timestamp, b.timestamp));
        rows
    }
}

/// Filter over the raw F-TICKS table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FticksFilter {
    pub results: Vec<String>,
    pub visiting_institutions: Vec<String>,
    pub visiting_countries: Vec<String>,
    pub csis: Vec<String>,
}

impl FticksFilter {
    pub fn matches(&self, event: &FticksEvent) -> bool {
        selected(&self.results, &event.result)
            && selected(&self.visiting_institutions, &event.visiting_institution)
            && selected(&self.visiting_countries, &event.visiting_country)
            && selected(&self.csis, &event.csi)
    }

    /// Matching rows, newest first, unknown timestamps last.
    pub fn apply(&self, events: &[FticksEvent]) -> Vec<FticksEvent> {
        let mut rows: Vec<FticksEvent> = events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect();
        rows.sort_by(|a, b| newest_first(a.timestamp, b.timestamp));
        rows
    }
}

/// Descending by timestamp with `None` after every known time.
pub fn newest_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending by timestamp with `None` after every known time.
pub fn oldest_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 7, day).and_then(|d| d.and_hms_opt(hour, 0, 0))
    }

    #[test]
    fn date_range_is_inclusive_and_rejects_unknown_time() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 7, 25), NaiveDate::from_ymd_opt(2024, 7, 26));
        assert!(range.contains(at(25, 0)));
        assert!(range.contains(at(26, 23)));
        assert!(!range.contains(at(27, 0)));
        assert!(!range.contains(None));
        assert!(DateRange::default().contains(None));
    }

    #[test]
    fn open_ended_range() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 7, 26), None);
        assert!(!range.contains(at(25, 12)));
        assert!(range.contains(at(30, 12)));
    }

    #[test]
    fn null_timestamps_sort_last_both_ways() {
        let mut values = vec![None, at(25, 1), at(27, 1), None, at(26, 1)];
        values.sort_by(|a, b| newest_first(*a, *b));
        assert_eq!(values, vec![at(27, 1), at(26, 1), at(25, 1), None, None]);
        values.sort_by(|a, b| oldest_first(*a, *b));
        assert_eq!(values, vec![at(25, 1), at(26, 1), at(27, 1), None, None]);
    }

    #[test]
    fn roaming_filter() {
        assert!(RoamingFilter::All.accepts(true));
        assert!(RoamingFilter::RoamingOnly.accepts(true));
        assert!(!RoamingFilter::RoamingOnly.accepts(false));
        assert!(RoamingFilter::NonRoamingOnly.accepts(false));
    }
}
