//! Read-only groupings over the enriched session table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Timelike};
use serde::Serialize;

use roam_model::{EnrichedSession, UserOrigin};

use crate::filter::oldest_first;

/// One user's activity. Borrowed from the session table.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary<'a> {
    pub username: &'a str,
    /// Origin and home jurisdiction of the user's earliest record.
    pub origin: UserOrigin,
    pub home_jurisdiction: &'a str,
    /// Ascending by timestamp; unknown times last, then source order.
    pub sessions: Vec<&'a EnrichedSession>,
    pub institutions: BTreeSet<&'a str>,
    pub jurisdictions: BTreeSet<&'a str>,
    pub total: usize,
    pub successful: usize,
    pub roaming_sessions: usize,
}

impl<'a> UserSummary<'a> {
    fn new(username: &'a str, mut sessions: Vec<&'a EnrichedSession>) -> Option<Self> {
        sessions.sort_by(|a, b| oldest_first(a.timestamp, b.timestamp));
        let first = *sessions.first()?;

        Some(Self {
            username,
            origin: first.origin,
            home_jurisdiction: &first.home_jurisdiction,
            institutions: sessions
                .iter()
                .filter_map(|s| s.visited_institution())
                .collect(),
            jurisdictions: sessions
                .iter()
                .map(|s| s.visiting_jurisdiction.as_str())
                .collect(),
            total: sessions.len(),
            successful: sessions.iter().filter(|s| s.is_success()).count(),
            roaming_sessions: sessions.iter().filter(|s| s.is_roaming).count(),
            sessions,
        })
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }

    pub fn is_roaming(&self) -> bool {
        self.roaming_sessions > 0
    }
}

/// Group sessions by username, in order of first appearance. Sessions
/// without a username are not attributed to anyone.
pub fn user_summaries(sessions: &[EnrichedSession]) -> Vec<UserSummary<'_>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&EnrichedSession>> = BTreeMap::new();
    for session in sessions {
        let Some(username) = session.username.as_deref() else {
            continue;
        };
        groups
            .entry(username)
            .or_insert_with(|| {
                order.push(username);
                Vec::new()
            })
            .push(session);
    }

    order
        .into_iter()
        .filter_map(|username| {
            let group = groups.remove(username)?;
            UserSummary::new(username, group)
        })
        .collect()
}

/// Summary for one username, if it appears at all.
pub fn user_summary<'a>(sessions: &'a [EnrichedSession], username: &str) -> Option<UserSummary<'a>> {
    let matching: Vec<&EnrichedSession> = sessions
        .iter()
        .filter(|s| s.username.as_deref() == Some(username))
        .collect();
    let first: &'a EnrichedSession = matching.first().copied()?;
    UserSummary::new(first.username.as_deref()?, matching)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstitutionSummary<'a> {
    pub institution: &'a str,
    pub users: usize,
    /// Accepted access requests plus successful F-TICKS records.
    pub accepted: usize,
    pub roaming: usize,
    pub total: usize,
}

/// Per destination institution, in order of first appearance. Sessions
/// with no known destination are skipped.
pub fn institution_summaries(sessions: &[EnrichedSession]) -> Vec<InstitutionSummary<'_>> {
    let mut rows: Vec<InstitutionSummary<'_>> = Vec::new();
    let mut users: Vec<BTreeSet<&str>> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for session in sessions {
        let Some(institution) = session.visited_institution() else {
            continue;
        };
        let slot = *index.entry(institution).or_insert_with(|| {
            rows.push(InstitutionSummary {
                institution,
                users: 0,
                accepted: 0,
                roaming: 0,
                total: 0,
            });
            users.push(BTreeSet::new());
            rows.len() - 1
        });

        let row = &mut rows[slot];
        row.total += 1;
        row.accepted += usize::from(session.is_success());
        row.roaming += usize::from(session.is_roaming);
        if let Some(username) = session.username.as_deref() {
            users[slot].insert(username);
        }
    }

    for (row, distinct) in rows.iter_mut().zip(&users) {
        row.users = distinct.len();
    }
    rows
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub successful: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, success: bool) {
        self.total += 1;
        self.successful += usize::from(success);
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }

    /// Percentage of successful sessions; 0 when empty.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 * 100.0 / self.total as f64
        }
    }
}

/// Activity counts for timeline and heatmap displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBuckets {
    pub by_date: BTreeMap<NaiveDate, OutcomeCounts>,
    pub by_hour: [usize; 24],
    /// Row 0 is Monday.
    pub by_weekday_hour: [[usize; 24]; 7],
    /// Sessions without a timestamp, left out of every bucket.
    pub undated: usize,
}

impl Default for TimeBuckets {
    fn default() -> Self {
        Self {
            by_date: BTreeMap::new(),
            by_hour: [0; 24],
            by_weekday_hour: [[0; 24]; 7],
            undated: 0,
        }
    }
}

impl TimeBuckets {
    pub fn dated(&self) -> usize {
        self.by_hour.iter().sum()
    }
}

pub fn time_buckets(sessions: &[EnrichedSession]) -> TimeBuckets {
    let mut buckets = TimeBuckets::default();
    for session in sessions {
        let Some(ts) = session.timestamp else {
            buckets.undated += 1;
            continue;
        };
        let hour = ts.hour() as usize;
        let weekday = ts.weekday().num_days_from_monday() as usize;

        buckets
            .by_date
            .entry(ts.date())
            .or_default()
            .record(session.is_success());
        buckets.by_hour[hour] += 1;
        buckets.by_weekday_hour[weekday][hour] += 1;
    }
    buckets
}
