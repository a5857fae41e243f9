//! Headline metrics and top-N rankings.

use std::collections::BTreeSet;

use serde::Serialize;

use roam_model::{EnrichedSession, UserOrigin};

use crate::aggregate::{OutcomeCounts, institution_summaries};
use crate::counter::OrderedCounter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Distinct usernames.
    pub total_users: usize,
    /// Distinct usernames with at least one domestic session.
    pub domestic_users: usize,
    /// Distinct usernames with at least one foreign session.
    pub foreign_users: usize,
    /// Distinct usernames with at least one roaming session.
    pub roaming_users: usize,
    pub total_connections: usize,
    pub successful: usize,
    pub failed: usize,
    pub roaming_sessions: usize,
    /// Distinct home jurisdictions, `Unknown` included.
    pub home_jurisdictions: usize,
    /// Percent of successful connections; 0 when empty.
    pub success_rate: f64,
}

pub fn overview(sessions: &[EnrichedSession]) -> Overview {
    let mut users = BTreeSet::new();
    let mut domestic = BTreeSet::new();
    let mut foreign = BTreeSet::new();
    let mut roaming = BTreeSet::new();
    let mut homes = BTreeSet::new();
    let mut outcomes = OutcomeCounts::default();
    let mut roaming_sessions = 0;

    for session in sessions {
        outcomes.record(session.is_success());
        roaming_sessions += usize::from(session.is_roaming);
        homes.insert(session.home_jurisdiction.as_str());

        let Some(user) = session.username.as_deref() else {
            continue;
        };
        users.insert(user);
        match session.origin {
            UserOrigin::Domestic => domestic.insert(user),
            UserOrigin::Foreign => foreign.insert(user),
        };
        if session.is_roaming {
            roaming.insert(user);
        }
    }

    Overview {
        total_users: users.len(),
        domestic_users: domestic.len(),
        foreign_users: foreign.len(),
        roaming_users: roaming.len(),
        total_connections: outcomes.total,
        successful: outcomes.successful,
        failed: outcomes.failed(),
        roaming_sessions,
        home_jurisdictions: homes.len(),
        success_rate: outcomes.success_rate(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedInstitution {
    pub institution: String,
    pub connections: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoamingPattern {
    pub home: String,
    pub visiting: String,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginOutcome {
    pub origin: UserOrigin,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakHour {
    pub hour: u32,
    pub connections: usize,
}

/// Destination institutions by connection count.
pub fn top_institutions(sessions: &[EnrichedSession], n: usize) -> Vec<RankedInstitution> {
    let mut rows = institution_summaries(sessions);
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows.into_iter()
        .take(n)
        .map(|row| RankedInstitution {
            institution: row.institution.to_string(),
            connections: row.total,
        })
        .collect()
}

/// Most frequent `home -> visiting` pairs among roaming sessions.
pub fn roaming_patterns(sessions: &[EnrichedSession], n: usize) -> Vec<RoamingPattern> {
    sessions
        .iter()
        .filter(|s| s.is_roaming)
        .map(|s| (s.home_jurisdiction.as_str(), s.visiting_jurisdiction.as_str()))
        .collect::<OrderedCounter<_>>()
        .top(n)
        .into_iter()
        .map(|((home, visiting), count)| RoamingPattern {
            home: home.to_string(),
            visiting: visiting.to_string(),
            sessions: count,
        })
        .collect()
}

/// Outcome split per user origin, domestic first. Origins with no
/// sessions are omitted.
pub fn outcomes_by_origin(sessions: &[EnrichedSession]) -> Vec<OriginOutcome> {
    [UserOrigin::Domestic, UserOrigin::Foreign]
        .into_iter()
        .filter_map(|origin| {
            let mut counts = OutcomeCounts::default();
            for session in sessions.iter().filter(|s| s.origin == origin) {
                counts.record(session.is_success());
            }
            (counts.total > 0).then(|| OriginOutcome {
                origin,
                total: counts.total,
                successful: counts.successful,
                failed: counts.failed(),
                success_rate: counts.success_rate(),
            })
        })
        .collect()
}

/// Busiest hours of the day; sessions without a timestamp are ignored.
pub fn peak_hours(sessions: &[EnrichedSession], n: usize) -> Vec<PeakHour> {
    use chrono::Timelike;

    sessions
        .iter()
        .filter_map(|s| s.timestamp.map(|ts| ts.hour()))
        .collect::<OrderedCounter<u32>>()
        .top(n)
        .into_iter()
        .map(|(hour, connections)| PeakHour { hour, connections })
        .collect()
}
