//! Enriched session rows: a raw record plus the derived origin,
//! jurisdiction and roaming columns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{EventKind, FticksOutcome, SessionKind, UserOrigin};

/// Jurisdiction used when no rule matches.
pub const UNKNOWN_JURISDICTION: &str = "Unknown";

/// Visiting jurisdiction for sessions relayed through the federation's
/// top-level exchange servers.
pub const INTERNATIONAL_JURISDICTION: &str = "International";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedSession {
    pub kind: SessionKind,
    pub line: usize,
    pub timestamp: Option<NaiveDateTime>,
    /// Set for access rows only.
    pub event: Option<EventKind>,
    pub username: Option<String>,
    pub station_id: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub server_ip: Option<String>,
    pub cui: Option<String>,
    /// Username realm (access) or `REALM` segment (F-TICKS); empty if unknown.
    pub realm: String,
    /// F-TICKS join keys, set for F-TICKS rows only.
    pub visiting_country: Option<String>,
    pub visiting_institution: Option<String>,
    pub csi: Option<String>,
    pub fticks_outcome: Option<FticksOutcome>,
    pub origin: UserOrigin,
    pub home_jurisdiction: String,
    pub visiting_jurisdiction: String,
    pub is_roaming: bool,
}

impl EnrichedSession {
    /// Accepted access request or F-TICKS `RESULT=OK`.
    pub fn is_success(&self) -> bool {
        match (self.event, self.fticks_outcome) {
            (Some(event), _) => event.is_accept(),
            (None, Some(outcome)) => outcome.is_success(),
            (None, None) => false,
        }
    }

    /// Institution the session landed on: access destination or F-TICKS
    /// visited institution.
    pub fn visited_institution(&self) -> Option<&str> {
        match self.kind {
            SessionKind::Access => self.destination.as_deref(),
            SessionKind::Fticks => self
                .visiting_institution
                .as_deref()
                .filter(|inst| !inst.is_empty()),
        }
    }
}
