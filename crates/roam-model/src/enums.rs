//! Closed vocabularies used across the analysis pipeline.
//!
//! Log lines carry these as free text; the enums give the pipeline a typed
//! view once a line has been classified.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Outcome of a RADIUS access request as written in the access log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// `Access-Accept`
    Accept,
    /// `Access-Reject`
    Reject,
}

impl EventKind {
    /// Returns the log keyword, e.g. `Access-Accept`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Accept => "Access-Accept",
            EventKind::Reject => "Access-Reject",
        }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, EventKind::Accept)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ModelError;

    /// Accepts the full keyword or the bare suffix, in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let suffix = normalized
            .strip_prefix("access-")
            .unwrap_or(normalized.as_str());
        match suffix {
            "accept" => Ok(EventKind::Accept),
            "reject" => Ok(EventKind::Reject),
            _ => Err(ModelError::UnknownEventKind(s.to_string())),
        }
    }
}

/// Binary classification of an F-TICKS `RESULT` value.
///
/// Only the exact, case-sensitive literal `OK` counts as success; every other
/// value (including the empty string and `ok`) is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FticksOutcome {
    Success,
    Failure,
}

impl FticksOutcome {
    pub fn from_result(result: &str) -> Self {
        if result == "OK" {
            FticksOutcome::Success
        } else {
            FticksOutcome::Failure
        }
    }

    /// Human-readable reason column value.
    pub fn reason(&self) -> &'static str {
        match self {
            FticksOutcome::Success => "Authentication successful",
            FticksOutcome::Failure => "Authentication failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FticksOutcome::Success)
    }
}

impl fmt::Display for FticksOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Whether a user belongs to the domestic federation or comes from abroad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserOrigin {
    Domestic,
    Foreign,
}

impl UserOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserOrigin::Domestic => "Domestic",
            UserOrigin::Foreign => "Foreign",
        }
    }
}

impl fmt::Display for UserOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which log grammar an enriched session row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Access,
    Fticks,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Access => "access",
            SessionKind::Fticks => "fticks",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_parses_keyword_and_suffix() {
        assert_eq!("Access-Accept".parse::<EventKind>(), Ok(EventKind::Accept));
        assert_eq!("ACCESS-REJECT".parse::<EventKind>(), Ok(EventKind::Reject));
        assert_eq!("accept".parse::<EventKind>(), Ok(EventKind::Accept));
        assert!("Access-Challenge".parse::<EventKind>().is_err());
    }

    #[test]
    fn fticks_outcome_is_case_sensitive() {
        assert_eq!(FticksOutcome::from_result("OK"), FticksOutcome::Success);
        assert_eq!(FticksOutcome::from_result("ok"), FticksOutcome::Failure);
        assert_eq!(FticksOutcome::from_result(""), FticksOutcome::Failure);
        assert_eq!(FticksOutcome::from_result("FAIL"), FticksOutcome::Failure);
    }
}
