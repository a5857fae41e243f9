//! Line classifier and field extractor.
//!
//! Every line is tried against both grammars; a line may match neither,
//! either, or both. Captures borrow from the line and are only converted to
//! owned, typed records by the normalizer.
//!
//! # Access lines
//!
//! ```text
//! Thu Jul 25 09:03:00 2024: Access-Accept for user alice@iitd.ac.in stationid AA:BB:CC:DD:EE:FF from sp1.example to sp2.example (10.0.0.5)
//! ```
//!
//! Mandatory: timestamp, `Access-Accept|Access-Reject` (any case), and a
//! dotted-quad IP in parentheses. Username, station id, source, destination
//! and CUI are optional and come back as `None` when missing.
//!
//! # F-TICKS lines
//!
//! ```text
//! Thu Jul 25 09:03:05 2024: F-TICKS/eduroam/1.0#REALM=iitd.ac.in#VISCOUNTRY=IN#VISINST=nit.ac.in#CSI=abc123#RESULT=OK#
//! ```
//!
//! The `REALM` segment may be absent. Segment values are everything up to the
//! next `#` and may be empty.

use std::sync::LazyLock;

use regex::Regex;
use roam_model::EventKind;

/// Timestamp prefix shared by both grammars.
const TIMESTAMP_PATTERN: &str = r"\w{3} \w{3} \d{1,2} \d{2}:\d{2}:\d{2} \d{4}";

static ACCESS_HEAD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<timestamp>{TIMESTAMP_PATTERN}): (?P<event>Access-(?:Accept|Reject))\b"
    ))
    .expect("Invalid access header regex")
});

static USER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor user ([\w.@-]+)").expect("Invalid user regex"));

static STATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bstationid ([0-9a-f:\-]+)").expect("Invalid station id regex")
});

static ROUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom ([^\s(]\S*)(?: to ([^\s(]\S*))?").expect("Invalid route regex")
});

static IP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d{1,3}(?:\.\d{1,3}){3})\)").expect("Invalid server IP regex")
});

static CUI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcui ([0-9a-f]+)").expect("Invalid CUI regex"));

const FTICKS_BODY_PATTERN: &str = concat!(
    r"F-TICKS/eduroam/[\d.]+#",
    r"(?:REALM=(?P<realm>[^#]*)#)?",
    r"VISCOUNTRY=(?P<country>[^#]*)#",
    r"VISINST=(?P<inst>[^#]*)#",
    r"CSI=(?P<csi>[^#]*)#",
    r"RESULT=(?P<result>[^#]*)#",
);

static FTICKS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<timestamp>{TIMESTAMP_PATTERN}): {FTICKS_BODY_PATTERN}"
    ))
    .expect("Invalid F-TICKS regex")
});

/// Field keywords of the access grammar. One of these in the username slot
/// means the username itself was omitted (`for user stationid ...`).
const ACCESS_KEYWORDS: &[&str] = &["stationid", "from", "to", "cui"];

/// Raw captures of an access line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFields<'a> {
    pub timestamp: &'a str,
    pub event: EventKind,
    pub username: Option<&'a str>,
    pub station_id: Option<&'a str>,
    pub source: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub server_ip: &'a str,
    pub cui: Option<&'a str>,
}

/// Raw captures of an F-TICKS line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FticksFields<'a> {
    pub timestamp: &'a str,
    pub realm: &'a str,
    pub visiting_country: &'a str,
    pub visiting_institution: &'a str,
    pub csi: &'a str,
    pub result: &'a str,
}

/// Result of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch<'a> {
    NoMatch,
    Access(AccessFields<'a>),
    Fticks(FticksFields<'a>),
    /// Both grammars matched the same line.
    Both(AccessFields<'a>, FticksFields<'a>),
}

impl<'a> LineMatch<'a> {
    pub fn is_match(&self) -> bool {
        !matches!(self, LineMatch::NoMatch)
    }

    pub fn access(&self) -> Option<&AccessFields<'a>> {
        match self {
            LineMatch::Access(fields) | LineMatch::Both(fields, _) => Some(fields),
            _ => None,
        }
    }

    pub fn fticks(&self) -> Option<&FticksFields<'a>> {
        match self {
            LineMatch::Fticks(fields) | LineMatch::Both(_, fields) => Some(fields),
            _ => None,
        }
    }
}

/// Classify one line against both grammars.
pub fn classify_line(line: &str) -> LineMatch<'_> {
    match (match_access(line), match_fticks(line)) {
        (None, None) => LineMatch::NoMatch,
        (Some(access), None) => LineMatch::Access(access),
        (None, Some(fticks)) => LineMatch::Fticks(fticks),
        (Some(access), Some(fticks)) => LineMatch::Both(access, fticks),
    }
}

/// Match the access grammar. `None` when a mandatory group is missing.
pub fn match_access(line: &str) -> Option<AccessFields<'_>> {
    let head = ACCESS_HEAD_REGEX.captures(line)?;
    let timestamp = head.name("timestamp")?.as_str();
    let event = head.name("event")?.as_str().parse::<EventKind>().ok()?;
    let rest = &line[head.get(0)?.end()..];

    let server_ip = IP_REGEX.captures(rest)?.get(1)?.as_str();

    let username = capture(&USER_REGEX, rest, 1).filter(|user| !is_access_keyword(user));
    let station_id = capture(&STATION_REGEX, rest, 1);
    let (source, destination) = match ROUTE_REGEX.captures(rest) {
        Some(route) => (
            route.get(1).map(|m| m.as_str()),
            route.get(2).map(|m| m.as_str()),
        ),
        None => (None, None),
    };
    let cui = capture(&CUI_REGEX, rest, 1);

    Some(AccessFields {
        timestamp,
        event,
        username,
        station_id,
        source,
        destination,
        server_ip,
        cui,
    })
}

/// Match the F-TICKS grammar.
pub fn match_fticks(line: &str) -> Option<FticksFields<'_>> {
    let caps = FTICKS_REGEX.captures(line)?;
    let segment = |name: &str| caps.name(name).map_or("", |m| m.as_str());
    Some(FticksFields {
        timestamp: caps.name("timestamp")?.as_str(),
        realm: segment("realm"),
        visiting_country: segment("country"),
        visiting_institution: segment("inst"),
        csi: segment("csi"),
        result: segment("result"),
    })
}

fn capture<'a>(regex: &Regex, text: &'a str, group: usize) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

fn is_access_keyword(token: &str) -> bool {
    ACCESS_KEYWORDS
        .iter()
        .any(|keyword| token.eq_ignore_ascii_case(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_LINE: &str = "Thu Jul 25 09:03:00 2024: Access-Accept for user alice@iitd.ac.in \
        stationid AA:BB:CC:DD:EE:FF from sp1.example to sp2.example (10.0.0.5)";

    const FTICKS_LINE: &str = "Thu Jul 25 09:03:05 2024: F-TICKS/eduroam/1.0#REALM=iitd.ac.in\
        #VISCOUNTRY=IN#VISINST=nit.ac.in#CSI=abc123#RESULT=OK#";

    #[test]
    fn extracts_full_access_line() {
        let fields = match_access(ACCESS_LINE).expect("access line matches");
        assert_eq!(fields.timestamp, "Thu Jul 25 09:03:00 2024");
        assert_eq!(fields.event, EventKind::Accept);
        assert_eq!(fields.username, Some("alice@iitd.ac.in"));
        assert_eq!(fields.station_id, Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(fields.source, Some("sp1.example"));
        assert_eq!(fields.destination, Some("sp2.example"));
        assert_eq!(fields.server_ip, "10.0.0.5");
        assert_eq!(fields.cui, None);
    }

    #[test]
    fn event_keyword_is_case_insensitive() {
        let line = "Thu Jul 25 09:03:00 2024: access-reject for user bob (192.168.1.1)";
        let fields = match_access(line).expect("lower-case keyword matches");
        assert_eq!(fields.event, EventKind::Reject);
        assert_eq!(fields.username, Some("bob"));
        assert_eq!(fields.station_id, None);
        assert_eq!(fields.source, None);
    }

    #[test]
    fn hyphenated_username_is_captured_whole() {
        let line = "Thu Jul 25 09:03:00 2024: Access-Accept for user jean-luc@uni.fr \
            stationid AA:BB from sp1 (10.0.0.5)";
        let fields = match_access(line).expect("line matches");
        assert_eq!(fields.username, Some("jean-luc@uni.fr"));
        assert_eq!(fields.station_id, Some("AA:BB"));
    }

    #[test]
    fn optional_groups_become_none() {
        let line = "Thu Jul 25 09:03:00 2024: Access-Reject for user stationid 00-11-22-33-44-55 \
            from etlr1.eduroam.org (14.139.5.6) cui 9f8e7d";
        let fields = match_access(line).expect("line matches");
        assert_eq!(fields.username, None);
        assert_eq!(fields.station_id, Some("00-11-22-33-44-55"));
        assert_eq!(fields.source, Some("etlr1.eduroam.org"));
        assert_eq!(fields.destination, None);
        assert_eq!(fields.cui, Some("9f8e7d"));
    }

    #[test]
    fn missing_mandatory_groups_reject_line() {
        let no_ip = "Thu Jul 25 09:03:00 2024: Access-Accept for user alice from sp1";
        assert!(match_access(no_ip).is_none());

        let no_event = "Thu Jul 25 09:03:00 2024: Accounting-Request for user alice (10.0.0.5)";
        assert!(match_access(no_event).is_none());

        let no_timestamp = "Access-Accept for user alice (10.0.0.5)";
        assert!(match_access(no_timestamp).is_none());

        let open_paren = "Thu Jul 25 09:03:00 2024: Access-Accept for user alice (10.0.0.5";
        assert!(match_access(open_paren).is_none());
    }

    #[test]
    fn extracts_fticks_segments() {
        let fields = match_fticks(FTICKS_LINE).expect("F-TICKS line matches");
        assert_eq!(fields.realm, "iitd.ac.in");
        assert_eq!(fields.visiting_country, "IN");
        assert_eq!(fields.visiting_institution, "nit.ac.in");
        assert_eq!(fields.csi, "abc123");
        assert_eq!(fields.result, "OK");
    }

    #[test]
    fn fticks_realm_segment_is_optional_and_values_may_be_empty() {
        let line = "Mon Jul 29 10:00:00 2024: F-TICKS/eduroam/2.1#VISCOUNTRY=#VISINST=#CSI=#RESULT=#";
        let fields = match_fticks(line).expect("four-segment line matches");
        assert_eq!(fields.realm, "");
        assert_eq!(fields.visiting_country, "");
        assert_eq!(fields.result, "");
    }

    #[test]
    fn classify_tries_both_grammars() {
        assert!(matches!(classify_line(ACCESS_LINE), LineMatch::Access(_)));
        assert!(matches!(classify_line(FTICKS_LINE), LineMatch::Fticks(_)));
        assert_eq!(classify_line("garbage"), LineMatch::NoMatch);

        let both = format!("{FTICKS_LINE} Thu Jul 25 09:03:00 2024: Access-Accept (10.0.0.5)");
        let matched = classify_line(&both);
        assert!(matches!(matched, LineMatch::Both(_, _)));
        assert!(matched.access().is_some());
        assert!(matched.fticks().is_some());
    }
}
