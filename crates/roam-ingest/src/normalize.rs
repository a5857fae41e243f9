//! Record normalizer: raw captures to typed records.
//!
//! Absent optional access fields stay `None`; no sentinel strings are
//! introduced. A timestamp that does not parse under the log format leaves
//! the record in place with `timestamp: None`.

use chrono::{NaiveDateTime, Weekday};
use roam_model::{AccessEvent, FticksEvent};

use crate::classify::{AccessFields, FticksFields};

/// Timestamp format of both grammars after the weekday token,
/// e.g. `Jul 25 09:03:00 2024` in `Thu Jul 25 09:03:00 2024`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Parse a log timestamp. The leading weekday must be a day name but is not
/// checked against the date.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let (weekday, rest) = raw.trim().split_once(' ')?;
    weekday.parse::<Weekday>().ok()?;
    NaiveDateTime::parse_from_str(rest.trim_start(), LOG_TIMESTAMP_FORMAT).ok()
}

pub fn normalize_access(line: usize, fields: &AccessFields<'_>) -> AccessEvent {
    AccessEvent {
        line,
        timestamp: parse_timestamp(fields.timestamp),
        event: fields.event,
        username: owned(fields.username),
        station_id: owned(fields.station_id),
        source: owned(fields.source),
        destination: owned(fields.destination),
        server_ip: fields.server_ip.to_string(),
        cui: owned(fields.cui),
    }
}

pub fn normalize_fticks(line: usize, fields: &FticksFields<'_>) -> FticksEvent {
    FticksEvent::new(
        line,
        parse_timestamp(fields.timestamp),
        fields.realm.to_string(),
        fields.visiting_country.to_string(),
        fields.visiting_institution.to_string(),
        fields.csi.to_string(),
        fields.result.to_string(),
    )
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}
