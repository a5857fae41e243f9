//! DataFrame construction for the three flat tables.
//!
//! Every column is a nullable string column except `Line` (u64) and
//! `IsRoaming` (bool). Column order follows `roam_model::columns`.

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, Series};

use roam_model::columns::{ACCESS_COLUMNS, FTICKS_COLUMNS, SESSION_COLUMNS, TIMESTAMP_FORMAT};
use roam_model::{AccessEvent, EnrichedSession, FticksEvent};

use crate::error::{OutputError, Result};

fn format_timestamp(ts: Option<NaiveDateTime>) -> Option<String> {
    ts.map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
}

fn text_column<T, F>(name: &str, rows: &[T], value: F) -> Column
where
    F: Fn(&T) -> Option<String>,
{
    let values: Vec<Option<String>> = rows.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

fn finish(table: &'static str, columns: Vec<Column>) -> Result<DataFrame> {
    DataFrame::new(columns).map_err(|source| OutputError::Frame { table, source })
}

/// Access table with columns `Timestamp, Event, Username, StationID,
/// Source, Destination, ServerIP, CUI`.
pub fn access_frame(events: &[AccessEvent]) -> Result<DataFrame> {
    let [ts, event, user, station, source, destination, server, cui] = ACCESS_COLUMNS;
    finish(
        "access",
        vec![
            text_column(ts, events, |e| format_timestamp(e.timestamp)),
            text_column(event, events, |e| Some(e.event.as_str().to_string())),
            text_column(user, events, |e| e.username.clone()),
            text_column(station, events, |e| e.station_id.clone()),
            text_column(source, events, |e| e.source.clone()),
            text_column(destination, events, |e| e.destination.clone()),
            text_column(server, events, |e| Some(e.server_ip.clone())),
            text_column(cui, events, |e| e.cui.clone()),
        ],
    )
}

/// F-TICKS table with columns `Timestamp, VISCOUNTRY, VISINST, CSI,
/// RESULT, Reason`. Empty segments stay empty strings.
pub fn fticks_frame(events: &[FticksEvent]) -> Result<DataFrame> {
    let [ts, country, inst, csi, result, reason] = FTICKS_COLUMNS;
    finish(
        "fticks",
        vec![
            text_column(ts, events, |e| format_timestamp(e.timestamp)),
            text_column(country, events, |e| Some(e.visiting_country.clone())),
            text_column(inst, events, |e| Some(e.visiting_institution.clone())),
            text_column(csi, events, |e| Some(e.csi.clone())),
            text_column(result, events, |e| Some(e.result.clone())),
            text_column(reason, events, |e| Some(e.reason().to_string())),
        ],
    )
}

pub fn session_frame(sessions: &[EnrichedSession]) -> Result<DataFrame> {
    let [
        kind,
        line,
        ts,
        event,
        user,
        station,
        source,
        destination,
        server,
        cui,
        realm,
        country,
        inst,
        csi,
        reason,
        origin,
        home,
        visiting,
        roaming,
    ] = SESSION_COLUMNS;

    let lines: Vec<u64> = sessions.iter().map(|s| s.line as u64).collect();
    let roaming_flags: Vec<bool> = sessions.iter().map(|s| s.is_roaming).collect();

    finish(
        "sessions",
        vec![
            text_column(kind, sessions, |s| Some(s.kind.as_str().to_string())),
            Series::new(line.into(), lines).into(),
            text_column(ts, sessions, |s| format_timestamp(s.timestamp)),
            text_column(event, sessions, |s| s.event.map(|e| e.as_str().to_string())),
            text_column(user, sessions, |s| s.username.clone()),
            text_column(station, sessions, |s| s.station_id.clone()),
            text_column(source, sessions, |s| s.source.clone()),
            text_column(destination, sessions, |s| s.destination.clone()),
            text_column(server, sessions, |s| s.server_ip.clone()),
            text_column(cui, sessions, |s| s.cui.clone()),
            text_column(realm, sessions, |s| Some(s.realm.clone())),
            text_column(country, sessions, |s| s.visiting_country.clone()),
            text_column(inst, sessions, |s| s.visiting_institution.clone()),
            text_column(csi, sessions, |s| s.csi.clone()),
            text_column(reason, sessions, |s| {
                s.fticks_outcome.map(|o| o.reason().to_string())
            }),
            text_column(origin, sessions, |s| Some(s.origin.as_str().to_string())),
            text_column(home, sessions, |s| Some(s.home_jurisdiction.clone())),
            text_column(visiting, sessions, |s| Some(s.visiting_jurisdiction.clone())),
            Series::new(roaming.into(), roaming_flags).into(),
        ],
    )
}

/// Text form of a cell as written to CSV; `None` for null.
pub fn cell_text(value: &AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some((*s).to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use roam_model::EventKind;

    use super::*;

    fn event(line: usize, username: Option<&str>) -> AccessEvent {
        AccessEvent {
            line,
            timestamp: NaiveDate::from_ymd_opt(2024, 7, 25).and_then(|d| d.and_hms_opt(9, 3, 0)),
            event: EventKind::Accept,
            username: username.map(str::to_string),
            station_id: None,
            source: Some("sp1.example".to_string()),
            destination: None,
            server_ip: "10.0.0.5".to_string(),
            cui: None,
        }
    }

    #[test]
    fn access_frame_has_stable_columns() {
        let df = access_frame(&[event(1, Some("alice@iitd.ac.in")), event(2, None)]).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ACCESS_COLUMNS.to_vec());

        let ts = df.column("Timestamp").unwrap().get(0).unwrap();
        assert_eq!(cell_text(&ts).as_deref(), Some("2024-07-25 09:03:00"));
        let user = df.column("Username").unwrap().get(1).unwrap();
        assert_eq!(cell_text(&user), None);
    }

    #[test]
    fn empty_tables_keep_their_columns() {
        let df = fticks_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), FTICKS_COLUMNS.len());
        assert_eq!(session_frame(&[]).unwrap().width(), SESSION_COLUMNS.len());
    }
}
