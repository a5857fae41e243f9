//! Integration tests for log parsing.

use std::io::Write;

use chrono::NaiveDate;
use roam_ingest::{IngestError, parse_bytes, parse_file, parse_str};
use roam_model::{EventKind, FticksOutcome, ParseOptions};
use tempfile::NamedTempFile;

const ACCESS_LINE: &str = "Thu Jul 25 09:03:00 2024: Access-Accept for user alice@iitd.ac.in stationid AA:BB:CC:DD:EE:FF from sp1.example to sp2.example (10.0.0.5)";
const FTICKS_OK: &str = "Thu Jul 25 09:03:05 2024: F-TICKS/eduroam/1.0#REALM=iitd.ac.in#VISCOUNTRY=IN#VISINST=nit.ac.in#CSI=abc123#RESULT=OK#";
const FTICKS_FAIL: &str = "Thu Jul 25 09:04:10 2024: F-TICKS/eduroam/1.0#REALM=uni.it#VISCOUNTRY=IN#VISINST=iitb.ac.in#CSI=def456#RESULT=FAIL#";

fn create_temp_log(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

#[test]
fn access_line_yields_one_record() {
    let parsed = parse_str(ACCESS_LINE, &ParseOptions::default());
    assert_eq!(parsed.access.len(), 1);
    assert!(parsed.fticks.is_empty());

    let record = &parsed.access[0];
    assert_eq!(record.event, EventKind::Accept);
    assert_eq!(record.event.as_str(), "Access-Accept");
    assert_eq!(record.username.as_deref(), Some("alice@iitd.ac.in"));
    assert_eq!(record.station_id.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
    assert_eq!(record.source.as_deref(), Some("sp1.example"));
    assert_eq!(record.destination.as_deref(), Some("sp2.example"));
    assert_eq!(record.server_ip, "10.0.0.5");
    assert_eq!(record.cui, None);
    assert_eq!(
        record.timestamp,
        NaiveDate::from_ymd_opt(2024, 7, 25).and_then(|d| d.and_hms_opt(9, 3, 0))
    );
}

#[test]
fn fticks_line_yields_one_record() {
    let parsed = parse_str(FTICKS_OK, &ParseOptions::default());
    assert!(parsed.access.is_empty());
    assert_eq!(parsed.fticks.len(), 1);

    let record = &parsed.fticks[0];
    assert_eq!(record.visiting_country, "IN");
    assert_eq!(record.visiting_institution, "nit.ac.in");
    assert_eq!(record.csi, "abc123");
    assert_eq!(record.result, "OK");
    assert_eq!(record.reason(), "Authentication successful");
}

#[test]
fn fticks_fail_is_failure() {
    let parsed = parse_str(FTICKS_FAIL, &ParseOptions::default());
    assert_eq!(parsed.fticks[0].outcome, FticksOutcome::Failure);
    assert_eq!(parsed.fticks[0].reason(), "Authentication failed");
}

#[test]
fn fticks_result_match_is_exact() {
    for (result, expected) in [
        ("OK", "Authentication successful"),
        ("FAIL", "Authentication failed"),
        ("", "Authentication failed"),
        ("ok", "Authentication failed"),
    ] {
        let line = format!(
            "Thu Jul 25 09:03:05 2024: F-TICKS/eduroam/1.0#REALM=x#VISCOUNTRY=IN#VISINST=y#CSI=z#RESULT={result}#"
        );
        let parsed = parse_str(&line, &ParseOptions::default());
        assert_eq!(parsed.fticks[0].reason(), expected, "RESULT={result:?}");
    }
}

#[test]
fn garbage_input_yields_empty_tables() {
    let garbage = "lorem ipsum\n\n12345\nAccess-Accept without a timestamp (1.2.3.4)\n";
    let parsed = parse_str(garbage, &ParseOptions::default());
    assert!(parsed.is_empty());
    assert_eq!(parsed.stats.unmatched_lines, 3);
    assert_eq!(parsed.stats.blank_lines, 1);
}

#[test]
fn parsing_is_idempotent() {
    let log = [ACCESS_LINE, FTICKS_OK, "noise", FTICKS_FAIL].join("\n");
    let first = parse_str(&log, &ParseOptions::default());
    let second = parse_str(&log, &ParseOptions::default());
    assert_eq!(first, second);
}

#[test]
fn records_keep_source_line_order() {
    let log = [FTICKS_OK, ACCESS_LINE, FTICKS_FAIL, ACCESS_LINE].join("\n");
    let parsed = parse_str(&log, &ParseOptions::default());
    let access_lines: Vec<_> = parsed.access.iter().map(|r| r.line).collect();
    let fticks_lines: Vec<_> = parsed.fticks.iter().map(|r| r.line).collect();
    assert_eq!(access_lines, vec![2, 4]);
    assert_eq!(fticks_lines, vec![1, 3]);
}

#[test]
fn invalid_bytes_do_not_stop_classification() {
    let mut bytes = b"Thu Jul 25 09:03:00 2024: Access-Accept for user bob\xff@uni.it (10.0.0.9)\n".to_vec();
    bytes.extend_from_slice(FTICKS_OK.as_bytes());
    let parsed = parse_bytes(&bytes, &ParseOptions::default());
    assert_eq!(parsed.access.len(), 1);
    assert_eq!(parsed.access[0].username.as_deref(), Some("bob@uni.it"));
    assert_eq!(parsed.fticks.len(), 1);
}

#[test]
fn parse_file_reads_log() {
    let file = create_temp_log(format!("{ACCESS_LINE}\r\n{FTICKS_OK}\r\n").as_bytes());
    let parsed = parse_file(file.path(), &ParseOptions::default()).unwrap();
    assert_eq!(parsed.access.len(), 1);
    assert_eq!(parsed.fticks.len(), 1);
    assert_eq!(parsed.access[0].server_ip, "10.0.0.5");
}

#[test]
fn parse_file_strips_utf8_bom() {
    let mut content = b"\xef\xbb\xbf".to_vec();
    content.extend_from_slice(ACCESS_LINE.as_bytes());
    let file = create_temp_log(&content);
    let parsed = parse_file(file.path(), &ParseOptions::default()).unwrap();
    assert_eq!(parsed.access.len(), 1);
}

#[test]
fn parse_file_without_records_in_utf16_is_empty_not_error() {
    let content = b"\xff\xfeT\x00h\x00u\x00\n\x00";
    let file = create_temp_log(content);
    let parsed = parse_file(file.path(), &ParseOptions::default()).unwrap();
    assert!(parsed.is_empty());
    assert_eq!(parsed, parse_bytes(content, &ParseOptions::default()));
}

#[test]
fn parse_file_transcodes_utf16_log() {
    let text = format!("{ACCESS_LINE}\r\n{FTICKS_OK}\r\n");
    let mut content = b"\xff\xfe".to_vec();
    content.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    let file = create_temp_log(&content);

    let parsed = parse_file(file.path(), &ParseOptions::default()).unwrap();
    assert_eq!(parsed.access.len(), 1);
    assert_eq!(parsed.fticks.len(), 1);
    assert_eq!(parsed.access[0].username.as_deref(), Some("alice@iitd.ac.in"));
}

#[test]
fn mismatched_weekday_keeps_timestamp() {
    // 2024-07-25 is a Thursday.
    let line = "Mon Jul 25 11:00:00 2024: Access-Accept for user guest from sp1.example (10.0.0.7)";
    let parsed = parse_str(line, &ParseOptions::default());
    assert_eq!(
        parsed.access[0].timestamp,
        NaiveDate::from_ymd_opt(2024, 7, 25).and_then(|d| d.and_hms_opt(11, 0, 0))
    );
    assert_eq!(parsed.stats.unparsed_timestamps, 0);
}

#[test]
fn parse_file_enforces_size_limit() {
    let file = create_temp_log(ACCESS_LINE.as_bytes());
    let options = ParseOptions::default().with_max_file_bytes(10);
    let err = parse_file(file.path(), &options).unwrap_err();
    assert!(matches!(err, IngestError::FileTooLarge { max_size: 10, .. }));
}

#[test]
fn parse_file_missing() {
    let err = parse_file(
        std::path::Path::new("/definitely/not/here.log"),
        &ParseOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
