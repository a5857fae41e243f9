//! End-to-end tests for the command layer and text rendering.

use std::io::Write;

use clap::Parser;
use tempfile::{NamedTempFile, tempdir};

use roam_cli::cli::{Cli, Command};
use roam_cli::commands::{enrich, load, run_export};
use roam_cli::summary::{
    institution_table, overview_text, roaming_table, timeline_table, user_card_text,
};
use roam_model::ReportOptions;
use roam_report::{build_report, user_summary};

const LOG: &str = "\
Thu Jul 25 09:03:00 2024: Access-Accept for user alice@iitd.ac.in stationid AA:BB:CC:DD:EE:FF from sp1.example to sp2.example (10.0.0.5)
Thu Jul 25 09:03:05 2024: F-TICKS/eduroam/1.0#REALM=iitd.ac.in#VISCOUNTRY=IN#VISINST=nit.ac.in#CSI=abc123#RESULT=OK#
garbage that matches nothing
Thu Jul 25 10:15:00 2024: Access-Reject for user marco@unimi.it stationid 11-22-33-44-55-66 from etlr1.eduroam.org to iitb_idp_sp (14.139.60.2)
Thu Jul 25 11:00:00 2024: Access-Accept for user guest stationid 01:02:03:04:05:06 from sp1.example (10.0.0.7)
Fri Jul 26 09:10:00 2024: Access-Accept for user alice@iitd.ac.in from sp1.example to sp2.example (10.0.0.5)
";

fn log_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

fn cli(args: &[&str]) -> Command {
    let mut argv = vec!["roam-analyzer"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn overview_text_snapshot() {
    let file = log_file(LOG);
    let path = file.path().to_str().unwrap();
    let Command::Summary(args) = cli(&["summary", path]) else {
        panic!("expected summary");
    };

    let parsed = load(&args.input).unwrap();
    let sessions = enrich(&parsed);
    let report = build_report(&sessions, &ReportOptions::default());

    insta::assert_snapshot!(overview_text(&report.overview, &parsed.stats), @r"
    Lines read: 6
    Records: 4 access, 1 F-TICKS
    Users: 3 (2 domestic, 1 foreign, 2 roaming)
    Connections: 5 (4 successful, 1 failed)
    Success rate: 80.0%
    Roaming sessions: 3
    Home jurisdictions: 3
    ");
}

#[test]
fn ranking_tables_list_entries() {
    let file = log_file(LOG);
    let Command::Summary(args) = cli(&["summary", file.path().to_str().unwrap(), "--top", "2"])
    else {
        panic!("expected summary");
    };
    assert_eq!(args.top, 2);
    let parsed = load(&args.input).unwrap();
    let sessions = enrich(&parsed);
    let report = build_report(&sessions, &ReportOptions::default().with_top_n(2));

    let institutions = institution_table(&report.top_institutions).to_string();
    assert!(institutions.contains("sp2.example"));
    assert!(institutions.contains("nit.ac.in"));
    assert!(!institutions.contains("iitb_idp_sp"));

    let patterns = roaming_table(&report.roaming_patterns).to_string();
    assert!(patterns.contains("India"));
    assert!(patterns.contains("Italy"));
}

#[test]
fn user_card_and_timeline() {
    let file = log_file(LOG);
    let Command::User(args) = cli(&["user", file.path().to_str().unwrap(), "alice@iitd.ac.in"])
    else {
        panic!("expected user");
    };
    let parsed = load(&args.input).unwrap();
    let sessions = enrich(&parsed);
    let user = user_summary(&sessions, &args.username).unwrap();

    insta::assert_snapshot!(user_card_text(&user), @r"
    User: alice@iitd.ac.in
    Origin: Domestic
    Home jurisdiction: India
    Connections: 2 (2 successful, 0 failed)
    Roaming: yes (2 sessions)
    Institutions visited: sp2.example
    Jurisdictions visited: Unknown
    ");

    let timeline = timeline_table(&user.sessions).to_string();
    let first = timeline.find("2024-07-25 09:03:00").unwrap();
    let second = timeline.find("2024-07-26 09:10:00").unwrap();
    assert!(first < second);
}

#[test]
fn garbage_only_log_exports_nothing() {
    let file = log_file("nothing here\nstill nothing\n");
    let out = tempdir().unwrap();
    let dir = out.path().join("export");
    let Command::Export(args) = cli(&[
        "export",
        file.path().to_str().unwrap(),
        "--output-dir",
        dir.to_str().unwrap(),
    ]) else {
        panic!("expected export");
    };

    assert!(run_export(&args).unwrap().is_none());
    assert!(!dir.exists());
}

#[test]
fn export_writes_filtered_tables() {
    let file = log_file(LOG);
    let out = tempdir().unwrap();
    let Command::Export(args) = cli(&[
        "export",
        file.path().to_str().unwrap(),
        "--output-dir",
        out.path().to_str().unwrap(),
        "--event",
        "accept",
        "--result",
        "FAIL",
    ]) else {
        panic!("expected export");
    };

    let files = run_export(&args).unwrap().unwrap();

    let access = std::fs::read_to_string(&files.access).unwrap();
    let mut lines = access.lines();
    assert_eq!(
        lines.next(),
        Some("Timestamp,Event,Username,StationID,Source,Destination,ServerIP,CUI")
    );
    // Newest first; the reject row is filtered out.
    assert!(lines.next().unwrap().starts_with("2024-07-26 09:10:00,Access-Accept"));
    assert_eq!(access.lines().count(), 4);

    let fticks = std::fs::read_to_string(&files.fticks).unwrap();
    assert_eq!(fticks.lines().count(), 1);

    // Session filters drop F-TICKS rows when an event kind is selected.
    let sessions = std::fs::read_to_string(&files.sessions).unwrap();
    assert_eq!(sessions.lines().count(), 4);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files.report).unwrap()).unwrap();
    assert_eq!(report["overview"]["total_connections"], 3);
    assert_eq!(report["overview"]["failed"], 0);
}

#[test]
fn missing_file_is_an_error() {
    let Command::Summary(args) = cli(&["summary", "/nonexistent/radius.log"]) else {
        panic!("expected summary");
    };
    let error = load(&args.input).unwrap_err();
    assert!(format!("{error:#}").contains("not found"));
}
