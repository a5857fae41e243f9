use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace, warn};

use roam_enrich::Enricher;
use roam_ingest::parse_file;
use roam_model::{EnrichedSession, ParsedLog, ReportOptions};
use roam_output::{
    ExportTables, ExportedFiles, access_frame, export_all, fticks_frame, session_frame,
};
use roam_report::{build_report, user_summary};

use crate::cli::{ExportArgs, InputArgs, ParseArgs, SummaryArgs, TableArg, UserArgs};
use crate::logging::redact_value;
use crate::summary::{
    NO_ENTRIES_MESSAGE, frame_table, overview_text, print_summary, timeline_table, user_card_text,
};

/// Read and parse the input log.
pub fn load(input: &InputArgs) -> Result<ParsedLog> {
    let span = info_span!("parse", path = %input.log.display());
    let _guard = span.enter();
    let start = Instant::now();

    let parsed = parse_file(&input.log, &input.parse_options())
        .with_context(|| format!("read log {}", input.log.display()))?;
    info!(
        access = parsed.stats.access_records,
        fticks = parsed.stats.fticks_records,
        duration_ms = start.elapsed().as_millis(),
        "log parsed"
    );
    if parsed.stats.unparsed_timestamps > 0 {
        warn!(
            count = parsed.stats.unparsed_timestamps,
            "records kept without a readable timestamp"
        );
    }
    if parsed.stats.truncated {
        warn!(
            limit = ?input.max_records,
            "record limit reached, remaining lines skipped"
        );
    }
    Ok(parsed)
}

pub fn enrich(parsed: &ParsedLog) -> Vec<EnrichedSession> {
    let span = info_span!("enrich");
    let _guard = span.enter();
    let start = Instant::now();

    let sessions = Enricher::default().enrich_log(parsed);
    for session in &sessions {
        trace!(
            line = session.line,
            user = redact_value(session.username.as_deref().unwrap_or_default()),
            home = %session.home_jurisdiction,
            visiting = %session.visiting_jurisdiction,
            roaming = session.is_roaming,
            "session"
        );
    }
    info!(
        sessions = sessions.len(),
        duration_ms = start.elapsed().as_millis(),
        "sessions enriched"
    );
    sessions
}

pub fn run_parse(args: &ParseArgs) -> Result<()> {
    let parsed = load(&args.input)?;
    if parsed.is_empty() {
        println!("{NO_ENTRIES_MESSAGE}");
        return Ok(());
    }

    let df = match args.table {
        TableArg::Access => access_frame(&parsed.access).context("build access table")?,
        TableArg::Fticks => fticks_frame(&parsed.fticks).context("build F-TICKS table")?,
        TableArg::Sessions => {
            session_frame(&enrich(&parsed)).context("build session table")?
        }
    };
    println!("{}", frame_table(&df, args.limit));
    if let Some(limit) = args.limit.filter(|limit| *limit < df.height()) {
        println!("Showing {limit} of {} rows", df.height());
    }
    Ok(())
}

pub fn run_summary(args: &SummaryArgs) -> Result<()> {
    let parsed = load(&args.input)?;
    if parsed.is_empty() {
        println!("{NO_ENTRIES_MESSAGE}");
        return Ok(());
    }
    let sessions = args.filters.session_filter().apply(&enrich(&parsed));

    let span = info_span!("aggregate");
    let _guard = span.enter();
    let report = build_report(&sessions, &ReportOptions::default().with_top_n(args.top));
    debug!(sessions = sessions.len(), "filters applied");
    print_summary(&report, &parsed.stats);
    Ok(())
}

pub fn run_user(args: &UserArgs) -> Result<()> {
    let parsed = load(&args.input)?;
    if parsed.is_empty() {
        println!("{NO_ENTRIES_MESSAGE}");
        return Ok(());
    }
    let sessions = enrich(&parsed);

    let span = info_span!("aggregate", user = redact_value(&args.username));
    let _guard = span.enter();
    match user_summary(&sessions, &args.username) {
        Some(user) => {
            println!("{}", user_card_text(&user));
            println!();
            println!("{}", timeline_table(&user.sessions));
        }
        None => println!("No connections found for user {}", args.username),
    }
    Ok(())
}

/// Write the filtered tables and the report. Returns `None` without
/// writing anything when the log holds no records.
pub fn run_export(args: &ExportArgs) -> Result<Option<ExportedFiles>> {
    let parsed = load(&args.input)?;
    if parsed.is_empty() {
        println!("{NO_ENTRIES_MESSAGE}");
        return Ok(None);
    }
    let access = args.access_filter().apply(&parsed.access);
    let fticks = args.fticks_filter().apply(&parsed.fticks);
    let sessions = args.filters.session_filter().apply(&enrich(&parsed));

    let report = {
        let span = info_span!("aggregate");
        let _guard = span.enter();
        build_report(&sessions, &ReportOptions::default().with_top_n(args.top))
    };

    let span = info_span!("export", dir = %args.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let access_df = access_frame(&access).context("build access table")?;
    let fticks_df = fticks_frame(&fticks).context("build F-TICKS table")?;
    let session_df = session_frame(&sessions).context("build session table")?;
    let files = export_all(
        &ExportTables {
            access: &access_df,
            fticks: &fticks_df,
            sessions: &session_df,
            report: &report,
        },
        &args.output_dir,
    )
    .with_context(|| format!("export to {}", args.output_dir.display()))?;
    info!(duration_ms = start.elapsed().as_millis(), "export complete");

    println!("{}", overview_text(&report.overview, &parsed.stats));
    println!();
    for path in [&files.access, &files.fticks, &files.sessions, &files.report] {
        println!("Wrote {}", path.display());
    }
    Ok(Some(files))
}
