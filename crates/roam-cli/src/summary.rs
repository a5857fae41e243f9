use std::collections::BTreeSet;
use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use roam_model::columns::TIMESTAMP_FORMAT;
use roam_model::{EnrichedSession, ParseStats, UserOrigin};
use roam_output::cell_text;
use roam_report::{
    AnalysisReport, OriginOutcome, Overview, PeakHour, RankedInstitution, RoamingPattern,
    TimeBuckets, UserSummary,
};

/// Shown instead of any table when the log holds no recognised lines.
pub const NO_ENTRIES_MESSAGE: &str = "No valid eduroam log entries found";

/// Plain-text headline block.
pub fn overview_text(overview: &Overview, stats: &ParseStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Lines read: {}", stats.lines);
    let _ = writeln!(
        out,
        "Records: {} access, {} F-TICKS",
        stats.access_records, stats.fticks_records
    );
    if stats.truncated {
        let _ = writeln!(out, "Input truncated at the record limit");
    }
    let _ = writeln!(
        out,
        "Users: {} ({} domestic, {} foreign, {} roaming)",
        overview.total_users, overview.domestic_users, overview.foreign_users, overview.roaming_users
    );
    let _ = writeln!(
        out,
        "Connections: {} ({} successful, {} failed)",
        overview.total_connections, overview.successful, overview.failed
    );
    let _ = writeln!(out, "Success rate: {:.1}%", overview.success_rate);
    let _ = writeln!(out, "Roaming sessions: {}", overview.roaming_sessions);
    let _ = write!(out, "Home jurisdictions: {}", overview.home_jurisdictions);
    out
}

pub fn print_summary(report: &AnalysisReport<'_>, stats: &ParseStats) {
    println!("{}", overview_text(&report.overview, stats));

    print_section("Top institutions", &institution_table(&report.top_institutions));
    print_section("Roaming patterns", &roaming_table(&report.roaming_patterns));
    print_section("Outcomes by user origin", &origin_table(&report.outcomes_by_origin));
    print_section("Peak hours", &peak_hour_table(&report.peak_hours));
    print_section("Daily activity", &daily_table(&report.time_buckets));
}

fn print_section(title: &str, table: &Table) {
    println!();
    println!("{title}:");
    println!("{table}");
}

pub fn institution_table(rows: &[RankedInstitution]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Institution"), header_cell("Connections")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![Cell::new(&row.institution), Cell::new(row.connections)]);
    }
    empty_row(&mut table, rows.is_empty());
    table
}

pub fn roaming_table(rows: &[RoamingPattern]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Home"),
        header_cell("Visiting"),
        header_cell("Sessions"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.home),
            Cell::new(&row.visiting),
            Cell::new(row.sessions),
        ]);
    }
    empty_row(&mut table, rows.is_empty());
    table
}

pub fn origin_table(rows: &[OriginOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Origin"),
        header_cell("Total"),
        header_cell("Successful"),
        header_cell("Failed"),
        header_cell("Success rate"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            origin_cell(row.origin),
            Cell::new(row.total),
            Cell::new(row.successful),
            count_cell(row.failed, Color::Red),
            Cell::new(format!("{:.1}%", row.success_rate)),
        ]);
    }
    empty_row(&mut table, rows.is_empty());
    table
}

pub fn peak_hour_table(rows: &[PeakHour]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Hour"), header_cell("Connections")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(format!("{:02}:00", row.hour)),
            Cell::new(row.connections),
        ]);
    }
    empty_row(&mut table, rows.is_empty());
    table
}

pub fn daily_table(buckets: &TimeBuckets) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Total"),
        header_cell("Successful"),
        header_cell("Failed"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (date, counts) in &buckets.by_date {
        table.add_row(vec![
            Cell::new(date),
            Cell::new(counts.total),
            Cell::new(counts.successful),
            count_cell(counts.failed(), Color::Red),
        ]);
    }
    if buckets.undated > 0 {
        table.add_row(vec![
            dim_cell("unknown"),
            Cell::new(buckets.undated),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    empty_row(&mut table, buckets.by_date.is_empty() && buckets.undated == 0);
    table
}

/// Plain-text header for one user.
pub fn user_card_text(user: &UserSummary<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User: {}", user.username);
    let _ = writeln!(out, "Origin: {}", user.origin);
    let _ = writeln!(out, "Home jurisdiction: {}", user.home_jurisdiction);
    let _ = writeln!(
        out,
        "Connections: {} ({} successful, {} failed)",
        user.total,
        user.successful,
        user.failed()
    );
    let _ = writeln!(
        out,
        "Roaming: {} ({} sessions)",
        if user.is_roaming() { "yes" } else { "no" },
        user.roaming_sessions
    );
    let _ = writeln!(out, "Institutions visited: {}", join_or_dash(&user.institutions));
    let _ = write!(out, "Jurisdictions visited: {}", join_or_dash(&user.jurisdictions));
    out
}

fn join_or_dash(values: &BTreeSet<&str>) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.iter().copied().collect::<Vec<_>>().join(", ")
    }
}

pub fn timeline_table(sessions: &[&EnrichedSession]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Timestamp"),
        header_cell("Event"),
        header_cell("Source"),
        header_cell("Destination"),
        header_cell("Visiting"),
        header_cell("Roaming"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Center);
    for session in sessions {
        let timestamp = session
            .timestamp
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string());
        let event = match (session.event, session.fticks_outcome) {
            (Some(event), _) => Some(event.as_str()),
            (None, Some(outcome)) => Some(outcome.reason()),
            (None, None) => None,
        };
        let event_cell = match event {
            Some(text) if session.is_success() => Cell::new(text).fg(Color::Green),
            Some(text) => Cell::new(text).fg(Color::Red),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            optional_cell(timestamp.as_deref()),
            event_cell,
            optional_cell(session.source.as_deref()),
            optional_cell(session.visited_institution()),
            Cell::new(&session.visiting_jurisdiction),
            if session.is_roaming {
                Cell::new("✓").fg(Color::Yellow).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    table
}

/// Render up to `limit` rows of a frame. Nulls are shown as a dim dash.
pub fn frame_table(df: &DataFrame, limit: Option<usize>) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);

    let rows = limit.map_or(df.height(), |limit| limit.min(df.height()));
    for row in 0..rows {
        let cells: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| {
                let value = column.get(row).unwrap_or(AnyValue::Null);
                optional_cell(cell_text(&value).as_deref())
            })
            .collect();
        table.add_row(cells);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn empty_row(table: &mut Table, empty: bool) {
    if empty {
        let width = table.column_count();
        table.add_row((0..width).map(|_| dim_cell("-")).collect::<Vec<_>>());
    }
}

fn origin_cell(origin: UserOrigin) -> Cell {
    match origin {
        UserOrigin::Domestic => Cell::new(origin).fg(Color::Blue).add_attribute(Attribute::Bold),
        UserOrigin::Foreign => Cell::new(origin).fg(Color::Magenta),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) if !text.is_empty() => Cell::new(text),
        _ => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
