//! Terminal rendering for grids, highlighted text and SQL outcomes.

use std::time::Duration;

use comfy_table::{ContentArrangement, Table, presets};
use owo_colors::OwoColorize;
use sqlite_viewer_core::{HighlightSpan, HighlightTag, ResultSet, SortState};
use sqlite_viewer_sqlite::{SqlExecution, SqlOutcome};

/// Renders a result grid; the sorted column header carries an arrow.
pub fn render_grid(result: &ResultSet, sort: &SortState) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(result.columns.iter().map(|column| {
        match sort.direction_for(column) {
            Some(direction) => format!("{column} {}", direction.indicator()),
            None => column.clone(),
        }
    }));
    for row in &result.rows {
        table.add_row(row.values().map(|value| value.display()));
    }
    table.to_string()
}

/// Applies highlight spans as ANSI colors; returns `text` as-is when
/// `color` is off.
pub fn render_highlighted(text: &str, spans: &[HighlightSpan], color: bool) -> String {
    if !color {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + spans.len() * 16);
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        let word = &text[span.start..span.end];
        let painted = match span.tag {
            HighlightTag::Keyword => word.truecolor(0x56, 0x9c, 0xd6).to_string(),
            HighlightTag::Type => word.truecolor(0x4e, 0xc9, 0xb0).to_string(),
        };
        out.push_str(&painted);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Seconds with millisecond precision, e.g. `0.012s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3}s", elapsed.as_secs_f64())
}

/// Renders the outcome of user SQL: the result grid plus a status line.
pub fn render_execution(execution: &SqlExecution) -> String {
    let elapsed = format_elapsed(execution.elapsed);
    match &execution.outcome {
        SqlOutcome::Empty => "No statements to execute".to_string(),
        SqlOutcome::Rows(result) if result.is_empty() => "No results".to_string(),
        SqlOutcome::Rows(result) => format!(
            "{}\n{} rows in {elapsed}",
            render_grid(result, &SortState::default()),
            result.len()
        ),
        SqlOutcome::Affected { rows } => format!("{rows} rows affected in {elapsed}"),
    }
}
