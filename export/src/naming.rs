//! Default file names for exports.

use chrono::NaiveDateTime;

/// Suggested file name for exporting `table` at `now`:
/// `<table>_<YYYYmmdd_HHMMSS>.csv`, or `export_…` without a table.
///
/// Characters that cannot appear in a file name on common platforms are
/// replaced with `_`.
///
/// ```
/// use chrono::NaiveDate;
/// use sqlite_viewer_export::default_export_name;
///
/// let now = NaiveDate::from_ymd_opt(2026, 3, 9)
///     .unwrap()
///     .and_hms_opt(14, 5, 7)
///     .unwrap();
/// assert_eq!(default_export_name(Some("Order"), now), "Order_20260309_140507.csv");
/// assert_eq!(default_export_name(None, now), "export_20260309_140507.csv");
/// ```
pub fn default_export_name(table: Option<&str>, now: NaiveDateTime) -> String {
    let stem = match table {
        Some(table) if !table.is_empty() => sanitize(table),
        _ => "export".to_string(),
    };
    format!("{stem}_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect()
}
