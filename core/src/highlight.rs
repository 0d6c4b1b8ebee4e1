//! Keyword highlighting for schema text and the SQL editor.
//!
//! Highlighting is a plain search-and-tag pass: each keyword list is
//! compiled into one case-insensitive, whole-word regex and every match is
//! reported as a byte span. Renderers decide how a tag looks.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const SCHEMA_KEYWORDS: &[&str] = &[
    "CREATE",
    "TABLE",
    "PRIMARY",
    "KEY",
    "NOT",
    "NULL",
    "UNIQUE",
    "DEFAULT",
    "FOREIGN",
    "REFERENCES",
    "INDEX",
    "ON",
    "IF",
    "EXISTS",
    "AUTOINCREMENT",
    "CHECK",
    "CONSTRAINT",
];

const SCHEMA_TYPES: &[&str] = &[
    "INTEGER",
    "TEXT",
    "REAL",
    "BLOB",
    "VARCHAR",
    "CHAR",
    "BOOLEAN",
    "DATE",
    "DATETIME",
    "TIMESTAMP",
    "NUMERIC",
    "FLOAT",
    "DOUBLE",
];

const SQL_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "AND",
    "OR",
    "INSERT",
    "UPDATE",
    "DELETE",
    "CREATE",
    "DROP",
    "ALTER",
    "TABLE",
    "INTO",
    "VALUES",
    "SET",
    "ORDER",
    "BY",
    "GROUP",
    "HAVING",
    "JOIN",
    "LEFT",
    "RIGHT",
    "INNER",
    "OUTER",
    "ON",
    "AS",
    "DISTINCT",
    "LIMIT",
    "OFFSET",
    "UNION",
    "EXCEPT",
    "INTERSECT",
    "NULL",
    "NOT",
    "IN",
    "LIKE",
    "BETWEEN",
    "EXISTS",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
];

static SCHEMA_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(SCHEMA_KEYWORDS));
static SCHEMA_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(SCHEMA_TYPES));
static SQL_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| word_regex(SQL_KEYWORDS));

fn word_regex(words: &[&str]) -> Regex {
    let alternation = words.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("keyword list forms a valid regex")
}

/// Category of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HighlightTag {
    Keyword,
    Type,
}

/// A tagged byte range `start..end` in the highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub tag: HighlightTag,
}

/// Tags schema keywords and column type names in `CREATE` statement text.
///
/// ```
/// use sqlite_viewer_core::{HighlightTag, highlight_schema};
///
/// let spans = highlight_schema("create table t (id integer)");
/// let tags: Vec<_> = spans.iter().map(|s| s.tag).collect();
/// assert_eq!(tags, [HighlightTag::Keyword, HighlightTag::Keyword, HighlightTag::Type]);
/// ```
pub fn highlight_schema(text: &str) -> Vec<HighlightSpan> {
    let mut spans = collect(text, &SCHEMA_KEYWORD_RE, HighlightTag::Keyword);
    spans.extend(collect(text, &SCHEMA_TYPE_RE, HighlightTag::Type));
    spans.sort_by_key(|span| span.start);
    spans
}

/// Tags SQL keywords in editor text.
pub fn highlight_sql(text: &str) -> Vec<HighlightSpan> {
    collect(text, &SQL_KEYWORD_RE, HighlightTag::Keyword)
}

fn collect(text: &str, re: &Regex, tag: HighlightTag) -> Vec<HighlightSpan> {
    re.find_iter(text)
        .map(|m| HighlightSpan {
            start: m.start(),
            end: m.end(),
            tag,
        })
        .collect()
}
