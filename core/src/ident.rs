//! Identifier safety for dynamically composed SQL.
//!
//! Table and column names cannot be bound as parameters, so every name that
//! ends up inside a generated statement goes through [`quote_identifier`].
//! A name is emitted bare only when it is a plain ASCII word that SQLite
//! would not mistake for a keyword; everything else is wrapped in double
//! quotes with embedded quotes doubled.
//!
//! # Examples
//!
//! ```
//! use sqlite_viewer_core::quote_identifier;
//!
//! assert_eq!(quote_identifier("users").unwrap(), "users");
//! assert_eq!(quote_identifier("Order").unwrap(), "\"Order\"");
//! assert_eq!(quote_identifier("first name").unwrap(), "\"first name\"");
//! assert_eq!(quote_identifier("a\"b").unwrap(), "\"a\"\"b\"");
//! assert!(quote_identifier("").is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, Result};

/// SQLite keywords that force quoting, stored uppercase and sorted.
const RESERVED_WORDS: &[&str] = &[
    "ABORT",
    "ACTION",
    "ADD",
    "AFTER",
    "ALL",
    "ALTER",
    "ANALYZE",
    "AND",
    "AS",
    "ASC",
    "ATTACH",
    "AUTOINCREMENT",
    "BEFORE",
    "BEGIN",
    "BETWEEN",
    "BY",
    "CASCADE",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "COMMIT",
    "CONFLICT",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "DATABASE",
    "DEFAULT",
    "DEFERRABLE",
    "DEFERRED",
    "DELETE",
    "DESC",
    "DETACH",
    "DISTINCT",
    "DROP",
    "EACH",
    "ELSE",
    "END",
    "ESCAPE",
    "EXCEPT",
    "EXCLUSIVE",
    "EXISTS",
    "EXPLAIN",
    "FAIL",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "GLOB",
    "GROUP",
    "HAVING",
    "IF",
    "IGNORE",
    "IMMEDIATE",
    "IN",
    "INDEX",
    "INDEXED",
    "INITIALLY",
    "INNER",
    "INSERT",
    "INSTEAD",
    "INTERSECT",
    "INTO",
    "IS",
    "ISNULL",
    "JOIN",
    "KEY",
    "LEFT",
    "LIKE",
    "LIMIT",
    "MATCH",
    "NATURAL",
    "NO",
    "NOT",
    "NOTNULL",
    "NULL",
    "OF",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "PLAN",
    "PRAGMA",
    "PRIMARY",
    "QUERY",
    "RAISE",
    "RECURSIVE",
    "REFERENCES",
    "REGEXP",
    "REINDEX",
    "RELEASE",
    "RENAME",
    "REPLACE",
    "RESTRICT",
    "RIGHT",
    "ROLLBACK",
    "ROW",
    "SAVEPOINT",
    "SELECT",
    "SET",
    "TABLE",
    "TEMP",
    "TEMPORARY",
    "THEN",
    "TO",
    "TRANSACTION",
    "TRIGGER",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VACUUM",
    "VALUES",
    "VIEW",
    "VIRTUAL",
    "WHEN",
    "WHERE",
    "WITH",
    "WITHOUT",
];

static SIMPLE_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("simple identifier pattern is valid")
});

/// Returns `true` if `word` (in any letter case) is an SQLite keyword that
/// cannot appear bare as an identifier.
pub fn is_reserved_word(word: &str) -> bool {
    let upper = word.to_ascii_uppercase();
    RESERVED_WORDS.binary_search(&upper.as_str()).is_ok()
}

/// Returns `true` if `name` must be quoted to form a valid identifier.
///
/// A name needs quoting when it is not a plain ASCII word (letter or
/// underscore followed by letters, digits, underscores) or when it collides
/// with a reserved word. Empty names always need quoting, but
/// [`quote_identifier`] rejects them outright.
pub fn needs_quoting(name: &str) -> bool {
    !SIMPLE_IDENTIFIER.is_match(name) || is_reserved_word(name)
}

/// Renders `name` as a SQL fragment that is safe to interpolate.
///
/// # Errors
///
/// Returns [`CoreError::InvalidIdentifier`] if `name` is empty.
pub fn quote_identifier(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(CoreError::InvalidIdentifier(
            "identifier must not be empty".to_string(),
        ));
    }

    if needs_quoting(name) {
        Ok(format!("\"{}\"", name.replace('"', "\"\"")))
    } else {
        Ok(name.to_string())
    }
}
