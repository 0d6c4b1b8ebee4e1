//! Interactive shell.
//!
//! The shell owns one [`Session`] for its whole run and dispatches each
//! input line to a session handler. Lines starting with `.` are viewer
//! commands; everything else is collected as SQL until a line ends with `;`
//! and then passed to the database verbatim. Errors are printed and the
//! shell keeps going.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use sqlite_viewer_core::{ViewerConfig, highlight_schema};
use sqlite_viewer_export::{CsvOptions, default_export_name, write_csv};
use sqlite_viewer_sqlite::Session;
use tracing::debug;

use crate::render::{render_execution, render_grid, render_highlighted};

const HELP: &str = "\
.open PATH        open a database file (closes the current one)
.close            close the database
.tables           list tables
.use TABLE        select a table and show it
.limit N          set the row limit
.sort COLUMN      sort by COLUMN; repeat to reverse
.search [TEXT]    filter rows containing TEXT; no TEXT clears the filter
.show             reload the current table
.schema [TABLE]   show the CREATE statement and table info
.schema --all     show every CREATE statement
.export [PATH]    write the current grid to CSV
.help             show this help
.quit             leave the shell
Anything else is SQL, executed when a line ends with ';' outside quotes.";

/// A parsed dot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(PathBuf),
    Close,
    Tables,
    Use(String),
    Limit(u32),
    Sort(String),
    Search(String),
    Show,
    Schema(Option<String>),
    SchemaAll,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses a line starting with `.`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| {
            if rest.is_empty() {
                Err(format!("{name} requires {what}"))
            } else {
                Ok(rest.to_string())
            }
        };

        match name {
            ".open" => required("a path").map(|p| Self::Open(PathBuf::from(p))),
            ".close" => Ok(Self::Close),
            ".tables" => Ok(Self::Tables),
            ".use" => required("a table name").map(Self::Use),
            ".limit" => required("a number")?
                .parse()
                .map(Self::Limit)
                .map_err(|_| format!("invalid limit: {rest}")),
            ".sort" => required("a column name").map(Self::Sort),
            ".search" => Ok(Self::Search(rest.to_string())),
            ".show" => Ok(Self::Show),
            ".schema" if rest == "--all" => Ok(Self::SchemaAll),
            ".schema" => Ok(Self::Schema((!rest.is_empty()).then(|| rest.to_string()))),
            ".export" => Ok(Self::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            ".help" => Ok(Self::Help),
            ".quit" | ".exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other} (try .help)")),
        }
    }
}

/// Returns `true` when `sql` ends with a `;` that is outside string
/// literals, quoted identifiers and `--` comments.
fn statement_complete(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut in_comment = false;
    let mut last = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if in_comment {
            in_comment = c != '\n';
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '[' => quote = Some(']'),
                '-' if chars.peek() == Some(&'-') => {
                    in_comment = true;
                    continue;
                }
                _ => {}
            },
        }
        if !c.is_whitespace() {
            last = Some(c);
        }
    }
    quote.is_none() && last == Some(';')
}

/// Whether the shell should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The shell: a session plus the settings it renders with.
pub struct Shell<'a> {
    session: Session,
    config: &'a ViewerConfig,
    color: bool,
}

impl<'a> Shell<'a> {
    pub fn new(session: Session, config: &'a ViewerConfig, color: bool) -> Self {
        Self {
            session,
            config,
            color,
        }
    }

    /// Reads commands from `input` until end of input or `.quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> io::Result<()> {
        let mut sql = String::new();
        let mut lines = input.lines();

        loop {
            if prompt {
                let marker = if sql.is_empty() { "sqlite> " } else { "   ...> " };
                write!(out, "{marker}")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let trimmed = line.trim();

            if sql.is_empty() && trimmed.starts_with('.') {
                let result = ShellCommand::parse(trimmed).and_then(|cmd| self.dispatch(cmd, out));
                match result {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(message) => writeln!(out, "error: {message}")?,
                }
                continue;
            }

            if trimmed.is_empty() && sql.is_empty() {
                continue;
            }
            sql.push_str(&line);
            sql.push('\n');
            if statement_complete(&sql) {
                let text = std::mem::take(&mut sql);
                if let Err(message) = self.run_sql(&text, out) {
                    writeln!(out, "error: {message}")?;
                }
            }
        }

        if !sql.trim().is_empty() {
            if let Err(message) = self.run_sql(&sql, out) {
                writeln!(out, "error: {message}")?;
            }
        }
        self.session.close();
        Ok(())
    }

    fn run_sql<W: Write>(&mut self, sql: &str, out: &mut W) -> Result<(), String> {
        let execution = self.session.execute_sql(sql).map_err(|e| e.to_string())?;
        writeln!(out, "{}", render_execution(&execution)).map_err(|e| e.to_string())
    }

    fn dispatch<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow, String> {
        debug!(?command, "shell command");
        let session = &mut self.session;
        let mut text = String::new();

        match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Help => text.push_str(HELP),
            ShellCommand::Open(path) => {
                let tables = session.open(&path).map_err(|e| e.to_string())?;
                text = format!("Connected: {} ({} tables)", path.display(), tables.len());
            }
            ShellCommand::Close => {
                session.close();
                text.push_str("Database closed");
            }
            ShellCommand::Tables => {
                session.database().map_err(|e| e.to_string())?;
                text = session.tables().join("\n");
                if text.is_empty() {
                    text.push_str("No tables found");
                }
            }
            ShellCommand::Use(table) => {
                session.select_table(&table).map_err(|e| e.to_string())?;
                text = self.show()?;
            }
            ShellCommand::Limit(limit) => {
                let limit = session.set_limit(limit);
                text = format!("Limit: {}", limit.get());
            }
            ShellCommand::Sort(column) => {
                session.sort_by(&column).map_err(|e| e.to_string())?;
                text = self.show()?;
            }
            ShellCommand::Search(term) => {
                session.set_search(&term);
                text = self.show()?;
            }
            ShellCommand::Show => text = self.show()?,
            ShellCommand::Schema(table) => {
                let view = session.schema(table.as_deref()).map_err(|e| e.to_string())?;
                let body = view.to_text();
                text = render_highlighted(&body, &highlight_schema(&body), self.color);
            }
            ShellCommand::SchemaAll => {
                let body = session.all_schemas().map_err(|e| e.to_string())?;
                text = render_highlighted(&body, &highlight_schema(&body), self.color);
            }
            ShellCommand::Export(path) => {
                let page = session.export_grid().map_err(|e| e.to_string())?;
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(default_export_name(
                        Some(&page.table),
                        chrono::Local::now().naive_local(),
                    ))
                });
                let options = CsvOptions {
                    delimiter: self.config.csv_delimiter,
                };
                let rows = write_csv(&path, &page.result, &options).map_err(|e| e.to_string())?;
                text = format!("Exported {rows} rows to {}", path.display());
            }
        }

        writeln!(out, "{text}").map_err(|e| e.to_string())?;
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> Result<String, String> {
        let page = self.session.load().map_err(|e| e.to_string())?;
        Ok(format!(
            "{}\n{}",
            render_grid(&page.result, &page.sort),
            page.status()
        ))
    }
}
