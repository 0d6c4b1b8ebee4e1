mod render;
mod shell;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use sqlite_viewer_core::{SortState, ViewerConfig, highlight_schema};
use sqlite_viewer_export::{CsvOptions, default_export_name, write_csv};
use sqlite_viewer_sqlite::{GridPage, Session};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{render_execution, render_grid, render_highlighted};
use crate::shell::Shell;

/// Output format for grid-producing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "sqlite-viewer", version)]
#[command(about = "Browse, search and export SQLite databases")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the user tables of a database.
    Tables(DbArgs),
    /// Show the rows of a table.
    Browse(BrowseArgs),
    /// Show rows containing a search term in any column.
    Search(SearchArgs),
    /// Show CREATE statements and table info.
    Schema(SchemaArgs),
    /// Run SQL from --query or stdin.
    Sql(SqlArgs),
    /// Write a table grid to a CSV file.
    Export(ExportArgs),
    /// Interactive shell with dot commands.
    Shell(ShellArgs),
}

#[derive(Debug, Args)]
struct DbArgs {
    /// Path to the SQLite database file.
    #[arg(long)]
    db: PathBuf,
}

#[derive(Debug, Args)]
struct GridArgs {
    /// Table to show.
    #[arg(long)]
    table: String,
    /// Maximum rows to fetch (1 to 1000000).
    #[arg(long)]
    limit: Option<u32>,
    /// Column to sort by.
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    desc: bool,
}

#[derive(Debug, Args)]
struct BrowseArgs {
    #[command(flatten)]
    db: DbArgs,
    #[command(flatten)]
    grid: GridArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table to search.
    #[arg(long)]
    table: String,
    /// Text to look for; matched case-insensitively as a substring.
    #[arg(long)]
    term: String,
    /// Maximum rows to return.
    #[arg(long)]
    limit: Option<u32>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table whose schema to show.
    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    table: Option<String>,
    /// Show every table's CREATE statement.
    #[arg(long)]
    all: bool,
    /// Highlight keywords and types.
    #[arg(long)]
    color: bool,
}

#[derive(Debug, Args)]
struct SqlArgs {
    #[command(flatten)]
    db: DbArgs,
    /// SQL to run; read from stdin when omitted.
    #[arg(long)]
    query: Option<String>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    db: DbArgs,
    #[command(flatten)]
    grid: GridArgs,
    /// Export only rows containing this text.
    #[arg(long, conflicts_with = "sort")]
    term: Option<String>,
    /// Output CSV path (default: <table>_<timestamp>.csv).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ShellArgs {
    /// Database to open on start.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Highlight schema text.
    #[arg(long)]
    color: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        init_logging(cli.verbose, &config.log_level);
        debug!(command = ?cli.command, config = ?cli.config, "starting");
        match cli.command {
            Command::Tables(args) => run_tables(&config, args),
            Command::Browse(args) => run_browse(&config, args),
            Command::Search(args) => run_search(&config, args),
            Command::Schema(args) => run_schema(&config, args),
            Command::Sql(args) => run_sql(&config, args),
            Command::Export(args) => run_export(&config, args),
            Command::Shell(args) => run_shell(&config, args),
        }
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, String> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .map_err(|e| format!("failed to load config '{}': {e}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

/// Filter directive for the given `-v` count, falling back to the
/// configured level.
fn log_directive(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn init_logging(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose, configured)));
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn open_session(config: &ViewerConfig, db: &Path) -> Result<Session, String> {
    let mut session = Session::new(config.default_limit);
    session.open(db).map_err(|e| e.to_string())?;
    Ok(session)
}

/// Selects the table and applies limit and sort from the arguments.
fn prepare_grid(session: &mut Session, grid: &GridArgs) -> Result<(), String> {
    session.select_table(&grid.table).map_err(|e| e.to_string())?;
    if let Some(limit) = grid.limit {
        session.set_limit(limit);
    }
    if let Some(column) = &grid.sort {
        let sort = if grid.desc {
            SortState::descending(column.as_str())
        } else {
            SortState::ascending(column.as_str())
        };
        session.set_sort(sort).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn print_page(page: &GridPage, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Table => {
            println!("{}", render_grid(&page.result, &page.sort));
            println!("{}", page.status());
        }
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(page)
                .map_err(|e| format!("failed to serialize rows: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_tables(config: &ViewerConfig, args: DbArgs) -> Result<(), String> {
    let session = open_session(config, &args.db)?;
    if session.tables().is_empty() {
        eprintln!("No tables found");
    }
    for table in session.tables() {
        println!("{table}");
    }
    Ok(())
}

fn run_browse(config: &ViewerConfig, args: BrowseArgs) -> Result<(), String> {
    let mut session = open_session(config, &args.db.db)?;
    prepare_grid(&mut session, &args.grid)?;
    let page = session.load().map_err(|e| e.to_string())?;
    print_page(page, args.format)
}

fn run_search(config: &ViewerConfig, args: SearchArgs) -> Result<(), String> {
    let mut session = open_session(config, &args.db.db)?;
    session.select_table(&args.table).map_err(|e| e.to_string())?;
    if let Some(limit) = args.limit {
        session.set_limit(limit);
    }
    session.set_search(&args.term);
    let page = session.load().map_err(|e| e.to_string())?;
    print_page(page, args.format)
}

fn run_schema(config: &ViewerConfig, args: SchemaArgs) -> Result<(), String> {
    let session = open_session(config, &args.db.db)?;
    let text = if args.all {
        session.all_schemas().map_err(|e| e.to_string())?
    } else {
        session
            .schema(args.table.as_deref())
            .map_err(|e| e.to_string())?
            .to_text()
    };
    let color = args.color || config.color;
    println!("{}", render_highlighted(&text, &highlight_schema(&text), color));
    Ok(())
}

fn run_sql(config: &ViewerConfig, args: SqlArgs) -> Result<(), String> {
    let sql = match args.query {
        Some(query) => query,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
    };

    let mut session = open_session(config, &args.db.db)?;
    let execution = session.execute_sql(&sql).map_err(|e| e.to_string())?;
    match args.format {
        CliOutputFormat::Table => println!("{}", render_execution(&execution)),
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&execution)
                .map_err(|e| format!("failed to serialize result: {e}"))?;
            println!("{json}");
        }
    }
    session.close();
    Ok(())
}

fn run_export(config: &ViewerConfig, args: ExportArgs) -> Result<(), String> {
    let mut session = open_session(config, &args.db.db)?;
    prepare_grid(&mut session, &args.grid)?;
    if let Some(term) = &args.term {
        session.set_search(term);
    }
    session.load().map_err(|e| e.to_string())?;
    let page = session.export_grid().map_err(|e| e.to_string())?;

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(default_export_name(
            Some(&page.table),
            chrono::Local::now().naive_local(),
        ))
    });
    let options = CsvOptions {
        delimiter: config.csv_delimiter,
    };
    let rows = write_csv(&output, &page.result, &options).map_err(|e| e.to_string())?;
    println!("Exported {rows} rows to {}", output.display());
    Ok(())
}

fn run_shell(config: &ViewerConfig, args: ShellArgs) -> Result<(), String> {
    let mut session = Session::new(config.default_limit);
    if let Some(db) = &args.db {
        session.open(db).map_err(|e| e.to_string())?;
    }

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let mut shell = Shell::new(session, config, args.color || config.color);
    shell
        .run(stdin.lock(), &mut io::stdout().lock(), prompt)
        .map_err(|e| format!("shell I/O error: {e}"))
}
