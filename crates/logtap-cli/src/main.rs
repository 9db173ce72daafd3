// logtap CLI - query a logtap server or tail a local file

use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Table};
use logtap_core::parser::{LogParser, Parser as LineParser, SyslogParser};
use logtap_core::{filter_lines, resolve_parser, LogLevel, ParsedLogEntry, TailReader};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const MESSAGE_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "logtap")]
#[command(version)]
#[command(about = "Tail, search and parse log files", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(short, long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API key for authentication (or set LOGTAP_API_KEY env var)
    #[arg(short = 'k', long, env = "LOGTAP_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Number of lines to read from the end of the file
    #[arg(short = 'n', long, default_value = "50")]
    limit: usize,

    /// Substring to search for
    #[arg(short, long)]
    term: Option<String>,

    /// Regex to match (takes precedence over --term)
    #[arg(short, long)]
    regex: Option<String>,

    /// Case-insensitive matching
    #[arg(short, long)]
    ignore_case: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the last lines of a log file on the server
    Logs {
        /// File name inside the server's log directory
        #[arg(short, long, default_value = "syslog")]
        file: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show parsed entries from a log file on the server
    Parsed {
        /// File name inside the server's log directory
        #[arg(short, long, default_value = "syslog")]
        file: String,

        /// Log format (auto, syslog, json, nginx, apache)
        #[arg(long, default_value = "auto")]
        format: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List log files available on the server
    Files,

    /// Check server health
    Status,

    /// Tail a local file without a server
    Tail {
        /// Path to the log file
        path: PathBuf,

        /// Parse lines (auto when no format is given)
        #[arg(short, long, num_args = 0..=1, default_missing_value = "auto")]
        parse: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

// API Response types
#[derive(Deserialize)]
struct LogResponse {
    lines: Vec<String>,
    count: usize,
    filename: String,
}

#[derive(Deserialize)]
struct ParsedEntry {
    parser: String,
    #[serde(flatten)]
    entry: ParsedLogEntry,
}

#[derive(Deserialize)]
struct ParsedLogResponse {
    entries: Vec<ParsedEntry>,
    count: usize,
    filename: String,
    format: String,
}

#[derive(Deserialize)]
struct FileListResponse {
    files: Vec<String>,
    directory: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Build client with optional API key header
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(ref key) = cli.api_key {
        headers.insert("X-API-Key", reqwest::header::HeaderValue::from_str(key)?);
    }
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    match cli.command {
        Commands::Logs { file, filter } => {
            show_logs(&client, &cli.api_url, &file, &filter).await?;
        }
        Commands::Parsed {
            file,
            format,
            filter,
        } => {
            show_parsed(&client, &cli.api_url, &file, &format, &filter).await?;
        }
        Commands::Files => {
            list_files(&client, &cli.api_url).await?;
        }
        Commands::Status => {
            check_status(&client, &cli.api_url).await?;
        }
        Commands::Tail {
            path,
            parse,
            filter,
        } => {
            tail_local(&path, parse.as_deref(), &filter).await?;
        }
    }

    Ok(())
}

fn query_string(file: &str, filter: &FilterArgs) -> String {
    let mut query = format!(
        "filename={}&limit={}&case_sensitive={}",
        urlencoding::encode(file),
        filter.limit,
        !filter.ignore_case
    );
    if let Some(term) = &filter.term {
        query.push_str(&format!("&term={}", urlencoding::encode(term)));
    }
    if let Some(regex) = &filter.regex {
        query.push_str(&format!("&regex={}", urlencoding::encode(regex)));
    }
    query
}

/// Print the server's error body; `None` when the response failed.
async fn report_error(response: reqwest::Response) -> Result<Option<reqwest::Response>, reqwest::Error> {
    if response.status().is_success() {
        return Ok(Some(response));
    }

    let status = response.status();
    let text = response.text().await?;
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(err) => println!("{} {} ({})", "Error:".red().bold(), err.error, err.code),
        Err(_) => println!("{} {} {}", "Error:".red().bold(), status, text),
    }
    Ok(None)
}

async fn show_logs(
    client: &reqwest::Client,
    api_url: &str,
    file: &str,
    filter: &FilterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}/logs?{}", api_url, query_string(file, filter));
    let Some(response) = report_error(client.get(&url).send().await?).await? else {
        return Ok(());
    };
    let result: LogResponse = response.json().await?;

    println!("\n{} {}", "Logs:".cyan().bold(), result.filename);
    println!("{}", "─".repeat(80).dimmed());
    print_lines(&result.lines);
    println!("{}", "─".repeat(80).dimmed());
    println!("{} {}", "Lines:".dimmed(), result.count.to_string().green());

    Ok(())
}

async fn show_parsed(
    client: &reqwest::Client,
    api_url: &str,
    file: &str,
    format: &str,
    filter: &FilterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!(
        "{}/logs/parsed?{}&format={}",
        api_url,
        query_string(file, filter),
        urlencoding::encode(format)
    );
    let Some(response) = report_error(client.get(&url).send().await?).await? else {
        return Ok(());
    };
    let result: ParsedLogResponse = response.json().await?;

    println!(
        "\n{} {} {}",
        "Parsed:".cyan().bold(),
        result.filename,
        format!("({})", result.format).dimmed()
    );
    let entries: Vec<(String, ParsedLogEntry)> = result
        .entries
        .into_iter()
        .map(|e| (e.parser, e.entry))
        .collect();
    print_entries(&entries);
    println!("\n{} {}", "Entries:".dimmed(), result.count.to_string().green());

    Ok(())
}

async fn list_files(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}/files", api_url);
    let Some(response) = report_error(client.get(&url).send().await?).await? else {
        return Ok(());
    };
    let result: FileListResponse = response.json().await?;

    println!("\n{} {}", "Log files in".cyan().bold(), result.directory);
    println!("{}", "─".repeat(40).dimmed());
    if result.files.is_empty() {
        println!("{}", "No files found.".yellow());
    }
    for name in &result.files {
        println!("  {name}");
    }

    Ok(())
}

async fn check_status(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "logtap status".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    print!("  API Server ({})... ", api_url);
    io::stdout().flush()?;

    match client.get(format!("{}/health", api_url)).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await?;
            println!("{} ({}, v{})", "✓ Running".green(), health.status, health.version);
        }
        Ok(resp) => {
            println!("{} ({})", "✗ Error".red(), resp.status());
            return Ok(());
        }
        Err(e) => {
            println!("{} ({})", "✗ Down".red(), e);
            return Ok(());
        }
    }

    // /health is open, /files is behind the key
    print!("  Authentication... ");
    io::stdout().flush()?;

    match client.get(format!("{}/files", api_url)).send().await {
        Ok(resp) if resp.status() == reqwest::StatusCode::UNAUTHORIZED => {
            println!("{}", "✗ Rejected (check --api-key)".red());
        }
        Ok(_) => println!("{}", "✓ Accepted".green()),
        Err(e) => println!("{} ({})", "✗ Error".red(), e),
    }

    println!();
    Ok(())
}

async fn tail_local(
    path: &Path,
    parse: Option<&str>,
    filter: &FilterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    // fail on a bad format before touching the file
    let requested = parse.map(LineParser::from_name).transpose()?;

    let lines = TailReader::new().tail_async(path, filter.limit).await?;
    let lines = filter_lines(
        lines,
        filter.term.as_deref(),
        filter.regex.as_deref(),
        !filter.ignore_case,
    );

    match requested {
        Some(requested) => {
            let parser = resolve_parser(requested, &lines);
            println!(
                "\n{} {} {}",
                "Parsed:".cyan().bold(),
                path.display(),
                format!("({})", parser.name()).dimmed()
            );
            print_entries(&parser.parse_labeled(&lines));
        }
        None => print_lines(&lines),
    }

    Ok(())
}

// Raw lines get the syslog keyword heuristic for colour
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", colorize(SyslogParser::keyword_level(line), line));
    }
}

fn print_entries(entries: &[(String, ParsedLogEntry)]) {
    if entries.is_empty() {
        println!("{}", "No entries found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Level", "Time", "Source", "Parser", "Message"]);

    for (parser, entry) in entries {
        table.add_row(vec![
            colorize(entry.level, entry.level.as_str()).to_string(),
            entry
                .timestamp
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_default(),
            entry.source.clone().unwrap_or_default(),
            parser.dimmed().to_string(),
            truncate(&entry.message, MESSAGE_WIDTH),
        ]);
    }

    println!("{table}");
}

fn colorize(level: LogLevel, text: &str) -> ColoredString {
    match level {
        LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical => text.red().bold(),
        LogLevel::Error => text.red(),
        LogLevel::Warning => text.yellow(),
        LogLevel::Notice => text.cyan(),
        LogLevel::Info => text.normal(),
        LogLevel::Debug => text.blue(),
    }
}

/// RFC 3339 and access-log timestamps shown as local-style date time;
/// anything else as captured.
fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_str(raw, "%d/%b/%Y:%H:%M:%S %z") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}

// Truncate on char boundaries
fn truncate(message: &str, width: usize) -> String {
    if message.chars().count() <= width {
        return message.to_string();
    }
    let kept: String = message.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
