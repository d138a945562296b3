//! threadline - Download every comment of a Hacker News thread to CSV
//!
//! Pages through the thread's comments, fetches each commenter's bio,
//! and writes `author, created_at, object_id, comment_text, bio` rows.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use threadline_core::{ProgressContext, fmt_num};

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "threadline")]
#[command(about = "Download comments and author bios from a Hacker News thread into a CSV file")]
#[command(version)]
struct Cli {
    /// The thread id to download comments from
    #[arg(value_parser = parse_thread_id)]
    thread_id: String,

    /// Output CSV path (default: hackernews_comments.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum simultaneous profile requests (default: unbounded)
    #[arg(long, value_parser = parse_concurrency)]
    max_concurrency: Option<usize>,

    /// Comments per search page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
    page_size: Option<u32>,

    /// Request timeout in seconds (default: none)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Config file path (default: ./threadline.toml or ~/.config/threadline/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Thread ids are passed through as-is; only a blank one is rejected.
fn parse_thread_id(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("thread id must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    let progress = ProgressContext::new();
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    threadline_core::init_logging(cli.quiet, cli.debug, multi);

    let file_config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    // Config file defaults, CLI overrides
    let mut config = file_config.pipeline(&cli.thread_id);
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(n) = cli.max_concurrency {
        config.max_concurrency = Some(n);
    }
    if let Some(size) = cli.page_size {
        config.page_size = size;
    }
    if let Some(secs) = cli.timeout {
        config.http.timeout = Some(Duration::from_secs(secs));
    }

    log::info!("Downloading thread {}", config.thread_id);
    log::debug!("{config:?}");

    let summary = threadline_hn::run_http(&config, &progress)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(format!("Thread {}", config.thread_id)).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    table.add_row(vec!["Comments", &fmt_num(summary.comments)]);
    table.add_row(vec!["Reported", &fmt_num(summary.reported_hits)]);
    table.add_row(vec!["Pages", &summary.pages.to_string()]);
    table.add_row(vec!["Authors", &fmt_num(summary.distinct_authors)]);
    table.add_row(vec![
        "Output",
        &summary.output_path.display().to_string(),
    ]);
    eprintln!("\n{table}");

    println!("Total time: {:.3} seconds", start.elapsed().as_secs_f64());
    Ok(())
}
