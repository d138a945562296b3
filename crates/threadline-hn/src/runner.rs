//! Pipeline orchestration: paginate -> bios -> merge/sanitize -> write -> verify

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use threadline_core::progress::fmt_num;
use threadline_core::{HttpTransport, ProgressContext, SHARED_RUNTIME, Transport};

use crate::api::Endpoints;
use crate::bios::fetch_bios;
use crate::config::Config;
use crate::output;
use crate::paginate::fetch_all_comments;
use crate::transform::finalize;

/// Summary of one run
#[derive(Debug)]
pub struct Summary {
    pub comments: usize,
    /// `nbHits` from the last search page
    pub reported_hits: usize,
    pub pages: u32,
    pub distinct_authors: usize,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

impl Summary {
    /// Whether the API's hit count disagrees with what was downloaded
    pub fn hits_mismatch(&self) -> bool {
        self.reported_hits != self.comments
    }

    pub fn log(&self) {
        log::info!("=== Thread Summary ===");
        log::info!(
            "Comments: {} over {} pages ({} distinct authors)",
            fmt_num(self.comments),
            self.pages,
            fmt_num(self.distinct_authors)
        );
        if self.hits_mismatch() {
            log::warn!(
                "API reported {} hits but {} comments were downloaded",
                fmt_num(self.reported_hits),
                fmt_num(self.comments)
            );
        }
        log::info!("Output: {}", self.output_path.display());
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

/// Run the whole pipeline over the given transport.
///
/// Fails on the first fetch, schema, I/O or verification error. The output
/// file is removed before any request is made, so a failed run never leaves
/// the previous run's file behind.
pub fn run<T: Transport>(
    config: &Config,
    transport: Arc<T>,
    progress: &ProgressContext,
) -> anyhow::Result<Summary> {
    let start = Instant::now();
    anyhow::ensure!(config.page_size > 0, "page size must be at least 1");
    let endpoints = Endpoints::new(&config.base_url)?;

    output::remove_existing(&config.output_path)?;

    let pages_pb = progress.stage_line("pages");
    let paginated = SHARED_RUNTIME
        .handle()
        .block_on(fetch_all_comments(
            transport.as_ref(),
            &endpoints,
            &config.thread_id,
            config.page_size,
            config.page_delay,
            &pages_pb,
        ))
        .with_context(|| format!("Failed to fetch comments for thread {}", config.thread_id))?;
    log::info!(
        "Fetched {} comments in {} pages",
        fmt_num(paginated.comments.len()),
        paginated.pages_fetched
    );

    let authors: Vec<String> = paginated
        .comments
        .iter()
        .map(|c| c.author.clone())
        .collect();
    let distinct_authors = authors.iter().collect::<HashSet<_>>().len();
    log::info!("Fetching {} bios", fmt_num(authors.len()));

    let bios_pb = progress.task_bar("bios", authors.len() as u64);
    let bios = SHARED_RUNTIME
        .handle()
        .block_on(fetch_bios(
            Arc::clone(&transport),
            &endpoints,
            &authors,
            config.max_concurrency,
            &bios_pb,
        ))
        .context("Failed to fetch author bios")?;

    let rows = finalize(paginated.comments, bios).context("Failed to prepare CSV rows")?;
    output::write_and_verify(&config.output_path, &rows)?;

    let summary = Summary {
        comments: rows.len(),
        reported_hits: paginated.reported_hits as usize,
        pages: paginated.pages_fetched,
        distinct_authors,
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}

/// Run over a real HTTP client built from `config.http`.
pub fn run_http(config: &Config, progress: &ProgressContext) -> anyhow::Result<Summary> {
    let transport = HttpTransport::new(&config.http).context("Failed to build HTTP client")?;
    run(config, Arc::new(transport), progress)
}
