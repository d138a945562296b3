//! HN pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use threadline_core::HttpConfig;

use crate::api::DEFAULT_BASE_URL;
use crate::paginate::DEFAULT_PAGE_SIZE;

/// Output file name used when none is given
pub const DEFAULT_OUTPUT: &str = "hackernews_comments.csv";

/// Runtime configuration for one thread harvest
#[derive(Debug, Clone)]
pub struct Config {
    /// Story id whose comments are collected (not validated locally)
    pub thread_id: String,
    /// CSV destination; deleted and recreated on every run
    pub output_path: PathBuf,
    pub base_url: String,
    pub page_size: u32,
    /// Pause between consecutive page requests
    pub page_delay: Duration,
    /// Cap on in-flight profile requests; `None` = all at once
    pub max_concurrency: Option<usize>,
    pub http: HttpConfig,
}

impl Config {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::ZERO,
            max_concurrency: None,
            http: HttpConfig::default(),
        }
    }
}
