//! Threadline HN - Hacker News thread harvesting pipeline
//!
//! Pages through every comment of a thread on the Algolia HN search API,
//! fetches each commenter's profile "about" text, and writes the merged,
//! plain-text result to a verified CSV file.
//!
//! # Example
//!
//! ```ignore
//! use threadline_hn::{Config, run_http};
//! use threadline_core::ProgressContext;
//!
//! let config = Config::new("35769529");
//! let summary = run_http(&config, &ProgressContext::new())?;
//! println!("{} comments written", summary.comments);
//! ```

pub mod api;
pub mod bios;
pub mod config;
pub mod output;
pub mod paginate;
pub mod runner;
pub mod transform;

// Re-exports
pub use api::{CommentRecord, Endpoints, SearchPage, UserProfile};
pub use bios::fetch_bios;
pub use config::Config;
pub use output::{VerificationFailure, write_and_verify};
pub use paginate::{Paginated, fetch_all_comments};
pub use runner::{Summary, run, run_http};
pub use transform::{EnrichedRecord, OutputRow, finalize};
