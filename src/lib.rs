//! dstna_rs
//!
//! Fetch Danish national accounts (Statistics Denmark, table NAN1) and turn them
//! into a tidy yearly table, growth rates, a summary table and a set of charts.
//! Pairs with the `dstna` CLI.
//!
//! ### Features
//! - Fetch the expenditure-side GDP components from the StatBank API
//! - Merge them into one table indexed by year, restricted to a window
//! - Derive net exports and year-over-year percentage changes
//! - Summarize total and average growth between the window's endpoints
//! - Render pie, paired-axis, line and bar charts as SVG or PNG
//!
//! ### Example
//! ```no_run
//! use dstna_rs::{Client, PipelineConfig};
//!
//! let cfg = PipelineConfig::default();
//! let output = dstna_rs::run(&Client::default(), &cfg)?;
//! for row in &output.summary.rows {
//!     println!("{}: {:.2}%", row.label, row.total_change_pct);
//! }
//! dstna_rs::viz::render_all(&output, &cfg, "charts", Default::default(), Default::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod clean;
pub mod config;
pub mod derive;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod stats;
pub mod table;
pub mod viz;

pub use api::Client;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{PipelineOutput, build, run};
pub use table::{JoinPolicy, Table};
