//! RLM Usage Library
//!
//! Parses the activity log of an RLM-based floating-license server (the
//! "Report Log" format used by the Imaris license server) and derives usage
//! reports: concurrent license occupancy over time, per-user and per-host
//! checkout durations, denied-request records, and a human-readable summary.
//!
//! ## Architecture Overview
//!
//! The library is organized as a strictly forward pipeline:
//!
//! - [`format`] - Classifies the input as a supported Report Log, the
//!   unsupported legacy ISV log, or invalid
//! - [`tokenizer`] - Splits raw lines into positional fields
//! - [`extractor`] - Projects tokenized rows into normalized events using
//!   fixed per-kind column schemas, stamping dates with the ambient year
//! - [`registry`] - Stable first-seen-order name registries for products,
//!   users, and hosts
//! - [`concurrency`] - Replays the event stream into point-in-time
//!   occupancy snapshots
//! - [`duration`] - Pairs each checkout with its checkin (or shutdown, or
//!   end of file) and accumulates per-user and per-host totals
//! - [`denials`] - Collects denied license requests
//! - [`reports`] - Renders the tables to flat report files
//! - [`analyzer`] - Orchestrates a complete run over one file
//! - [`config`] / [`logging`] - Runtime configuration and structured logging
//!
//! The whole file is loaded and processed in a single pass; all tables are
//! built once and read-only afterward.
//!
//! ## Main Entry Point
//!
//! ```no_run
//! use rlm_usage::analyzer::{AnalysisOptions, LogAnalyzer};
//!
//! # fn example() -> anyhow::Result<()> {
//! let analyzer = LogAnalyzer::new("server.log", "reports");
//! let summary = analyzer.run(&AnalysisOptions::default())?;
//! println!("{} events from {}", summary.events, summary.server_name);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod concurrency;
pub mod config;
pub mod denials;
pub mod duration;
pub mod error;
pub mod extractor;
pub mod format;
pub mod logging;
pub mod models;
pub mod registry;
pub mod reports;
pub mod timestamp_parser;
pub mod tokenizer;

pub use analyzer::{AnalysisOptions, LogAnalyzer};
pub use error::AnalyzerError;
pub use models::*;
