//! Analysis Orchestration
//!
//! Drives the whole pipeline for one log file, in dependency order:
//!
//! 1. **Load**: the entire file is read into memory up front
//! 2. **Detect**: only the RLM Report Log format proceeds
//! 3. **Tokenize + Extract**: rows become the normalized event sequence
//!    plus the identity registries
//! 4. **Analyze**: concurrency replay, duration reconciliation (once per
//!    grouping dimension), denial collection — all over the same finalized
//!    event sequence
//! 5. **Write**: the report files, after an existing-file conflict check
//!
//! Everything runs single-threaded in one pass; any failure aborts the run
//! before reports are written, since the later tables assume a consistent
//! upstream sequence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::concurrency::concurrent_usage;
use crate::denials::denied_requests;
use crate::duration::{usage_durations, Identity};
use crate::error::AnalyzerError;
use crate::extractor::extract_events;
use crate::format::{detect_format, FileFormat};
use crate::models::RunSummary;
use crate::reports;
use crate::tokenizer::tokenize_lines;

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Overwrite report files that already exist.
    pub force: bool,
}

/// Batch analyzer for one report-log file.
pub struct LogAnalyzer {
    input_path: PathBuf,
    output_dir: PathBuf,
}

impl LogAnalyzer {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Run the full analysis and write every report file.
    pub fn run(&self, options: &AnalysisOptions) -> Result<RunSummary> {
        let lines = self.load_lines()?;
        self.check_output_dir()?;

        if detect_format(&lines) != FileFormat::ReportLog {
            return Err(AnalyzerError::InvalidFormat.into());
        }
        info!(path = %self.input_path.display(), lines = lines.len(), "analyzing report log");

        let rows = tokenize_lines(&lines);
        let log = extract_events(&rows)?;

        let snapshots = concurrent_usage(&log)?;
        let user_durations = usage_durations(&log, Identity::User)?;
        let host_durations = usage_durations(&log, Identity::Host)?;
        let denials = denied_requests(&log);

        let paths = reports::ReportPaths::new(&self.input_path, &self.output_dir);
        if !options.force {
            let conflicts = paths.existing();
            if !conflicts.is_empty() {
                let listing = conflicts
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                anyhow::bail!(
                    "Output files already exist (pass --force to overwrite):\n{}",
                    listing
                );
            }
        }

        reports::write_summary(&paths.summary, &self.input_path, &log)?;
        reports::write_processed_log(&paths.processed_log, &log)?;
        reports::write_concurrent_usage(&paths.concurrent_usage, log.products.names(), &snapshots)?;
        reports::write_license_activity(&paths.license_activity, &host_durations.records)?;
        reports::write_total_durations(
            &paths.total_duration_hosts,
            "Host",
            log.hosts.names(),
            log.products.names(),
            &host_durations.totals,
        )?;
        reports::write_total_durations(
            &paths.total_duration_users,
            "User",
            log.users.names(),
            log.products.names(),
            &user_durations.totals,
        )?;
        reports::write_denied_requests(&paths.denied_requests, &denials)?;

        Ok(RunSummary {
            input_file: self.input_path.display().to_string(),
            server_name: log.server_name.clone().unwrap_or_default(),
            events: log.events.len(),
            products: log.products.len(),
            users: log.users.len(),
            hosts: log.hosts.len(),
            denials: denials.len(),
            reports_written: paths
                .all()
                .into_iter()
                .map(|path| path.display().to_string())
                .collect(),
        })
    }

    fn load_lines(&self) -> Result<Vec<String>, AnalyzerError> {
        let contents =
            fs::read_to_string(&self.input_path).map_err(|_| AnalyzerError::CannotOpenFile {
                path: self.input_path.clone(),
            })?;
        Ok(contents.lines().map(str::to_owned).collect())
    }

    fn check_output_dir(&self) -> Result<(), AnalyzerError> {
        let dir: &Path = &self.output_dir;
        if dir.as_os_str().is_empty() || !dir.is_dir() {
            return Err(AnalyzerError::CannotFindDir {
                path: self.output_dir.clone(),
            });
        }
        Ok(())
    }
}
