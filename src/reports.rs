//! Report Writing
//!
//! Renders the in-memory tables to flat files. Output names derive from the
//! input file so that several logs can be analyzed into one directory:
//! `<outputDir>/<inputStem>_LIC_Imaris_<ReportName>.<ext>`.
//!
//! The writers here are plain serialization; every table is fully built by
//! the core before anything is written, so a write failure never leaves a
//! partially analyzed run behind — only partially written files, which the
//! conflict check surfaces on the next run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use tracing::info;

use crate::error::{AnalyzerError, Result};
use crate::extractor::ExtractedLog;
use crate::models::{CheckoutRecord, DenialRecord, UsageSnapshot};
use crate::timestamp_parser::format_duration;

const REPORT_TAG: &str = "_LIC_Imaris_";
const STILL_CHECKED_OUT: &str = "(Still checked out)";

/// The fixed set of report files one run produces.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub processed_log: PathBuf,
    pub concurrent_usage: PathBuf,
    pub license_activity: PathBuf,
    pub total_duration_hosts: PathBuf,
    pub total_duration_users: PathBuf,
    pub denied_requests: PathBuf,
}

impl ReportPaths {
    pub fn new(input_path: &Path, output_dir: &Path) -> Self {
        let stem = input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let named = |report: &str| output_dir.join(format!("{}{}{}", stem, REPORT_TAG, report));
        Self {
            summary: named("License_Summary.txt"),
            processed_log: named("Processed_Log_File.txt"),
            concurrent_usage: named("Concurrent_License_Usage.csv"),
            license_activity: named("License_Activity.csv"),
            total_duration_hosts: named("Total_Duration_Hosts.csv"),
            total_duration_users: named("Total_Duration_Users.csv"),
            denied_requests: named("Denied_License_Requests.csv"),
        }
    }

    pub fn all(&self) -> [&PathBuf; 7] {
        [
            &self.summary,
            &self.processed_log,
            &self.concurrent_usage,
            &self.license_activity,
            &self.total_duration_hosts,
            &self.total_duration_users,
            &self.denied_requests,
        ]
    }

    /// Paths that already exist on disk and would be overwritten.
    pub fn existing(&self) -> Vec<PathBuf> {
        self.all()
            .into_iter()
            .filter(|path| path.exists())
            .cloned()
            .collect()
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|_| AnalyzerError::CannotOpenFile {
        path: path.to_path_buf(),
    })?;
    info!(path = %path.display(), "report written");
    Ok(())
}

/// Human-readable run summary: server name, start/shutdown lists, and the
/// unique product/user/host lists.
pub fn write_summary(path: &Path, input_path: &Path, log: &ExtractedLog) -> Result<()> {
    let mut out = String::new();
    out.push_str(&format!(
        "Log Data Summary For:\n{}\n\n",
        input_path.display()
    ));
    out.push_str(&format!(
        "Server Name: {}\n\n",
        log.server_name.as_deref().unwrap_or_default()
    ));

    out.push_str(&format!("Server Start(s): ({} Total)\n", log.start_rows.len()));
    for &row in &log.start_rows {
        out.push_str(&log.events[row].normalized_fields()[1..].join(" "));
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!(
        "Server Shutdown(s): ({} Total)\n",
        log.shutdown_rows.len()
    ));
    for &row in &log.shutdown_rows {
        out.push_str(&log.events[row].normalized_fields()[1..].join(" "));
        out.push('\n');
    }
    out.push('\n');

    for (label, names) in [
        ("Product(s)", log.products.names()),
        ("User(s)", log.users.names()),
        ("Host(s)", log.hosts.names()),
    ] {
        out.push_str(&format!("{}: ({} Total)\n", label, names.len()));
        for name in names {
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');
    }

    write_file(path, &out)
}

/// Reformatted copy of every extracted event, space-separated in
/// normalized field order.
pub fn write_processed_log(path: &Path, log: &ExtractedLog) -> Result<()> {
    let mut out = String::new();
    for record in &log.events {
        out.push_str(&record.normalized_fields().join(" "));
        out.push('\n');
    }
    write_file(path, &out)
}

/// Concurrent-usage CSV: one header block of five columns per product, in
/// registry order, then one row per snapshot.
pub fn write_concurrent_usage(
    path: &Path,
    products: &[String],
    snapshots: &[UsageSnapshot],
) -> Result<()> {
    let mut header = vec!["Date/Time".to_string()];
    for product in products {
        header.push(format!("{} Floating Licenses in use", product));
        header.push(format!("{} Total Licenses in use", product));
        header.push(format!("{} Floating Licenses Limit", product));
        header.push(format!("{} Reserved Licenses in use", product));
        header.push(format!("{} Reserved Licenses Limit", product));
    }

    let mut out = header.join(",");
    out.push('\n');
    for snapshot in snapshots {
        let mut cells = vec![snapshot.timestamp.clone()];
        for usage in &snapshot.products {
            cells.push(usage.in_use.clone());
            cells.push(usage.unique_users.to_string());
            cells.push(usage.limit.clone());
            cells.push(usage.reserved_in_use.clone());
            cells.push(usage.reserved_limit.clone());
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    write_file(path, &out)
}

/// Per-checkout duration CSV.
pub fn write_license_activity(path: &Path, records: &[CheckoutRecord]) -> Result<()> {
    let mut out = String::from(
        "Checkout Date/Time,Checkin Date/Time,Product,Version,User,Host,Duration (HH:MM:SS)\n",
    );
    for record in records {
        let checkin = record.checkin.as_deref().unwrap_or(STILL_CHECKED_OUT);
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            record.checkout,
            checkin,
            record.product,
            record.version,
            record.user,
            record.host,
            format_duration(record.duration)
        ));
    }
    write_file(path, &out)
}

/// Accumulated-duration matrix CSV, one row per identity (host or user),
/// one duration column per product.
pub fn write_total_durations(
    path: &Path,
    identity_label: &str,
    identities: &[String],
    products: &[String],
    totals: &[Vec<Duration>],
) -> Result<()> {
    let mut header = vec![identity_label.to_string()];
    for product in products {
        header.push(format!("{} Duration (HH:MM:SS)", product));
    }

    let mut out = header.join(",");
    out.push('\n');
    for (row, identity) in identities.iter().enumerate() {
        let mut cells = vec![identity.clone()];
        for duration in &totals[row] {
            cells.push(format_duration(*duration));
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    write_file(path, &out)
}

/// Denied-request CSV.
pub fn write_denied_requests(path: &Path, denials: &[DenialRecord]) -> Result<()> {
    let mut out = String::from("Request,Product,Version,User,Host,Reason\n");
    for denial in denials {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            denial.timestamp, denial.product, denial.version, denial.user, denial.host,
            denial.reason
        ));
    }
    write_file(path, &out)
}
