#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

pub const MARKER: &str = "RLM Report Log Format 3";

// Line builders matching the report-log column layouts. Filler columns the
// analyzer never reads are "x".

pub fn out_line(
    product: &str,
    version: &str,
    user: &str,
    host: &str,
    count: &str,
    reserved: &str,
    handle: &str,
    date: &str,
    time: &str,
) -> String {
    format!(
        "OUT {product} {version} 1 {user} {host} x x {count} {reserved} {handle} x x x x x {date} {time}"
    )
}

pub fn in_line(
    product: &str,
    version: &str,
    user: &str,
    host: &str,
    count: &str,
    reserved: &str,
    handle: &str,
    date: &str,
    time: &str,
) -> String {
    format!("IN x {product} {version} {user} {host} x x {count} {reserved} {handle} {date} {time}")
}

pub fn deny_line(
    product: &str,
    version: &str,
    user: &str,
    host: &str,
    reason: &str,
    date: &str,
    time: &str,
) -> String {
    format!("DENY {product} {version} {user} {host} x x {reason} x x {date} {time}")
}

pub fn start_line(server: &str, full_date: &str, time: &str) -> String {
    format!("START {server} {full_date} {time}")
}

pub fn shutdown_line(date: &str, time: &str) -> String {
    format!("SHUTDOWN x x {date} {time}")
}

pub fn product_line(product: &str, version: &str, limit: &str, reserved_limit: &str) -> String {
    format!("PRODUCT {product} {version} x {limit} {reserved_limit}")
}

/// A small but complete report log: one server session with a checkout,
/// a checkin, a denial, and a shutdown.
pub fn sample_log() -> Vec<String> {
    vec![
        MARKER.to_string(),
        start_line("licserv01", "04/11/2024", "09:58"),
        product_line("imaris", "9.7", "10", "2"),
        out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
        deny_line("imaris", "9.7", "bob", "ws02", "2", "04/11", "10:30"),
        in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "41", "04/11", "11:00",
        ),
        shutdown_line("04/11", "18:00"),
    ]
}

pub fn write_log(dir: &Path, filename: &str, lines: &[String]) -> Result<PathBuf> {
    let path = dir.join(filename);
    fs::write(&path, lines.join("\n"))?;
    Ok(path)
}

pub fn setup_dirs() -> Result<(TempDir, TempDir)> {
    Ok((TempDir::new()?, TempDir::new()?))
}
