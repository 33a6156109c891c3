//! Core Data Models
//!
//! This module defines the data structures flowing through the analysis
//! pipeline, from normalized log events to the report tables.
//!
//! ## Data Flow
//!
//! 1. **Events**: [`EventRecord`] - one normalized record per recognized log
//!    row, produced by the extractor and immutable afterward
//! 2. **Concurrency**: [`UsageSnapshot`] / [`ProductUsage`] - point-in-time
//!    occupancy, one snapshot per relevant event
//! 3. **Durations**: [`CheckoutRecord`] - one matched checkout/checkin pair
//!    (or open checkout) per OUT event
//! 4. **Denials**: [`DenialRecord`] - denied license requests
//! 5. **Summary**: [`RunSummary`] - counts and output paths for the CLI
//!
//! Not every event kind populates every [`EventRecord`] field; the optional
//! fields mirror the per-kind column schemas of the report-log format.

use chrono::Duration;
use serde::Serialize;

/// Event kinds recognized in the report log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Out,
    In,
    Deny,
    Start,
    Shutdown,
    Product,
}

impl EventKind {
    /// Classify the leading field of a tokenized row.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "OUT" => Some(Self::Out),
            "IN" => Some(Self::In),
            "DENY" => Some(Self::Deny),
            "START" => Some(Self::Start),
            "SHUTDOWN" => Some(Self::Shutdown),
            "PRODUCT" => Some(Self::Product),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Out => "OUT",
            Self::In => "IN",
            Self::Deny => "DENY",
            Self::Start => "START",
            Self::Shutdown => "SHUTDOWN",
            Self::Product => "PRODUCT",
        }
    }
}

/// A normalized log event.
///
/// `date` carries a 4-digit year suffix by the time extraction of the row
/// completes (the source log omits the year on everything but START lines).
/// PRODUCT lines carry no date or time at all; both stay empty for them.
///
/// `count` holds the self-reported in-use count on OUT/IN, the request
/// count on DENY, and the floating-license limit on PRODUCT. `reserved`
/// holds the reserved-in-use count on OUT/IN and the reserved limit on
/// PRODUCT. DENY's `reason` comes from the same source column as its
/// `count`; the duplication is inherited from the log format.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub kind: EventKind,
    pub date: String,
    pub time: String,
    pub product: Option<String>,
    pub version: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub count: Option<String>,
    pub handle: Option<String>,
    pub reserved: Option<String>,
    pub reason: Option<String>,
    pub server: Option<String>,
}

impl EventRecord {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            date: String::new(),
            time: String::new(),
            product: None,
            version: None,
            user: None,
            host: None,
            count: None,
            handle: None,
            reserved: None,
            reason: None,
            server: None,
        }
    }

    pub fn has_timestamp(&self) -> bool {
        !self.date.is_empty()
    }

    /// "MM/DD/YYYY HH:MM" display form used throughout the report tables.
    pub fn timestamp_display(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    /// The record's fields in their normalized per-kind order, used when
    /// re-rendering the processed log file.
    pub fn normalized_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.kind.label()];
        match self.kind {
            EventKind::Out | EventKind::In => {
                fields.push(&self.date);
                fields.push(&self.time);
                fields.push(opt(&self.product));
                fields.push(opt(&self.version));
                fields.push(opt(&self.user));
                fields.push(opt(&self.host));
                fields.push(opt(&self.count));
                fields.push(opt(&self.handle));
                fields.push(opt(&self.reserved));
            }
            EventKind::Deny => {
                fields.push(&self.date);
                fields.push(&self.time);
                fields.push(opt(&self.product));
                fields.push(opt(&self.version));
                fields.push(opt(&self.user));
                fields.push(opt(&self.host));
                fields.push(opt(&self.count));
                fields.push(opt(&self.reason));
            }
            EventKind::Start => {
                fields.push(&self.date);
                fields.push(&self.time);
                fields.push(opt(&self.server));
            }
            EventKind::Shutdown => {
                fields.push(&self.date);
                fields.push(&self.time);
            }
            EventKind::Product => {
                fields.push(opt(&self.product));
                fields.push(opt(&self.version));
                fields.push(opt(&self.count));
                fields.push(opt(&self.reserved));
            }
        }
        fields
    }
}

fn opt(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or_default()
}

/// Per-product block of one concurrency snapshot. The in-use counts are
/// kept as the log's own display strings; only the unique-user count is
/// computed by the replay.
#[derive(Debug, Clone)]
pub struct ProductUsage {
    pub in_use: String,
    pub unique_users: usize,
    pub limit: String,
    pub reserved_in_use: String,
    pub reserved_limit: String,
}

/// One row of the concurrent-usage table: a timestamp plus one
/// [`ProductUsage`] block per registered product, in registry order.
#[derive(Debug, Clone)]
pub struct UsageSnapshot {
    pub timestamp: String,
    pub products: Vec<ProductUsage>,
}

/// One row of the per-checkout duration table. `checkin` is `None` when no
/// matching IN or SHUTDOWN was found before end of file; the duration is
/// then computed against the last timestamped event instead.
#[derive(Debug, Clone)]
pub struct CheckoutRecord {
    pub checkout: String,
    pub checkin: Option<String>,
    pub product: String,
    pub version: String,
    pub user: String,
    pub host: String,
    pub duration: Duration,
}

/// One denied license request.
#[derive(Debug, Clone)]
pub struct DenialRecord {
    pub timestamp: String,
    pub product: String,
    pub version: String,
    pub user: String,
    pub host: String,
    pub reason: String,
}

/// Run outcome reported by the CLI, either as colored text or as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(rename = "inputFile")]
    pub input_file: String,
    #[serde(rename = "serverName")]
    pub server_name: String,
    pub events: usize,
    pub products: usize,
    pub users: usize,
    pub hosts: usize,
    pub denials: usize,
    #[serde(rename = "reportsWritten")]
    pub reports_written: Vec<String>,
}
