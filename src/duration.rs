//! Checkout-duration reconciliation
//!
//! For every OUT event, scans forward for the first IN event with the same
//! handle or the first SHUTDOWN (a shutdown forces every license back in),
//! whichever comes first, and computes the elapsed duration. An OUT with
//! neither before end of file is still open; its duration is computed
//! against the last timestamped event instead and the record is flagged.
//!
//! The pass runs once per grouping dimension (user, host); the matching is
//! identical, only the totals-matrix key differs.

use chrono::Duration;
use tracing::debug;

use crate::error::Result;
use crate::extractor::ExtractedLog;
use crate::models::{CheckoutRecord, EventKind, EventRecord};
use crate::registry::NameRegistry;
use crate::timestamp_parser::TimestampParser;

/// Grouping dimension for the accumulated-duration matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    User,
    Host,
}

impl Identity {
    fn key<'a>(&self, record: &'a EventRecord) -> &'a str {
        let field = match self {
            Identity::User => &record.user,
            Identity::Host => &record.host,
        };
        field.as_deref().unwrap_or_default()
    }

    pub fn registry<'a>(&self, log: &'a ExtractedLog) -> &'a NameRegistry {
        match self {
            Identity::User => &log.users,
            Identity::Host => &log.hosts,
        }
    }
}

/// Per-checkout records plus the dense accumulated-duration matrix,
/// indexed `[identity][product]` in registry order.
#[derive(Debug)]
pub struct DurationReport {
    pub records: Vec<CheckoutRecord>,
    pub totals: Vec<Vec<Duration>>,
}

/// Reconcile every OUT event against its closing event and accumulate
/// elapsed durations under the given identity.
pub fn usage_durations(log: &ExtractedLog, identity: Identity) -> Result<DurationReport> {
    let registry = identity.registry(log);
    let mut totals = vec![vec![Duration::zero(); log.products.len()]; registry.len()];
    let mut records = Vec::new();

    for (row, record) in log.events.iter().enumerate() {
        if record.kind != EventKind::Out {
            continue;
        }

        let handle = record.handle.as_deref().unwrap_or_default();
        let start = TimestampParser::parse(&record.date, &record.time)?;

        let close_row = find_close(&log.events, row, handle);
        let close = match close_row {
            Some(index) => &log.events[index],
            // No close before end of file: fall back to the last event
            // that carried a timestamp. An OUT always sets end_time_row,
            // so the fallback can never precede this record.
            None => log
                .end_time_row
                .map(|index| &log.events[index])
                .unwrap_or(record),
        };
        let end = TimestampParser::parse(&close.date, &close.time)?;
        let elapsed = end - start;

        let identity_index = registry.index_of(identity.key(record))?;
        let product_index = log
            .products
            .index_of(record.product.as_deref().unwrap_or_default())?;
        totals[identity_index][product_index] = totals[identity_index][product_index] + elapsed;

        records.push(CheckoutRecord {
            checkout: record.timestamp_display(),
            checkin: close_row.map(|index| log.events[index].timestamp_display()),
            product: record.product.clone().unwrap_or_default(),
            version: record.version.clone().unwrap_or_default(),
            user: record.user.clone().unwrap_or_default(),
            host: record.host.clone().unwrap_or_default(),
            duration: elapsed,
        });
    }

    debug!(
        checkouts = records.len(),
        identity = ?identity,
        "durations reconciled"
    );
    Ok(DurationReport { records, totals })
}

/// First strictly-later IN event sharing the handle, or first SHUTDOWN,
/// whichever comes first. Assumes handles are not reused before their
/// checkin, as the source format promises.
fn find_close(events: &[EventRecord], out_row: usize, handle: &str) -> Option<usize> {
    events
        .iter()
        .enumerate()
        .skip(out_row + 1)
        .find(|(_, event)| match event.kind {
            EventKind::In => event.handle.as_deref() == Some(handle),
            EventKind::Shutdown => true,
            _ => false,
        })
        .map(|(index, _)| index)
}
