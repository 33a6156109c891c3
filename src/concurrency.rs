//! Concurrent-usage accumulation
//!
//! Replays the event sequence in order, tracking per-product occupancy, and
//! emits one [`UsageSnapshot`] per OUT, IN, and SHUTDOWN event. The total
//! in-use counts are taken from the log's own self-reported count column;
//! only the unique-user counts are computed here, from a live
//! per-(user, product) checkout matrix.

use tracing::debug;

use crate::error::Result;
use crate::extractor::ExtractedLog;
use crate::models::{EventKind, EventRecord, ProductUsage, UsageSnapshot};

struct UsageState {
    /// Self-reported in-use count per product, as logged.
    in_use: Vec<String>,
    /// Computed count of distinct users holding at least one license.
    unique_users: Vec<usize>,
    /// Reserved-license in-use count per product, as logged (OUT only).
    reserved_in_use: Vec<String>,
    /// Configured limits from PRODUCT lines.
    limits: Vec<String>,
    reserved_limits: Vec<String>,
    /// Live outstanding checkouts per (user, product).
    live: Vec<Vec<usize>>,
}

impl UsageState {
    fn new(user_count: usize, product_count: usize) -> Self {
        Self {
            in_use: vec!["0".to_string(); product_count],
            unique_users: vec![0; product_count],
            reserved_in_use: vec!["0".to_string(); product_count],
            limits: vec!["0".to_string(); product_count],
            reserved_limits: vec!["0".to_string(); product_count],
            live: vec![vec![0; product_count]; user_count],
        }
    }

    fn snapshot(&self, record: &EventRecord) -> UsageSnapshot {
        let products = (0..self.in_use.len())
            .map(|product| ProductUsage {
                in_use: self.in_use[product].clone(),
                unique_users: self.unique_users[product],
                limit: self.limits[product].clone(),
                reserved_in_use: self.reserved_in_use[product].clone(),
                reserved_limit: self.reserved_limits[product].clone(),
            })
            .collect();
        UsageSnapshot {
            timestamp: record.timestamp_display(),
            products,
        }
    }
}

/// Replay the extracted events and build the concurrent-usage table.
pub fn concurrent_usage(log: &ExtractedLog) -> Result<Vec<UsageSnapshot>> {
    let mut state = UsageState::new(log.users.len(), log.products.len());
    let mut snapshots = Vec::new();

    for record in &log.events {
        match record.kind {
            EventKind::Out => {
                let product = log.products.index_of(field(&record.product))?;
                let user = log.users.index_of(field(&record.user))?;

                state.in_use[product] = field(&record.count).to_owned();
                state.live[user][product] += 1;
                if state.live[user][product] == 1 {
                    state.unique_users[product] += 1;
                }
                state.reserved_in_use[product] = field(&record.reserved).to_owned();

                snapshots.push(state.snapshot(record));
            }
            EventKind::In => {
                let product = log.products.index_of(field(&record.product))?;
                let user = log.users.index_of(field(&record.user))?;

                state.in_use[product] = field(&record.count).to_owned();

                // A log that starts mid-session can open with check-ins for
                // licenses it never saw go out; the live count stays at 0
                // instead of going negative.
                if state.live[user][product] > 0 {
                    state.live[user][product] -= 1;
                }
                if state.live[user][product] == 0 && state.unique_users[product] > 0 {
                    state.unique_users[product] -= 1;
                }

                let reported: i64 = state.in_use[product].parse().unwrap_or(0);
                if reported > 0 && state.unique_users[product] == 0 {
                    // Mid-session start: the log reports licenses still out
                    // but never said who holds them. Post a unique count of
                    // 1 for this snapshot only — the true value is >= 1 —
                    // then drop back to 0 so a later OUT doesn't count the
                    // unknown holder twice.
                    state.unique_users[product] = 1;
                    snapshots.push(state.snapshot(record));
                    state.unique_users[product] = 0;
                } else {
                    snapshots.push(state.snapshot(record));
                }
            }
            EventKind::Shutdown => {
                // The server forces every license back in. Self-reported
                // totals and computed counts drop to zero; configured
                // limits and the last reserved-in-use reading stay.
                for counts in &mut state.live {
                    counts.iter_mut().for_each(|count| *count = 0);
                }
                state.unique_users.iter_mut().for_each(|count| *count = 0);
                state
                    .in_use
                    .iter_mut()
                    .for_each(|count| *count = "0".to_string());

                snapshots.push(state.snapshot(record));
            }
            EventKind::Product => {
                let product = log.products.index_of(field(&record.product))?;
                state.limits[product] = field(&record.count).to_owned();
                state.reserved_limits[product] = field(&record.reserved).to_owned();
            }
            EventKind::Start | EventKind::Deny => {}
        }
    }

    debug!(snapshots = snapshots.len(), "concurrent usage replayed");
    Ok(snapshots)
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
