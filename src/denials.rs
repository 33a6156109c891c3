//! Denied-request collection
//!
//! Straight projection of the DENY side table into report rows; no
//! computation beyond field selection.

use crate::extractor::ExtractedLog;
use crate::models::DenialRecord;

/// Project every DENY event into a [`DenialRecord`], preserving order.
///
/// The Reason cell reads the record's count field; DENY's count and reason
/// come from the same source column in the report-log format.
pub fn denied_requests(log: &ExtractedLog) -> Vec<DenialRecord> {
    log.denial_rows
        .iter()
        .map(|&row| {
            let record = &log.events[row];
            DenialRecord {
                timestamp: record.timestamp_display(),
                product: record.product.clone().unwrap_or_default(),
                version: record.version.clone().unwrap_or_default(),
                user: record.user.clone().unwrap_or_default(),
                host: record.host.clone().unwrap_or_default(),
                reason: record.count.clone().unwrap_or_default(),
            }
        })
        .collect()
}
