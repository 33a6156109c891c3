//! Event extraction
//!
//! Walks the tokenized rows and projects each recognized row into a
//! normalized [`EventRecord`] using a fixed per-kind column schema. The
//! column offsets are a compatibility contract with the RLM report-log
//! format and must not drift.
//!
//! Extraction also threads the ambient year through the scan (report-log
//! events omit the year; it arrives separately via year-marker lines and
//! START lines), populates the product/user/host registries, and keeps side
//! tables of start, shutdown, and denial events for the report writers.

use tracing::{debug, trace};

use crate::error::{AnalyzerError, Result};
use crate::models::{EventKind, EventRecord};
use crate::registry::NameRegistry;
use crate::tokenizer::split_on;

/// Semantic destination of one source column.
#[derive(Debug, Clone, Copy)]
enum Field {
    Date,
    Time,
    Product,
    Version,
    User,
    Host,
    Count,
    Handle,
    Reserved,
    Reason,
    Server,
}

/// Column layout of one event kind in the report-log row form.
struct KindSchema {
    columns: &'static [(Field, usize)],
}

impl KindSchema {
    /// Shortest row this schema can be projected from.
    fn required_width(&self) -> usize {
        self.columns
            .iter()
            .map(|&(_, column)| column + 1)
            .max()
            .unwrap_or(0)
    }
}

const OUT_SCHEMA: KindSchema = KindSchema {
    columns: &[
        (Field::Product, 1),
        (Field::Version, 2),
        (Field::User, 4),
        (Field::Host, 5),
        (Field::Count, 8),
        (Field::Reserved, 9),
        (Field::Handle, 10),
        (Field::Date, 16),
        (Field::Time, 17),
    ],
};

const IN_SCHEMA: KindSchema = KindSchema {
    columns: &[
        (Field::Product, 2),
        (Field::Version, 3),
        (Field::User, 4),
        (Field::Host, 5),
        (Field::Count, 8),
        (Field::Reserved, 9),
        (Field::Handle, 10),
        (Field::Date, 11),
        (Field::Time, 12),
    ],
};

// DENY's count and reason come from the same source column in the observed
// format; both assignments are kept rather than guessing which one is real.
const DENY_SCHEMA: KindSchema = KindSchema {
    columns: &[
        (Field::Product, 1),
        (Field::Version, 2),
        (Field::User, 3),
        (Field::Host, 4),
        (Field::Count, 7),
        (Field::Reason, 7),
        (Field::Date, 10),
        (Field::Time, 11),
    ],
};

const START_SCHEMA: KindSchema = KindSchema {
    columns: &[(Field::Server, 1), (Field::Date, 2), (Field::Time, 3)],
};

const SHUTDOWN_SCHEMA: KindSchema = KindSchema {
    columns: &[(Field::Date, 3), (Field::Time, 4)],
};

// PRODUCT rows describe the configured pool: Count is the floating-license
// limit, Reserved the reserved-license limit. No date or time columns.
const PRODUCT_SCHEMA: KindSchema = KindSchema {
    columns: &[
        (Field::Product, 1),
        (Field::Version, 2),
        (Field::Count, 4),
        (Field::Reserved, 5),
    ],
};

fn schema_for(kind: EventKind) -> &'static KindSchema {
    match kind {
        EventKind::Out => &OUT_SCHEMA,
        EventKind::In => &IN_SCHEMA,
        EventKind::Deny => &DENY_SCHEMA,
        EventKind::Start => &START_SCHEMA,
        EventKind::Shutdown => &SHUTDOWN_SCHEMA,
        EventKind::Product => &PRODUCT_SCHEMA,
    }
}

/// Everything the downstream passes need: the ordered event sequence, the
/// identity registries, and side tables referencing into the sequence.
#[derive(Debug, Default)]
pub struct ExtractedLog {
    pub events: Vec<EventRecord>,
    pub products: NameRegistry,
    pub users: NameRegistry,
    pub hosts: NameRegistry,
    /// Indices into `events` of START / SHUTDOWN / DENY records.
    pub start_rows: Vec<usize>,
    pub shutdown_rows: Vec<usize>,
    pub denial_rows: Vec<usize>,
    /// Server name from the most recent START event.
    pub server_name: Option<String>,
    /// Index of the most recently appended event carrying a date/time, used
    /// as the end-of-file timestamp when duration matching finds no close.
    pub end_time_row: Option<usize>,
}

/// Consume the tokenized rows and produce the normalized event sequence.
pub fn extract_events(rows: &[Vec<String>]) -> Result<ExtractedLog> {
    let mut log = ExtractedLog::default();
    let mut year = String::new();

    for (row_index, row) in rows.iter().enumerate() {
        // Bare year-marker line: two fields, the first a full MM/DD/YYYY
        // date. Updates the ambient year without emitting an event.
        if row.len() == 2 {
            let parts = split_on('/', &row[0]);
            if parts.len() == 3 {
                trace!(line = row_index + 1, year = %parts[2], "year marker");
                year = parts[2].clone();
            }
        }

        let Some(first) = row.first() else { continue };
        let Some(kind) = EventKind::from_token(first) else {
            continue;
        };

        let mut record = project_row(kind, row, row_index)?;
        let event_row = log.events.len();

        match kind {
            EventKind::Out | EventKind::In => {
                register_identities(&mut log, &record);
                stamp_year(&mut record, &mut year);
                log.end_time_row = Some(event_row);
            }
            EventKind::Deny => {
                register_identities(&mut log, &record);
                stamp_year(&mut record, &mut year);
                log.denial_rows.push(event_row);
                log.end_time_row = Some(event_row);
            }
            EventKind::Start => {
                // Report-log START lines carry a full date; reset the
                // ambient year from it instead of stamping.
                let parts = split_on('/', &record.date);
                if let Some(start_year) = parts.get(2) {
                    year = start_year.clone();
                }
                log.server_name = record.server.clone();
                log.start_rows.push(event_row);
                log.end_time_row = Some(event_row);
            }
            EventKind::Shutdown => {
                stamp_year(&mut record, &mut year);
                log.shutdown_rows.push(event_row);
                log.end_time_row = Some(event_row);
            }
            EventKind::Product => {
                if let Some(product) = record.product.as_deref() {
                    log.products.register(product);
                }
            }
        }

        log.events.push(record);
    }

    debug!(
        events = log.events.len(),
        products = log.products.len(),
        users = log.users.len(),
        hosts = log.hosts.len(),
        "extraction complete"
    );
    Ok(log)
}

/// Project one tokenized row through its kind's column schema. A row
/// shorter than the schema requires is a hard stop.
fn project_row(kind: EventKind, row: &[String], row_index: usize) -> Result<EventRecord> {
    let schema = schema_for(kind);
    if row.len() < schema.required_width() {
        return Err(AnalyzerError::EventData {
            line: row_index + 1,
        });
    }

    let mut record = EventRecord::new(kind);
    for &(field, column) in schema.columns {
        let value = row[column].clone();
        match field {
            Field::Date => record.date = value,
            Field::Time => record.time = value,
            Field::Product => record.product = Some(value),
            Field::Version => record.version = Some(value),
            Field::User => record.user = Some(value),
            Field::Host => record.host = Some(value),
            Field::Count => record.count = Some(value),
            Field::Handle => record.handle = Some(value),
            Field::Reserved => record.reserved = Some(value),
            Field::Reason => record.reason = Some(value),
            Field::Server => record.server = Some(value),
        }
    }
    Ok(record)
}

fn register_identities(log: &mut ExtractedLog, record: &EventRecord) {
    if let Some(product) = record.product.as_deref() {
        log.products.register(product);
    }
    if let Some(user) = record.user.as_deref() {
        log.users.register(user);
    }
    if let Some(host) = record.host.as_deref() {
        log.hosts.register(host);
    }
}

/// Append the ambient year to a record's bare "MM/DD" date.
///
/// Events logged in the first minute after midnight on Jan 1 land in the
/// file before the year-marker line announcing the new year; the year is
/// incremented up front for them, and stays incremented for every record
/// after.
pub(crate) fn stamp_year(record: &mut EventRecord, year: &mut String) {
    if record.date == "01/01" {
        let time_parts = split_on(':', &record.time);
        if time_parts.len() >= 2 && time_parts[0] == "00" && time_parts[1] == "00" {
            let next = year.parse::<i32>().unwrap_or(0) + 1;
            *year = next.to_string();
        }
    }
    record.date.push('/');
    record.date.push_str(year);
}

/// Legacy per-event logs prefix product versions with "v"; report logs do
/// not. Kept for the legacy-cleanup path even though ISV input is rejected
/// up front.
#[allow(dead_code)]
pub(crate) fn check_product_version(version: &str, line: usize) -> Result<()> {
    if version.starts_with('v') {
        Ok(())
    } else {
        Err(AnalyzerError::InvalidProductVersion { line })
    }
}
