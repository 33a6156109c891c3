use rlm_usage::extractor::extract_events;
use rlm_usage::models::EventKind;
use rlm_usage::tokenizer::tokenize_lines;

mod common;

fn extract(lines: Vec<String>) -> rlm_usage::extractor::ExtractedLog {
    extract_events(&tokenize_lines(&lines)).unwrap()
}

#[test]
fn test_events_extracted_in_file_order() {
    let log = extract(common::sample_log());

    let kinds: Vec<EventKind> = log.events.iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Start,
            EventKind::Product,
            EventKind::Out,
            EventKind::Deny,
            EventKind::In,
            EventKind::Shutdown,
        ]
    );
}

#[test]
fn test_every_dated_event_is_year_stamped() {
    let log = extract(common::sample_log());

    for event in &log.events {
        if event.has_timestamp() {
            let year = event.date.rsplit('/').next().unwrap();
            assert_eq!(year.len(), 4, "date not year-stamped: {}", event.date);
        }
    }
    // PRODUCT rows carry no timestamp at all.
    assert!(!log.events[1].has_timestamp());
}

#[test]
fn test_start_event_resets_ambient_year() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
    ];
    let log = extract(lines);

    assert_eq!(log.events[1].date, "04/11/2024");
    assert_eq!(log.server_name.as_deref(), Some("licserv01"));
}

#[test]
fn test_year_marker_line_updates_year_without_event() {
    let lines = vec![
        common::MARKER.to_string(),
        "12/25/2023 00:00".to_string(),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "12/26", "08:00",
        ),
    ];
    let log = extract(lines);

    assert_eq!(log.events.len(), 1);
    assert_eq!(log.events[0].date, "12/26/2023");
}

#[test]
fn test_year_rollover_in_first_minute_of_january() {
    let lines = vec![
        common::MARKER.to_string(),
        "12/31/2023 06:00".to_string(),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "12/31", "23:59",
        ),
        common::in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "41", "01/01", "00:00",
        ),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "42", "01/02", "09:00",
        ),
    ];
    let log = extract(lines);

    assert_eq!(log.events[0].date, "12/31/2023");
    // Logged before the 2024 year-marker line, but stamped with the new year.
    assert_eq!(log.events[1].date, "01/01/2024");
    // The increment is ambient and persists for subsequent events.
    assert_eq!(log.events[2].date, "01/02/2024");
}

#[test]
fn test_registries_in_first_seen_order() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris_track", "9.7", "carol", "ws03", "1", "0", "7", "04/11", "10:00",
        ),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "8", "04/11", "10:05",
        ),
        common::out_line(
            "imaris_track", "9.7", "alice", "ws01", "2", "0", "9", "04/11", "10:10",
        ),
    ];
    let log = extract(lines);

    assert_eq!(log.products.names(), &["imaris_track", "imaris"]);
    assert_eq!(log.users.names(), &["carol", "alice"]);
    assert_eq!(log.hosts.names(), &["ws03", "ws01"]);
    assert_eq!(log.products.index_of("imaris_track").unwrap(), 0);
    assert_eq!(log.products.index_of("imaris").unwrap(), 1);
}

#[test]
fn test_side_tables_reference_event_rows() {
    let log = extract(common::sample_log());

    assert_eq!(log.start_rows, vec![0]);
    assert_eq!(log.denial_rows, vec![3]);
    assert_eq!(log.shutdown_rows, vec![5]);
    // Last timestamped event is the shutdown; PRODUCT never counts.
    assert_eq!(log.end_time_row, Some(5));
}

#[test]
fn test_short_event_row_is_fatal_with_line_number() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        "OUT imaris 9.7 1 alice ws01".to_string(),
    ];
    let err = extract_events(&tokenize_lines(&lines)).unwrap_err();
    assert_eq!(err.to_string(), "Missing data on line 3");
}

#[test]
fn test_deny_count_and_reason_share_a_column() {
    let log = extract(common::sample_log());
    let deny = &log.events[3];

    assert_eq!(deny.kind, EventKind::Deny);
    assert_eq!(deny.count.as_deref(), Some("2"));
    assert_eq!(deny.reason.as_deref(), Some("2"));
}

#[test]
fn test_unrecognized_rows_are_skipped() {
    let lines = vec![
        common::MARKER.to_string(),
        "some banner text the server prints".to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
    ];
    let log = extract(lines);
    assert_eq!(log.events.len(), 1);
}
