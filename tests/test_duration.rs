use chrono::Duration;
use rlm_usage::duration::{usage_durations, Identity};
use rlm_usage::extractor::{extract_events, ExtractedLog};
use rlm_usage::tokenizer::tokenize_lines;

mod common;

fn extract(lines: Vec<String>) -> ExtractedLog {
    extract_events(&tokenize_lines(&lines)).unwrap()
}

#[test]
fn test_checkout_matched_to_checkin_by_handle() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
        // Different handle: not the close for handle 41.
        common::in_line(
            "imaris", "9.7", "bob", "ws02", "1", "0", "99", "04/11", "10:15",
        ),
        common::in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "41", "04/11", "11:30",
        ),
    ];
    let report = usage_durations(&extract(lines), Identity::User).unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.checkout, "04/11/2024 10:00");
    assert_eq!(record.checkin.as_deref(), Some("04/11/2024 11:30"));
    assert_eq!(record.duration, Duration::minutes(90));
    assert_eq!(record.product, "imaris");
    assert_eq!(record.user, "alice");
    assert_eq!(record.host, "ws01");
}

#[test]
fn test_shutdown_forces_checkin() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
        common::shutdown_line("04/11", "12:00"),
        common::in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "41", "04/11", "13:00",
        ),
    ];
    let report = usage_durations(&extract(lines), Identity::User).unwrap();

    // The shutdown comes first, so it is the close - not the later IN.
    let record = &report.records[0];
    assert_eq!(record.checkin.as_deref(), Some("04/11/2024 12:00"));
    assert_eq!(record.duration, Duration::hours(2));
}

#[test]
fn test_unmatched_checkout_falls_back_to_last_timestamp() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
        common::out_line(
            "imaris", "9.7", "bob", "ws02", "2", "0", "42", "04/11", "16:00",
        ),
    ];
    let report = usage_durations(&extract(lines), Identity::User).unwrap();

    // Still checked out; duration measured to the file's last timestamped
    // event (the second OUT at 16:00).
    let record = &report.records[0];
    assert_eq!(record.checkin, None);
    assert_eq!(record.duration, Duration::hours(6));
}

#[test]
fn test_totals_accumulate_per_identity_and_product() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
        common::in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "41", "04/11", "11:00",
        ),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "42", "04/11", "14:00",
        ),
        common::in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "42", "04/11", "14:30",
        ),
    ];
    let log = extract(lines);
    let report = usage_durations(&log, Identity::User).unwrap();

    let alice = log.users.index_of("alice").unwrap();
    let imaris = log.products.index_of("imaris").unwrap();
    assert_eq!(report.totals[alice][imaris], Duration::minutes(90));
}

#[test]
fn test_user_and_host_passes_share_matching() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "imaris", "9.7", "alice", "ws01", "1", "0", "41", "04/11", "10:00",
        ),
        common::in_line(
            "imaris", "9.7", "alice", "ws01", "0", "0", "41", "04/11", "11:00",
        ),
    ];
    let log = extract(lines);
    let by_user = usage_durations(&log, Identity::User).unwrap();
    let by_host = usage_durations(&log, Identity::Host).unwrap();

    // Identical records; only the totals-matrix key differs.
    assert_eq!(by_user.records.len(), by_host.records.len());
    assert_eq!(by_user.records[0].duration, by_host.records[0].duration);

    let ws01 = log.hosts.index_of("ws01").unwrap();
    let imaris = log.products.index_of("imaris").unwrap();
    assert_eq!(by_host.totals[ws01][imaris], Duration::hours(1));
}

#[test]
fn test_round_trip_single_pair() {
    let lines = vec![
        common::MARKER.to_string(),
        common::start_line("licserv01", "04/11/2024", "09:58"),
        common::out_line(
            "productX", "1.0", "userA", "hostA", "1", "0", "5", "04/11", "10:00",
        ),
        common::in_line(
            "productX", "1.0", "userA", "hostA", "0", "0", "5", "04/11", "10:45",
        ),
    ];
    let report = usage_durations(&extract(lines), Identity::User).unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].product, "productX");
    assert_eq!(report.records[0].duration, Duration::minutes(45));
}
