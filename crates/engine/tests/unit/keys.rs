//! Key, request and fault log tests.

use cachesim_core::common::{ConsistencyFault, FaultLog, KeyKind, KeyValue, Request, SimKey};

#[test]
fn integer_keys_offset_and_report_int_kind() {
    assert_eq!(7u64.kind(), KeyKind::Int);
    assert_eq!(7u64.offset(3), Some(10));
}

#[test]
fn integer_offset_wraps_at_max() {
    assert_eq!(u64::MAX.offset(1), Some(0));
}

#[test]
fn text_keys_cannot_be_offset() {
    let key = String::from("/index.html");
    assert_eq!(key.kind(), KeyKind::Text);
    assert_eq!(key.offset(1), None);
}

#[test]
fn key_value_follows_its_variant() {
    let int = KeyValue::from(41);
    let text = KeyValue::from("obj");
    assert_eq!(int.kind(), KeyKind::Int);
    assert_eq!(text.kind(), KeyKind::Text);
    assert_eq!(int.offset(1), Some(KeyValue::Int(42)));
    assert_eq!(text.offset(1), None);
    assert_eq!(int.to_string(), "41");
    assert_eq!(text.to_string(), "obj");
}

#[test]
fn request_sequence_numbers_in_order() {
    let requests = Request::sequence([5u64, 6, 7]);
    let indices: Vec<u64> = requests.iter().map(|r| r.sequence_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(requests.iter().all(|r| r.size == 1));
}

#[test]
fn request_at_sets_sequence_index() {
    let request = Request::new(9u64, 4096).at(12);
    assert_eq!(request.key, 9);
    assert_eq!(request.size, 4096);
    assert_eq!(request.sequence_index, 12);
}

#[test]
fn key_kind_display() {
    assert_eq!(KeyKind::Int.to_string(), "int");
    assert_eq!(KeyKind::Text.to_string(), "text");
}

#[test]
fn fault_log_tracks_pending_faults() {
    let mut log = FaultLog::new();
    assert!(log.is_empty());

    log.record(ConsistencyFault::EvictFromEmpty { policy: "fifo" });
    log.absorb(vec![ConsistencyFault::MissingVictim {
        policy: "cascade",
        tier: "admission",
        occupancy: 3,
        capacity: 2,
    }]);
    assert_eq!(log.len(), 2);

    let drained = log.drain();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0], ConsistencyFault::EvictFromEmpty { policy: "fifo" });
    assert!(log.is_empty());
}
