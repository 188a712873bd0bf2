//! Tests for identifier newtypes

use core_kernel::RequestId;
use uuid::Uuid;

#[test]
fn request_id_serializes_as_bare_uuid() {
    let uuid = Uuid::new_v4();
    let id = RequestId::from(uuid);

    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", uuid));

    let back: RequestId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn request_id_v7_is_time_ordered() {
    let first = RequestId::new_v7();
    let second = RequestId::new_v7();
    assert!(first.as_uuid() <= second.as_uuid());
}

#[test]
fn request_id_roundtrips_through_display() {
    let id = RequestId::new();
    let parsed: RequestId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}
