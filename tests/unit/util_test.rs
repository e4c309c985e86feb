//! Tests for utility functions

use std::collections::HashSet;

use upload_scheduler::util::{now_ms, TaskId};

#[test]
fn test_task_id_from_str() {
    let id = TaskId::from("photo-1");
    assert_eq!(id.as_str(), "photo-1");
    assert_eq!(id.to_string(), "photo-1");
    assert_eq!(id, TaskId::new(String::from("photo-1")));
}

#[test]
fn test_task_id_serializes_as_string() {
    let id = TaskId::from("abc");
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    let back: TaskId = serde_json::from_str(r#""abc""#).unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_generated_ids_are_distinct() {
    let ids: HashSet<_> = (0..100).map(|_| TaskId::generate()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_generated_id_starts_with_timestamp() {
    let before = now_ms();
    let id = TaskId::generate();
    let (stamp, _) = id.as_str().split_once('-').unwrap();
    assert!(stamp.parse::<u128>().unwrap() >= before);
}
