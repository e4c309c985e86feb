//! Tests for configuration validation

use upload_scheduler::config::{CloudinaryConfig, SchedulerConfig, DEFAULT_MAX_CONCURRENT};

#[test]
fn test_scheduler_config_validation() {
    assert!(SchedulerConfig::new(4).validate().is_ok());
    assert!(SchedulerConfig::new(0).validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let cfg = SchedulerConfig::from_json_str(r#"{"max_concurrent": 3}"#).unwrap();
    assert_eq!(cfg.max_concurrent, 3);
}

#[test]
fn test_scheduler_config_rejects_zero_json() {
    let err = SchedulerConfig::from_json_str(r#"{"max_concurrent": 0}"#).unwrap_err();
    assert!(err.contains("greater than 0"));
}

#[test]
fn test_scheduler_config_rejects_garbage() {
    let err = SchedulerConfig::from_json_str("max_concurrent = 3").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_scheduler_config_serde_roundtrip_default() {
    let json = serde_json::to_string(&SchedulerConfig::default()).unwrap();
    assert_eq!(json, format!(r#"{{"max_concurrent":{DEFAULT_MAX_CONCURRENT}}}"#));
}

#[test]
fn test_cloudinary_config_new() {
    let cfg = CloudinaryConfig::new("demo", "unsigned");
    assert_eq!(cfg.folder, "image-uploader");
    assert_eq!(
        cfg.upload_url(),
        "https://api.cloudinary.com/v1_1/demo/image/upload"
    );
}
