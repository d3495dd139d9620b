use super::*;

#[test]
fn json_fills_missing_keys_with_defaults() {
    let opts = RendererOpts::from_json_str(r#"{ "cache_frames": true }"#).unwrap();
    assert!(opts.cache_frames);
    assert!(!opts.visibility_tracking);
    assert!(opts.clear_frames_on_prepare);
    assert_eq!(opts.decode_timeout(), Duration::from_secs(10));
}

#[test]
fn json_rejects_zero_timeout_and_bad_types() {
    assert!(matches!(
        RendererOpts::from_json_str(r#"{ "decode_timeout_ms": 0 }"#),
        Err(PlayerError::Validation(_))
    ));
    assert!(matches!(
        RendererOpts::from_json_str(r#"{ "cache_frames": "yes" }"#),
        Err(PlayerError::Serde(_))
    ));
}
