use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PlayerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PlayerError::decode("x").to_string().contains("decode error:"));
    assert!(
        PlayerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    let stall = PlayerError::DecodeStall {
        pending: 2,
        timeout_ms: 50,
    };
    assert!(stall.to_string().contains("2 image decode(s)"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PlayerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn stall_and_supersede_are_recoverable() {
    assert!(
        PlayerError::DecodeStall {
            pending: 1,
            timeout_ms: 1
        }
        .is_recoverable()
    );
    assert!(
        PlayerError::Superseded {
            generation: 1,
            current: 2
        }
        .is_recoverable()
    );
    assert!(!PlayerError::validation("x").is_recoverable());
}
