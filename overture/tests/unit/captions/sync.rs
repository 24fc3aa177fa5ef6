use super::*;

#[test]
fn state_follows_window_and_exit_fade() {
    let c = CaptionDescriptor::new(0.2, 0.4);
    assert_eq!(caption_state(&c, 0.1), CaptionState::Idle);
    assert_eq!(caption_state(&c, 0.2), CaptionState::Active);
    assert_eq!(caption_state(&c, 0.3), CaptionState::Active);
    assert_eq!(caption_state(&c, 0.4), CaptionState::Active);
    assert_eq!(caption_state(&c, 0.45), CaptionState::Exiting);
    assert_eq!(caption_state(&c, 0.6), CaptionState::Idle);
}

#[test]
fn repeated_evaluation_is_idempotent() {
    let caps = vec![
        CaptionDescriptor::new(0.0, 0.3),
        CaptionDescriptor::new(0.25, 0.6),
        CaptionDescriptor::new(0.7, 1.0),
    ];
    let a = sync_captions(&caps, 0.28);
    let b = sync_captions(&caps, 0.28);
    assert_eq!(a, b);
    assert_eq!(
        a,
        vec![CaptionState::Active, CaptionState::Active, CaptionState::Idle]
    );
}

#[test]
fn never_reactivates_on_monotonic_progress() {
    let c = CaptionDescriptor::new(0.2, 0.4);
    let mut left = false;
    for i in 0..=1000 {
        let p = f64::from(i) / 1000.0;
        let s = caption_state(&c, p);
        if left {
            assert_ne!(s, CaptionState::Active, "reactivated at {p}");
        }
        if p > c.end {
            left = true;
        }
    }
}

#[test]
fn validation_rejects_bad_windows() {
    assert!(CaptionDescriptor::new(0.5, 0.4).validate().is_err());
    assert!(CaptionDescriptor::new(-0.1, 0.4).validate().is_err());
    assert!(CaptionDescriptor::new(0.1, f64::NAN).validate().is_err());
    assert!(CaptionDescriptor::new(0.1, 0.1).validate().is_ok());
}

#[test]
fn deserializes_without_text() {
    let c: CaptionDescriptor = serde_json::from_str(r#"{"start":0.1,"end":0.2}"#).unwrap();
    assert_eq!(c, CaptionDescriptor::new(0.1, 0.2));
    assert_eq!(
        serde_json::to_string(&CaptionState::Exiting).unwrap(),
        "\"exiting\""
    );
}
