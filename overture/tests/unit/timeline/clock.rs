use super::*;

#[test]
fn first_tick_anchors_at_zero_progress() {
    let mut clock = ProgressClock::new();
    assert_eq!(clock.start_ms(), None);
    assert_eq!(clock.tick(1234.0), 0.0);
    assert_eq!(clock.start_ms(), Some(1234.0));
}

#[test]
fn progress_is_elapsed_over_duration() {
    let mut clock = ProgressClock::new();
    clock.tick(100.0);
    assert_eq!(clock.tick(100.0 + 4250.0), 0.5);
    assert_eq!(clock.elapsed_ms(100.0 + 4250.0), 4250.0);
}

#[test]
fn progress_saturates_at_one() {
    let mut clock = ProgressClock::new();
    clock.tick(0.0);
    assert!(!clock.is_complete());
    assert_eq!(clock.tick(DURATION_MS), 1.0);
    assert_eq!(clock.tick(DURATION_MS * 3.0), 1.0);
    assert!(clock.is_complete());
}

#[test]
fn progress_never_decreases() {
    let mut clock = ProgressClock::new();
    clock.tick(0.0);
    let p = clock.tick(2000.0);
    assert_eq!(clock.tick(1000.0), p);
}
