use super::*;

#[test]
fn endpoints_are_fixed() {
    for ease in [Ease::Linear, Ease::InOutQuad, Ease::OutCubic] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn in_out_quad_is_continuous_at_midpoint() {
    let below = Ease::InOutQuad.apply(0.5 - 1e-9);
    let at = Ease::InOutQuad.apply(0.5);
    assert!((below - 0.5).abs() < 1e-6);
    assert_eq!(at, 0.5);
    assert_eq!(Ease::InOutQuad.apply(0.25), 0.125);
}

#[test]
fn out_cubic_front_loads_motion() {
    assert_eq!(Ease::OutCubic.apply(0.5), 0.875);
    assert!(Ease::OutCubic.apply(0.1) > 0.1);
}

#[test]
fn inputs_are_clamped() {
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
}
