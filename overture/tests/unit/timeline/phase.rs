use super::*;

#[test]
fn energy_covers_first_35_percent() {
    let s = Phase::at(0.0);
    assert_eq!(s.phase, Phase::Energy);
    assert_eq!(s.local, 0.0);

    let s = Phase::at(0.175);
    assert_eq!(s.phase, Phase::Energy);
    assert!((s.local - 0.5).abs() < 1e-12);

    let s = Phase::at(0.349_999_9);
    assert_eq!(s.phase, Phase::Energy);
    assert!(s.local < 1.0);
    assert!(s.local > 0.999_999);
}

#[test]
fn structure_starts_exactly_at_boundary() {
    let s = Phase::at(0.35);
    assert_eq!(s.phase, Phase::Structure);
    assert_eq!(s.local, 0.0);

    let s = Phase::at(0.5);
    assert_eq!(s.phase, Phase::Structure);
    assert!((s.local - 0.5).abs() < 1e-12);

    assert_eq!(Phase::at(0.649_999).phase, Phase::Structure);
}

#[test]
fn final_form_is_eased_and_reaches_one() {
    let s = Phase::at(0.65);
    assert_eq!(s.phase, Phase::FinalForm);
    assert_eq!(s.local, 0.0);

    let s = Phase::at(1.0);
    assert_eq!(s.phase, Phase::FinalForm);
    assert_eq!(s.local, 1.0);

    // Halfway through the final act the cubic ease-out is already at 87.5%.
    let s = Phase::at(0.825);
    assert!((s.local - 0.875).abs() < 1e-9);
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(Phase::at(-0.5).phase, Phase::Energy);
    assert_eq!(Phase::at(1.5).local, 1.0);
}

#[test]
fn ranges_tile_the_timeline() {
    assert_eq!(Phase::Energy.range().1, Phase::Structure.range().0);
    assert_eq!(Phase::Structure.range().1, Phase::FinalForm.range().0);
    assert_eq!(Phase::FinalForm.range().1, 1.0);
}
