use super::*;

fn glows(list: &DisplayList) -> Vec<f64> {
    list.ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Glow { blur, .. } => Some(*blur),
            _ => None,
        })
        .collect()
}

fn mark(list: &DisplayList) -> Option<&MarkOp> {
    list.ops().iter().find_map(|op| match op {
        DrawOp::Mark(m) => Some(m),
        _ => None,
    })
}

#[test]
fn rounded_square_radius_is_clamped_to_half_side() {
    let a = rounded_square(100.0, 500.0, 0.0);
    let b = rounded_square(100.0, 50.0, 0.0);
    assert_eq!(a, b);
    let bbox = a.bounding_box();
    assert!((bbox.width() - 100.0).abs() < 1e-6);
    assert!((bbox.center().y).abs() < 1e-6);

    let shifted = rounded_square(100.0, 10.0, 25.0).bounding_box();
    assert!((shifted.center().y - 25.0).abs() < 1e-6);
}

#[test]
fn energy_orb_rotates_half_a_turn_and_pulses() {
    let list = energy_orb(100.0, 1.0);
    let DrawOp::Fill {
        transform, paint, ..
    } = &list.ops()[1]
    else {
        panic!("expected fill after glow");
    };
    assert_eq!(*transform, Affine::rotate(PI));
    assert!(matches!(paint, Paint::Linear(g) if g.stops.len() == 2));

    assert_eq!(glows(&energy_orb(100.0, 0.0)), vec![40.0]);
    let blur = energy_glow_blur(0.3);
    assert!((blur - (40.0 + 3.0f64.sin() * 15.0)).abs() < 1e-12);
}

#[test]
fn stack_splits_then_reconverges() {
    assert_eq!(stack_split(0.0), 0.0);
    assert!((stack_split(0.5) - 60.0).abs() < 1e-9);
    assert!(stack_split(1.0).abs() < 1e-9);
}

#[test]
fn stack_radius_eases_from_round_to_square() {
    assert_eq!(stack_radius(200.0, 0.0), 100.0);
    assert_eq!(stack_radius(200.0, 1.0), 40.0);
    assert_eq!(stack_radius(200.0, 0.5), 70.0);
}

#[test]
fn stack_draws_three_layers_with_single_glow() {
    let list = morphing_stack(200.0, 0.5);
    let fills = list
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Fill { .. }))
        .count();
    let strokes = list
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Stroke { .. }))
        .count();
    assert_eq!(fills, 3);
    assert_eq!(strokes, 3);
    assert_eq!(glows(&list), vec![30.0]);

    // The centre layer is the only opaque one.
    let solid: Vec<Rgba8> = list
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Fill {
                paint: Paint::Solid(c),
                ..
            } => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(solid[1], Rgba8::rgb(0x11, 0x11, 0x11));
    assert!(solid[0].a < 20 && solid[2].a < 20);
}

#[test]
fn sheen_loops_every_period() {
    assert_eq!(sheen_offset(100.0, 0.0), -150.0);
    assert_eq!(sheen_offset(100.0, 1000.0), 0.0);
    assert_eq!(sheen_offset(100.0, 1000.0 + SHEEN_PERIOD_MS * 7.0), 0.0);
    assert_eq!(sheen_offset(100.0, -1000.0), 0.0);
}

#[test]
fn mark_fades_in_after_midpoint() {
    assert_eq!(mark_opacity(0.5), None);
    assert_eq!(mark_opacity(0.75), Some(0.5));
    assert_eq!(mark_opacity(1.0), Some(1.0));

    assert!(mark(&final_chip(100.0, 0.4, 0.0, "DZ")).is_none());
    let m = final_chip(100.0, 1.0, 0.0, "DZ");
    let m = mark(&m).unwrap();
    assert_eq!(m.text, "DZ");
    assert_eq!(m.opacity, 1.0);
    assert!((m.font_px - 30.0).abs() < 1e-9);
}

#[test]
fn final_chip_clips_sheen_and_glow_tracks_progress() {
    let list = final_chip(100.0, 0.0, 500.0, "DZ");
    assert!(glows(&list).is_empty());
    let ops = list.ops();
    assert!(matches!(ops[ops.len() - 3], DrawOp::PushClip { .. }));
    assert!(matches!(ops[ops.len() - 1], DrawOp::PopClip));

    assert_eq!(glows(&final_chip(100.0, 0.5, 0.0, "DZ")), vec![30.0]);
}
