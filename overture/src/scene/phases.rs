//! The three phase renderers.
//!
//! Each renderer is a pure function of its local progress `t` in `[0, 1]` and the hero
//! `base` size. Ops are emitted in a coordinate space centred on the viewport; the caller places
//! them on screen.

use std::f64::consts::PI;

use kurbo::{RoundedRect, Shape};

use crate::animation::ease::Ease;
use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::scene::display::{DisplayList, DrawOp, LinearGradient, MarkOp, Paint};

/// Period of the sheen sweep across the final chip.
pub const SHEEN_PERIOD_MS: f64 = 2000.0;

const PATH_TOLERANCE: f64 = 0.1;
const CHIP_RADIUS: f64 = 30.0;
const STACK_MIN_RADIUS: f64 = 40.0;
const STACK_MAX_SPLIT: f64 = 60.0;

/// Rounded rectangle of side `side` whose top-left corner sits at `(-side/2, -side/2 + dy)`.
///
/// The radius is clamped to `[0, side/2]`, like canvas `roundRect`.
pub(crate) fn rounded_square(side: f64, radius: f64, dy: f64) -> BezPath {
    let half = side / 2.0;
    let r = radius.clamp(0.0, half.max(0.0));
    RoundedRect::new(-half, -half + dy, half, half + dy, r).to_path(PATH_TOLERANCE)
}

fn diagonal_gradient(base: f64, stops: Vec<Rgba8>) -> Paint {
    Paint::Linear(LinearGradient {
        start: Point::new(-base, -base),
        end: Point::new(base, base),
        stops,
    })
}

/// Phase 1: a rotating orb with a blue-to-pink gradient and a pulsing violet glow.
pub fn energy_orb(base: f64, t: f64) -> DisplayList {
    let transform = Affine::rotate(t * PI);
    let path = rounded_square(base, base / 2.0, 0.0);

    let mut out = DisplayList::new();
    out.push(DrawOp::Glow {
        path: path.clone(),
        transform,
        color: Rgba8::rgb(0xbf, 0x5a, 0xf2),
        blur: energy_glow_blur(t),
    });
    out.push(DrawOp::Fill {
        path,
        transform,
        paint: diagonal_gradient(
            base,
            vec![Rgba8::rgb(0x29, 0x97, 0xff), Rgba8::rgb(0xff, 0x37, 0x5f)],
        ),
    });
    out
}

/// Glow blur of the energy orb: oscillates around 40 with amplitude 15.
pub fn energy_glow_blur(t: f64) -> f64 {
    40.0 + (t * 10.0).sin() * 15.0
}

/// Vertical distance between stacked layers: grows then shrinks back to zero.
pub fn stack_split(t: f64) -> f64 {
    (t * PI).sin() * STACK_MAX_SPLIT
}

/// Corner radius of the stacked layers, easing from near-circular to near-square.
pub fn stack_radius(base: f64, t: f64) -> f64 {
    let half = base / 2.0;
    half - (half - STACK_MIN_RADIUS) * Ease::InOutQuad.apply(t)
}

/// Phase 2: three layers that separate and re-converge while slowly rotating.
pub fn morphing_stack(base: f64, t: f64) -> DisplayList {
    let transform = Affine::rotate(t * PI * 0.2);
    let radius = stack_radius(base, t);
    let split = stack_split(t);
    let outline = Rgba8::rgba(255, 255, 255, 0.3);

    let mut out = DisplayList::new();
    for i in [-1.0, 0.0, 1.0] {
        let path = rounded_square(base, radius, i * split);
        let center = i == 0.0;
        if center {
            out.push(DrawOp::Glow {
                path: path.clone(),
                transform,
                color: Rgba8::rgba(41, 151, 255, 0.4),
                blur: 30.0,
            });
        }
        let fill = if center {
            Rgba8::rgb(0x11, 0x11, 0x11)
        } else {
            Rgba8::rgba(255, 255, 255, 0.05)
        };
        out.push(DrawOp::Fill {
            path: path.clone(),
            transform,
            paint: Paint::Solid(fill),
        });
        out.push(DrawOp::Stroke {
            path,
            transform,
            color: outline,
            width: 1.0,
        });
    }
    out
}

/// Horizontal position of the sheen band for a sheen clock reading.
pub fn sheen_offset(base: f64, sheen_ms: f64) -> f64 {
    let phase = sheen_ms.rem_euclid(SHEEN_PERIOD_MS) / SHEEN_PERIOD_MS;
    phase * base * 3.0 - base * 1.5
}

/// Opacity of the mark for eased local progress `t`: hidden until halfway, then ramps to 1.
pub fn mark_opacity(t: f64) -> Option<f64> {
    (t > 0.5).then(|| ((t - 0.5) * 2.0).min(1.0))
}

/// Phase 3: metallic chip with an ambient glow, the mark and a looping sheen.
pub fn final_chip(base: f64, t: f64, sheen_ms: f64, mark: &str) -> DisplayList {
    let transform = Affine::IDENTITY;
    let half = base / 2.0;
    let chip = rounded_square(base, CHIP_RADIUS, 0.0);

    let mut out = DisplayList::new();
    let glow = 60.0 * t;
    if glow > 0.0 {
        out.push(DrawOp::Glow {
            path: chip.clone(),
            transform,
            color: Rgba8::rgba(255, 255, 255, 0.15),
            blur: glow,
        });
    }
    out.push(DrawOp::Fill {
        path: chip.clone(),
        transform,
        paint: diagonal_gradient(
            base,
            vec![
                Rgba8::rgb(0x22, 0x22, 0x22),
                Rgba8::rgb(0x44, 0x44, 0x44),
                Rgba8::rgb(0x11, 0x11, 0x11),
            ],
        ),
    });
    out.push(DrawOp::Stroke {
        path: chip.clone(),
        transform,
        color: Rgba8::rgb(0x66, 0x66, 0x66),
        width: 2.0,
    });

    if let Some(opacity) = mark_opacity(t) {
        out.push(DrawOp::Mark(MarkOp {
            text: mark.to_string(),
            font_px: base * 0.3,
            color: Rgba8::WHITE,
            opacity,
            glow_blur: 10.0,
            transform,
        }));
    }

    let x = sheen_offset(base, sheen_ms);
    let mut band = BezPath::new();
    band.move_to((x, -half));
    band.line_to((x + 50.0, -half));
    band.line_to((x - 20.0, half));
    band.line_to((x - 70.0, half));
    band.close_path();

    out.push(DrawOp::PushClip {
        path: chip,
        transform,
    });
    out.push(DrawOp::Fill {
        path: band,
        transform,
        paint: Paint::Solid(Rgba8::rgba(255, 255, 255, 0.2)),
    });
    out.push(DrawOp::PopClip);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/phases.rs"]
mod tests;
