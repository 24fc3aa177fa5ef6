use kurbo::{Circle, Shape};

use crate::foundation::core::{Affine, BezPath, Rect, Rgba8, Viewport};
use crate::scene::display::{DisplayList, DrawOp, Paint};
use crate::scene::particles::ParticleField;
use crate::scene::phases::{energy_orb, final_chip, morphing_stack};
use crate::timeline::phase::{Phase, PhaseSample};

/// Everything a frame depends on.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Current viewport, read at draw time.
    pub viewport: &'a Viewport,
    /// Particle field generated for the current viewport.
    pub particles: &'a ParticleField,
    /// Global progress in `[0, 1]`.
    pub progress: f64,
    /// Sheen clock reading in milliseconds.
    pub sheen_ms: f64,
    /// Mark text for the final chip.
    pub mark: &'a str,
}

/// Build the display list for one frame.
///
/// Paint order: opaque black clear, the particle field, then exactly one phase visual centred on
/// the viewport.
pub fn compose_frame(inputs: &FrameInputs<'_>) -> DisplayList {
    let vp = inputs.viewport;
    let center = vp.center();
    let mut out = DisplayList::new();

    out.push(DrawOp::Fill {
        path: Rect::new(0.0, 0.0, f64::from(vp.width), f64::from(vp.height)).to_path(0.1),
        transform: Affine::IDENTITY,
        paint: Paint::Solid(Rgba8::BLACK),
    });

    let mut stars = BezPath::new();
    for particle in inputs.particles.particles() {
        if particle.size <= 0.0 {
            continue;
        }
        let at = particle.project(center, inputs.progress);
        stars.extend(Circle::new(at, particle.size).path_elements(0.1));
    }
    if !stars.elements().is_empty() {
        out.push(DrawOp::Fill {
            path: stars,
            transform: Affine::IDENTITY,
            paint: Paint::Solid(Rgba8::rgba(255, 255, 255, 0.4)),
        });
    }

    let base = vp.base_size();
    let to_center = Affine::translate(center.to_vec2());
    let PhaseSample { phase, local } = Phase::at(inputs.progress);
    let (hero, prefix) = match phase {
        Phase::Energy => (energy_orb(base, local), to_center),
        Phase::Structure => (morphing_stack(base, local), to_center),
        Phase::FinalForm => {
            // Settling zoom: starts 30% larger and lands at 1x.
            let scale = 1.0 + (1.0 - local) * 0.3;
            (
                final_chip(base, local, inputs.sheen_ms, inputs.mark),
                to_center * Affine::scale(scale),
            )
        }
    };
    out.append_transformed(hero, prefix);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/compose.rs"]
mod tests;
