use crate::animation::ease::Ease;

/// Global progress at which the energy phase hands over to the structure phase.
pub const ENERGY_END: f64 = 0.35;
/// Global progress at which the structure phase hands over to the final form.
pub const STRUCTURE_END: f64 = 0.65;

/// The three mutually exclusive acts of the intro.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Rotating glowing orb, `[0, 0.35)`.
    Energy,
    /// Three stacked layers that split and re-converge, `[0.35, 0.65)`.
    Structure,
    /// Metallic chip with the mark and a looping sheen, `[0.65, 1]`.
    FinalForm,
}

/// A phase together with its re-normalized local progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSample {
    /// Active phase.
    pub phase: Phase,
    /// Local progress in `[0, 1]` handed to the phase renderer.
    ///
    /// For [`Phase::FinalForm`] this is already cubic-eased.
    pub local: f64,
}

impl Phase {
    /// Select the phase for global `progress` and re-normalize it.
    ///
    /// Ranges are closed on the left and open on the right, so `progress == 0.35` starts the
    /// structure phase at local `0` instead of ending the energy phase at local `1`.
    pub fn at(progress: f64) -> PhaseSample {
        let p = progress.clamp(0.0, 1.0);
        if p < ENERGY_END {
            PhaseSample {
                phase: Self::Energy,
                local: (p / ENERGY_END).clamp(0.0, 1.0),
            }
        } else if p < STRUCTURE_END {
            PhaseSample {
                phase: Self::Structure,
                local: ((p - ENERGY_END) / (STRUCTURE_END - ENERGY_END)).clamp(0.0, 1.0),
            }
        } else {
            let linear = ((p - STRUCTURE_END) / (1.0 - STRUCTURE_END)).clamp(0.0, 1.0);
            PhaseSample {
                phase: Self::FinalForm,
                local: Ease::OutCubic.apply(linear),
            }
        }
    }

    /// Global progress range `[start, end)` covered by this phase (the last one includes `1`).
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::Energy => (0.0, ENERGY_END),
            Self::Structure => (ENERGY_END, STRUCTURE_END),
            Self::FinalForm => (STRUCTURE_END, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/phase.rs"]
mod tests;
