/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in/out: `2t^2` below the midpoint, `1 - 2(1 - t)^2` above it.
    InOutQuad,
    /// Cubic ease-out: `1 - (1 - t)^3`.
    OutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
