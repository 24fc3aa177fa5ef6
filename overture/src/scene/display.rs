use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::math::lerp;

/// Linear gradient with evenly spaced colour stops, in the shape's local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Point where the first stop sits.
    pub start: Point,
    /// Point where the last stop sits.
    pub end: Point,
    /// Stops at offsets `0, 1/(n-1), ..., 1`.
    pub stops: Vec<Rgba8>,
}

impl LinearGradient {
    /// Straight-alpha colour at gradient parameter `t` (clamped, pad extend).
    pub fn color_at(&self, t: f64) -> Rgba8 {
        match self.stops.as_slice() {
            [] => Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
            [only] => *only,
            stops => {
                let t = t.clamp(0.0, 1.0);
                let segments = (stops.len() - 1) as f64;
                let pos = t * segments;
                let i = (pos.floor() as usize).min(stops.len() - 2);
                let local = pos - i as f64;
                let (a, b) = (stops[i], stops[i + 1]);
                let mix = |x: u8, y: u8| -> u8 {
                    lerp(f64::from(x), f64::from(y), local)
                        .round()
                        .clamp(0.0, 255.0) as u8
                };
                Rgba8 {
                    r: mix(a.r, b.r),
                    g: mix(a.g, b.g),
                    b: mix(a.b, b.b),
                    a: mix(a.a, b.a),
                }
            }
        }
    }

    /// Gradient parameter of `p`: its projection onto the start-end axis.
    pub fn param_at(&self, p: Point) -> f64 {
        let axis = self.end - self.start;
        let len2 = axis.hypot2();
        if len2 <= f64::EPSILON {
            return 0.0;
        }
        (p - self.start).dot(axis) / len2
    }
}

/// Fill paint for a shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Uniform colour.
    Solid(Rgba8),
    /// Linear gradient.
    Linear(LinearGradient),
}

/// The mark glyphs drawn on the final chip.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkOp {
    /// Text to draw, centred on the local origin.
    pub text: String,
    /// Font size in logical pixels.
    pub font_px: f64,
    /// Fill colour.
    pub color: Rgba8,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
    /// Glow blur (canvas `shadowBlur`) in logical pixels; `0` disables the glow.
    pub glow_blur: f64,
    /// Local-to-viewport transform.
    pub transform: Affine,
}

/// One drawing instruction, expressed in logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a path.
    Fill {
        /// Shape outline in local coordinates.
        path: BezPath,
        /// Local-to-viewport transform.
        transform: Affine,
        /// Fill paint.
        paint: Paint,
    },
    /// Stroke a path with a solid colour.
    Stroke {
        /// Shape outline in local coordinates.
        path: BezPath,
        /// Local-to-viewport transform.
        transform: Affine,
        /// Stroke colour.
        color: Rgba8,
        /// Line width in local units.
        width: f64,
    },
    /// Soft shadow of a path, painted beneath whatever follows.
    ///
    /// Matches canvas `shadowBlur`: a Gaussian with standard deviation `blur / 2`.
    Glow {
        /// Shape outline in local coordinates.
        path: BezPath,
        /// Local-to-viewport transform.
        transform: Affine,
        /// Shadow colour.
        color: Rgba8,
        /// Blur amount in logical pixels.
        blur: f64,
    },
    /// Restrict following ops to the inside of a path until the matching [`DrawOp::PopClip`].
    PushClip {
        /// Clip outline in local coordinates.
        path: BezPath,
        /// Local-to-viewport transform.
        transform: Affine,
    },
    /// End the innermost clip.
    PopClip,
    /// Draw the mark text.
    Mark(MarkOp),
}

impl DrawOp {
    fn prepend(&mut self, prefix: Affine) {
        match self {
            Self::Fill { transform, .. }
            | Self::Stroke { transform, .. }
            | Self::Glow { transform, .. }
            | Self::PushClip { transform, .. } => *transform = prefix * *transform,
            Self::Mark(mark) => mark.transform = prefix * mark.transform,
            Self::PopClip => {}
        }
    }
}

/// Ordered drawing instructions for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one op.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Append all ops of `other`, placing them under `prefix`.
    pub fn append_transformed(&mut self, other: DisplayList, prefix: Affine) {
        self.ops.extend(other.ops.into_iter().map(|mut op| {
            op.prepend(prefix);
            op
        }));
    }

    /// Borrow the ops in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Return `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/display.rs"]
mod tests;
