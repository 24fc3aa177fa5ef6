use crate::foundation::error::{OvertureError, OvertureResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute 0-based frame index in export timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` in export timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> OvertureResult<Self> {
        if start.0 > end.0 {
            return Err(OvertureError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> OvertureResult<Self> {
        if den == 0 {
            return Err(OvertureError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(OvertureError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of frame `frame` in milliseconds, relative to frame 0.
    pub fn frame_to_ms(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * self.frame_duration_ms()
    }

    /// Number of frames needed to reach `ms`, including the frame that lands on or after it.
    pub fn frames_covering_ms(self, ms: f64) -> u64 {
        let frames = (ms.max(0.0) / self.frame_duration_ms()).ceil() as u64;
        frames + 1
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Logical window size plus device pixel ratio.
///
/// All scene geometry is authored in logical pixels; the rasterizer scales by
/// `device_pixel_ratio` so strokes stay crisp on high-density displays.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    /// Device pixels per logical pixel.
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f64,
}

fn default_dpr() -> f64 {
    1.0
}

impl Viewport {
    /// Viewport with a device pixel ratio of `1.0`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Return a copy with `dpr` as the device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }

    /// Validate dimensions and pixel ratio.
    pub fn validate(&self) -> OvertureResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OvertureError::validation(
                "viewport width/height must be non-zero",
            ));
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(OvertureError::validation(
                "viewport device_pixel_ratio must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Backing surface size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        let dpr = self.device_pixel_ratio;
        let w = (f64::from(self.width) * dpr).round().max(1.0) as u32;
        let h = (f64::from(self.height) * dpr).round().max(1.0) as u32;
        (w, h)
    }

    /// Centre of the viewport in logical pixels.
    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Side length of the hero shape: 35% of the shorter viewport edge.
    pub fn base_size(&self) -> f64 {
        f64::from(self.width.min(self.height)) * 0.35
    }
}

/// Straight-alpha RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour from channels and a CSS-style alpha in `[0, 1]`.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
