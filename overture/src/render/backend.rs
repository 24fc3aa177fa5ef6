/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. Intro frames are opaque (the scene clears to black), so the
/// bytes can also be written out directly as straight RGBA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            match u16::from(px[3]) {
                0 => px[..3].fill(0),
                255 => {}
                a => {
                    for c in &mut px[..3] {
                        *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
