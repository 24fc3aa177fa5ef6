//! Mark text rasterization through `usvg`/`resvg`.
//!
//! The mark is laid out as a single bold, centred SVG `<text>` element and resolved against the
//! system font database, so no font file has to ship with a configuration.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{OvertureError, OvertureResult};

const MAX_CACHED: usize = 64;
const MAX_DIM: u32 = 8192;

/// A rasterized mark, premultiplied RGBA8, with the text centred in the buffer.
#[derive(Clone, Debug)]
pub(crate) struct MarkRaster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MarkKey {
    text: String,
    color: Rgba8,
    // Font size in quarter device pixels.
    size_q: u32,
}

/// Process-wide font database, loaded once.
fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            tracing::warn!("no system fonts found; the mark will render empty");
        } else {
            tracing::debug!(faces = db.len(), "loaded system fonts for mark text");
        }
        Arc::new(db)
    })
    .clone()
}

/// Rasterizes and caches mark text by content, colour and device font size.
#[derive(Default)]
pub(crate) struct MarkRasterizer {
    cache: HashMap<MarkKey, MarkRaster>,
}

impl MarkRasterizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rasterize `text` at `font_px` device pixels.
    pub(crate) fn raster(
        &mut self,
        text: &str,
        color: Rgba8,
        font_px: f64,
    ) -> OvertureResult<MarkRaster> {
        if !font_px.is_finite() || font_px <= 0.0 {
            return Err(OvertureError::render("mark font size must be finite and > 0"));
        }
        let key = MarkKey {
            text: text.to_string(),
            color,
            size_q: (font_px * 4.0).round() as u32,
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let size = f64::from(key.size_q) / 4.0;
        let svg = mark_svg(text, color, size);
        let (width, height) = mark_box(text, size);
        if width > MAX_DIM || height > MAX_DIM {
            return Err(OvertureError::render(format!(
                "mark raster size too large: {width}x{height}"
            )));
        }

        let opts = usvg::Options {
            fontdb: system_fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse mark svg")?;
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, width, height)?;

        let out = MarkRaster {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        };
        if self.cache.len() >= MAX_CACHED {
            self.cache.clear();
        }
        self.cache.insert(key, out.clone());
        Ok(out)
    }
}

/// Buffer size for `text` at `font_px`: generous enough for bold glyphs of any script.
fn mark_box(text: &str, font_px: f64) -> (u32, u32) {
    let chars = text.chars().count().max(1) as f64;
    let w = (font_px * (chars + 1.0)).ceil().max(1.0) as u32;
    let h = (font_px * 1.6).ceil().max(1.0) as u32;
    (w, h)
}

fn mark_svg(text: &str, color: Rgba8, font_px: f64) -> String {
    let (w, h) = mark_box(text, font_px);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{cx}" y="{cy}" font-family="sans-serif" font-weight="bold" font-size="{size}" "#,
            r##"text-anchor="middle" dominant-baseline="central" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{a}">"##,
            "{text}</text></svg>"
        ),
        w = w,
        h = h,
        cx = f64::from(w) / 2.0,
        cy = f64::from(h) / 2.0,
        size = font_px,
        r = color.r,
        g = color.g,
        b = color.b,
        a = f64::from(color.a) / 255.0,
        text = escape_xml(text),
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> OvertureResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| OvertureError::render("failed to allocate mark pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/mark.rs"]
mod tests;
