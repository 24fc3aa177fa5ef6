use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Viewport};
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::render::backend::FrameRGBA;
use crate::render::blur::{blur_rgba8_premul, radius_for_sigma};
use crate::render::composite::{Placed, premul_over_at, premul_over_in_place};
use crate::render::mark::MarkRasterizer;
use crate::scene::display::{DisplayList, DrawOp, LinearGradient, MarkOp, Paint};

/// Side of the square image a linear gradient is baked into.
const GRADIENT_RES: u32 = 128;
const MAX_CACHED_GRADIENTS: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    stops: Vec<[u8; 4]>,
    // Gradient axis and paint box in 1/16 px.
    geometry: [i64; 8],
}

impl GradientKey {
    fn new(g: &LinearGradient, bbox: Rect) -> Self {
        let q = |v: f64| (v * 16.0).round() as i64;
        Self {
            stops: g.stops.iter().map(|c| c.premul()).collect(),
            geometry: [
                q(g.start.x),
                q(g.start.y),
                q(g.end.x),
                q(g.end.y),
                q(bbox.x0),
                q(bbox.y0),
                q(bbox.x1),
                q(bbox.y1),
            ],
        }
    }
}

/// CPU renderer for [`DisplayList`]s, powered by `vello_cpu`.
///
/// Vector ops are rasterized in batches. Glows and the mark are raster effects; each one closes
/// the current batch, is composited onto the frame, and the next batch reopens any clip that was
/// still active.
pub struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
    layer: Option<vello_cpu::Pixmap>,
    gradients: HashMap<GradientKey, vello_cpu::Image>,
    marks: MarkRasterizer,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    /// Backend with empty caches.
    pub fn new() -> Self {
        Self {
            ctx: None,
            layer: None,
            gradients: HashMap::new(),
            marks: MarkRasterizer::new(),
        }
    }

    /// Rasterize `list` at the viewport's device resolution.
    ///
    /// Ops are expressed in logical pixels; the device pixel ratio is applied on top of every
    /// transform, blur radius and font size.
    pub fn render(&mut self, list: &DisplayList, viewport: &Viewport) -> OvertureResult<FrameRGBA> {
        viewport.validate()?;
        let (width, height) = viewport.device_size();
        let (w16, h16) = surface_dims(width, height)?;
        let dpr = viewport.device_pixel_ratio;
        let device = Affine::scale(dpr);

        let mut frame = vec![0u8; (width as usize) * (height as usize) * 4];
        let mut target = Target {
            data: &mut frame,
            width,
            height,
        };

        let mut batch: Vec<&DrawOp> = Vec::new();
        let mut open_clips: Vec<&DrawOp> = Vec::new();
        for op in list.ops() {
            match op {
                DrawOp::Glow {
                    path,
                    transform,
                    color,
                    blur,
                } => {
                    self.flush_batch(&batch, device, w16, h16, &mut target)?;
                    batch.clear();
                    batch.extend(open_clips.iter().copied());
                    self.draw_glow(path, device * *transform, *color, *blur * dpr, &mut target)?;
                }
                DrawOp::Mark(mark) => {
                    self.flush_batch(&batch, device, w16, h16, &mut target)?;
                    batch.clear();
                    batch.extend(open_clips.iter().copied());
                    self.draw_mark(mark, device, dpr, &mut target)?;
                }
                DrawOp::PushClip { .. } => {
                    open_clips.push(op);
                    batch.push(op);
                }
                DrawOp::PopClip => {
                    open_clips.pop();
                    batch.push(op);
                }
                DrawOp::Fill { .. } | DrawOp::Stroke { .. } => batch.push(op),
            }
        }
        self.flush_batch(&batch, device, w16, h16, &mut target)?;

        Ok(FrameRGBA {
            width,
            height,
            data: frame,
            premultiplied: true,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> OvertureResult<R>,
    ) -> OvertureResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn flush_batch(
        &mut self,
        batch: &[&DrawOp],
        device: Affine,
        width: u16,
        height: u16,
        target: &mut Target<'_>,
    ) -> OvertureResult<()> {
        let draws = batch
            .iter()
            .any(|op| matches!(op, DrawOp::Fill { .. } | DrawOp::Stroke { .. }));
        if !draws {
            return Ok(());
        }

        let mut layer = match self.layer.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        layer.data_as_u8_slice_mut().fill(0);

        self.with_ctx_mut(width, height, |this, ctx| {
            let mut depth = 0usize;
            for op in batch {
                match op {
                    DrawOp::Fill {
                        path,
                        transform,
                        paint,
                    } => {
                        ctx.set_transform(affine_to_cpu(device * *transform));
                        this.set_fill_paint(ctx, path, paint)?;
                        ctx.fill_path(&bezpath_to_cpu(path));
                    }
                    DrawOp::Stroke {
                        path,
                        transform,
                        color,
                        width,
                    } => {
                        ctx.set_transform(affine_to_cpu(device * *transform));
                        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                        ctx.set_paint(color_to_cpu(*color));
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                        ctx.stroke_path(&bezpath_to_cpu(path));
                    }
                    DrawOp::PushClip { path, transform } => {
                        ctx.set_transform(affine_to_cpu(device * *transform));
                        ctx.push_clip_layer(&bezpath_to_cpu(path));
                        depth += 1;
                    }
                    DrawOp::PopClip => {
                        if depth > 0 {
                            ctx.pop_layer();
                            depth -= 1;
                        }
                    }
                    DrawOp::Glow { .. } | DrawOp::Mark(_) => {}
                }
            }
            for _ in 0..depth {
                ctx.pop_layer();
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut layer);
            Ok(())
        })?;

        premul_over_in_place(target.data, layer.data_as_u8_slice())?;
        self.layer = Some(layer);
        Ok(())
    }

    fn set_fill_paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        path: &BezPath,
        paint: &Paint,
    ) -> OvertureResult<()> {
        match paint {
            Paint::Solid(c) => {
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*c));
            }
            Paint::Linear(g) => {
                let bbox = path.bounding_box();
                if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
                    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(color_to_cpu(g.color_at(0.0)));
                    return Ok(());
                }
                let img = self.gradient_paint(g, bbox)?;
                let res = f64::from(GRADIENT_RES);
                let to_box = Affine::translate(bbox.origin().to_vec2())
                    * Affine::scale_non_uniform(bbox.width() / res, bbox.height() / res);
                ctx.set_paint_transform(affine_to_cpu(to_box));
                ctx.set_paint(img);
            }
        }
        Ok(())
    }

    /// Bake `g` over `bbox` into a `GRADIENT_RES` square image, sampled at pixel centres.
    fn gradient_paint(&mut self, g: &LinearGradient, bbox: Rect) -> OvertureResult<vello_cpu::Image> {
        let key = GradientKey::new(g, bbox);
        if let Some(img) = self.gradients.get(&key).cloned() {
            return Ok(img);
        }

        let n = GRADIENT_RES as usize;
        let mut bytes = vec![0u8; n * n * 4];
        for y in 0..n {
            let py = bbox.y0 + (y as f64 + 0.5) / n as f64 * bbox.height();
            for x in 0..n {
                let px = bbox.x0 + (x as f64 + 0.5) / n as f64 * bbox.width();
                let c = g.color_at(g.param_at(Point::new(px, py))).premul();
                let idx = (y * n + x) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c);
            }
        }
        let img = rgba_premul_to_image(&bytes, GRADIENT_RES, GRADIENT_RES)?;
        if self.gradients.len() >= MAX_CACHED_GRADIENTS {
            self.gradients.clear();
        }
        self.gradients.insert(key, img.clone());
        Ok(img)
    }

    /// Canvas-style shadow: the path is filled in `color`, blurred, and composited beneath
    /// everything drawn afterwards.
    fn draw_glow(
        &mut self,
        path: &BezPath,
        transform: Affine,
        color: Rgba8,
        blur_px: f64,
        target: &mut Target<'_>,
    ) -> OvertureResult<()> {
        let sigma = blur_px / 2.0;
        let radius = radius_for_sigma(sigma);
        if radius == 0 || color.a == 0 {
            return Ok(());
        }

        let pad = f64::from(radius);
        let frame_rect = Rect::new(0.0, 0.0, f64::from(target.width), f64::from(target.height));
        let bounds = (transform * path.clone())
            .bounding_box()
            .inflate(pad, pad)
            .intersect(frame_rect);
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Ok(());
        }
        let x0 = bounds.x0.floor();
        let y0 = bounds.y0.floor();
        let gw = (bounds.x1.ceil() - x0).max(1.0) as u32;
        let gh = (bounds.y1.ceil() - y0).max(1.0) as u32;
        let (gw16, gh16) = surface_dims(gw, gh)?;

        let mut shadow = vello_cpu::Pixmap::new(gw16, gh16);
        self.with_ctx_mut(gw16, gh16, |_, ctx| {
            ctx.set_transform(affine_to_cpu(Affine::translate((-x0, -y0)) * transform));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_path(&bezpath_to_cpu(path));
            ctx.flush();
            ctx.render_to_pixmap(&mut shadow);
            Ok(())
        })?;

        let blurred = blur_rgba8_premul(shadow.data_as_u8_slice(), gw, gh, radius, sigma as f32)?;
        premul_over_at(
            target.data,
            target.width,
            target.height,
            &Placed {
                data: &blurred,
                width: gw,
                height: gh,
                x: x0 as i64,
                y: y0 as i64,
            },
            1.0,
        )
    }

    /// Mark text centred on `transform * (0, 0)`, with its own glow underneath.
    fn draw_mark(
        &mut self,
        mark: &MarkOp,
        device: Affine,
        dpr: f64,
        target: &mut Target<'_>,
    ) -> OvertureResult<()> {
        let transform = device * mark.transform;
        let scale = transform.determinant().abs().sqrt();
        let font_px = mark.font_px * scale;
        if mark.opacity <= 0.0 || !font_px.is_finite() || font_px < 0.5 {
            return Ok(());
        }
        let raster = self.marks.raster(&mark.text, mark.color, font_px)?;

        let sigma = mark.glow_blur * dpr / 2.0;
        let radius = radius_for_sigma(sigma);
        let pw = raster.width + 2 * radius;
        let ph = raster.height + 2 * radius;
        let mut padded = vec![0u8; (pw as usize) * (ph as usize) * 4];
        let row = (raster.width as usize) * 4;
        for y in 0..raster.height as usize {
            let src = &raster.rgba8_premul[y * row..(y + 1) * row];
            let dst_off = ((y + radius as usize) * (pw as usize) + radius as usize) * 4;
            padded[dst_off..dst_off + row].copy_from_slice(src);
        }

        let center = transform * Point::ORIGIN;
        let x = (center.x - f64::from(pw) / 2.0).round() as i64;
        let y = (center.y - f64::from(ph) / 2.0).round() as i64;
        let opacity = mark.opacity.clamp(0.0, 1.0);

        if radius > 0 {
            let glow = blur_rgba8_premul(&padded, pw, ph, radius, sigma as f32)?;
            premul_over_at(
                target.data,
                target.width,
                target.height,
                &Placed {
                    data: &glow,
                    width: pw,
                    height: ph,
                    x,
                    y,
                },
                opacity,
            )?;
        }
        premul_over_at(
            target.data,
            target.width,
            target.height,
            &Placed {
                data: &padded,
                width: pw,
                height: ph,
                x,
                y,
            },
            opacity,
        )
    }
}

struct Target<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

fn surface_dims(width: u32, height: u32) -> OvertureResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(OvertureError::render("surface must be non-empty"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| OvertureError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| OvertureError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> OvertureResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(OvertureError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> OvertureResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
