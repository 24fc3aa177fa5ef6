use super::*;

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.1)
}

fn clear(viewport: &Viewport) -> DrawOp {
    DrawOp::Fill {
        path: rect_path(0.0, 0.0, viewport.width as f64, viewport.height as f64),
        transform: Affine::IDENTITY,
        paint: Paint::Solid(Rgba8::BLACK),
    }
}

fn fill(path: BezPath, color: Rgba8) -> DrawOp {
    DrawOp::Fill {
        path,
        transform: Affine::IDENTITY,
        paint: Paint::Solid(color),
    }
}

#[test]
fn solid_fill_lands_where_expected() {
    let vp = Viewport::new(32, 16);
    let mut list = DisplayList::new();
    list.push(clear(&vp));
    list.push(fill(rect_path(8.0, 4.0, 24.0, 12.0), Rgba8::rgb(255, 0, 0)));

    let frame = CpuBackend::new().render(&list, &vp).unwrap();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert_eq!(frame.pixel(16, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(31, 15), Some([0, 0, 0, 255]));
}

#[test]
fn device_pixel_ratio_scales_the_surface() {
    let vp = Viewport::new(16, 8).with_device_pixel_ratio(2.0);
    let mut list = DisplayList::new();
    list.push(clear(&vp));
    list.push(fill(rect_path(8.0, 0.0, 16.0, 8.0), Rgba8::WHITE));

    let frame = CpuBackend::new().render(&list, &vp).unwrap();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert_eq!(frame.pixel(10, 8), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(20, 8), Some([255, 255, 255, 255]));
}

#[test]
fn clip_survives_a_glow_in_the_middle() {
    let vp = Viewport::new(32, 16);
    let mut list = DisplayList::new();
    list.push(clear(&vp));
    list.push(DrawOp::PushClip {
        path: rect_path(0.0, 0.0, 16.0, 16.0),
        transform: Affine::IDENTITY,
    });
    list.push(DrawOp::Glow {
        path: rect_path(30.0, 14.0, 31.0, 15.0),
        transform: Affine::IDENTITY,
        color: Rgba8::rgba(0, 0, 255, 0.1),
        blur: 2.0,
    });
    list.push(fill(rect_path(0.0, 0.0, 32.0, 16.0), Rgba8::rgb(0, 255, 0)));
    list.push(DrawOp::PopClip);

    let frame = CpuBackend::new().render(&list, &vp).unwrap();
    assert_eq!(frame.pixel(4, 8), Some([0, 255, 0, 255]));
    assert_eq!(frame.pixel(24, 4), Some([0, 0, 0, 255]));
}

#[test]
fn glow_spreads_past_the_shape() {
    let vp = Viewport::new(48, 48);
    let mut list = DisplayList::new();
    list.push(clear(&vp));
    list.push(DrawOp::Glow {
        path: rect_path(20.0, 20.0, 28.0, 28.0),
        transform: Affine::IDENTITY,
        color: Rgba8::WHITE,
        blur: 8.0,
    });

    let frame = CpuBackend::new().render(&list, &vp).unwrap();
    let inside = frame.pixel(24, 24).unwrap()[0];
    let near = frame.pixel(30, 24).unwrap()[0];
    let far = frame.pixel(2, 2).unwrap()[0];
    assert!(inside > near, "{inside} vs {near}");
    assert!(near > 0);
    assert_eq!(far, 0);
}

#[test]
fn gradient_fill_varies_along_its_axis() {
    let vp = Viewport::new(64, 8);
    let mut list = DisplayList::new();
    list.push(clear(&vp));
    list.push(DrawOp::Fill {
        path: rect_path(0.0, 0.0, 64.0, 8.0),
        transform: Affine::IDENTITY,
        paint: Paint::Linear(LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(64.0, 0.0),
            stops: vec![Rgba8::rgb(0, 0, 255), Rgba8::rgb(255, 0, 0)],
        }),
    });

    let frame = CpuBackend::new().render(&list, &vp).unwrap();
    let left = frame.pixel(1, 4).unwrap();
    let right = frame.pixel(62, 4).unwrap();
    assert!(left[2] > 200 && left[0] < 55, "{left:?}");
    assert!(right[0] > 200 && right[2] < 55, "{right:?}");
}

#[test]
fn unbalanced_clips_are_tolerated() {
    let vp = Viewport::new(8, 8);
    let mut list = DisplayList::new();
    list.push(DrawOp::PopClip);
    list.push(clear(&vp));
    list.push(DrawOp::PushClip {
        path: rect_path(0.0, 0.0, 4.0, 8.0),
        transform: Affine::IDENTITY,
    });
    list.push(fill(rect_path(0.0, 0.0, 8.0, 8.0), Rgba8::WHITE));

    let frame = CpuBackend::new().render(&list, &vp).unwrap();
    assert_eq!(frame.pixel(1, 1), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(6, 1), Some([0, 0, 0, 255]));
}

#[test]
fn oversized_surface_is_rejected() {
    let vp = Viewport::new(70_000, 2);
    assert!(CpuBackend::new().render(&DisplayList::new(), &vp).is_err());
}

#[test]
fn backend_is_reusable_across_sizes() {
    let mut backend = CpuBackend::new();
    for (w, h) in [(8, 8), (16, 4), (8, 8)] {
        let vp = Viewport::new(w, h);
        let mut list = DisplayList::new();
        list.push(clear(&vp));
        let frame = backend.render(&list, &vp).unwrap();
        assert_eq!(frame.data.len(), (w * h * 4) as usize);
        assert_eq!(frame.pixel(w - 1, h - 1), Some([0, 0, 0, 255]));
    }
}
