use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn fps_frame_timestamps() {
    let fps = Fps::new(50, 1).unwrap();
    assert_eq!(fps.frame_duration_ms(), 20.0);
    assert_eq!(fps.frame_to_ms(FrameIndex(3)), 60.0);
    // 8500 ms at 50 fps lands exactly on frame 425, so 426 frames cover it.
    assert_eq!(fps.frames_covering_ms(8500.0), 426);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn viewport_device_size_scales_by_dpr() {
    let vp = Viewport::new(100, 50).with_device_pixel_ratio(2.0);
    assert_eq!(vp.device_size(), (200, 100));
    assert_eq!(vp.center(), Point::new(50.0, 25.0));
    assert!((vp.base_size() - 17.5).abs() < 1e-9);
}

#[test]
fn viewport_validation() {
    assert!(Viewport::new(0, 10).validate().is_err());
    assert!(
        Viewport::new(10, 10)
            .with_device_pixel_ratio(f64::NAN)
            .validate()
            .is_err()
    );
    assert!(Viewport::new(10, 10).validate().is_ok());
}

#[test]
fn rgba_alpha_and_premul() {
    let c = Rgba8::rgba(255, 255, 255, 0.4);
    assert_eq!(c.a, 102);
    assert_eq!(c.premul(), [102, 102, 102, 102]);
    assert_eq!(Rgba8::BLACK.premul(), [0, 0, 0, 255]);
}
