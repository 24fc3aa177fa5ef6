use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    assert!(out[center + 3] < 255);
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1, 1.0).is_err());
}

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(radius_for_sigma(f64::NAN), 0);
    assert_eq!(radius_for_sigma(5.0), 15);
    assert_eq!(radius_for_sigma(1.1), 4);
}
