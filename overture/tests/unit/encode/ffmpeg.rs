use super::*;
use crate::foundation::core::Fps;

fn args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn transparent_pixels_become_background() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn opaque_pixels_pass_through() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, src);
    assert!(flatten_premul_over_bg(&mut dst, &[0u8; 8], Rgba8::BLACK).is_err());
}

#[test]
fn odd_sizes_are_padded() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out/intro.mp4"));
    let even = SinkConfig {
        width: 64,
        height: 48,
        fps: Fps::new(30, 1).unwrap(),
    };
    let a = args(&sink.command(&even));
    assert!(!a.iter().any(|s| s == "-vf"));
    assert!(a.contains(&"64x48".to_string()));
    assert!(a.contains(&"30/1".to_string()));
    assert_eq!(a.last().map(String::as_str), Some("out/intro.mp4"));

    let odd = SinkConfig { width: 63, ..even };
    let a = args(&sink.command(&odd));
    assert!(a.iter().any(|s| s.starts_with("pad=")));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
