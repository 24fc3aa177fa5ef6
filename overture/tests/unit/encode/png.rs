use super::*;
use crate::foundation::core::Fps;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("overture-png-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn writes_numbered_frames_that_decode() {
    let dir = scratch_dir("seq");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 3,
        height: 2,
        fps: Fps::default(),
    })
    .unwrap();
    let frame = FrameRGBA {
        width: 3,
        height: 2,
        data: [255u8, 0, 0, 255].repeat(6),
        premultiplied: true,
    };
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(12), &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written().len(), 2);
    assert!(sink.written()[1].ends_with("frame_00012.png"));
    let img = image::open(&sink.written()[0]).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [255, 0, 0, 255]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rejects_frames_before_begin() {
    let mut sink = PngSequenceSink::new(scratch_dir("unstarted"));
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0; 4],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}
