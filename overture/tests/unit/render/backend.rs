use super::*;

#[test]
fn pixel_reads_inside_only() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        premultiplied: false,
    };
    assert_eq!(frame.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(frame.pixel(2, 0), None);
    assert_eq!(frame.pixel(0, 1), None);
}

#[test]
fn straight_conversion_unpremultiplies() {
    let frame = FrameRGBA {
        width: 3,
        height: 1,
        data: vec![64, 32, 0, 128, 9, 9, 9, 0, 10, 20, 30, 255],
        premultiplied: true,
    };
    assert_eq!(
        frame.to_straight_rgba8(),
        vec![128, 64, 0, 128, 0, 0, 0, 0, 10, 20, 30, 255]
    );

    let straight = FrameRGBA {
        premultiplied: false,
        ..frame.clone()
    };
    assert_eq!(straight.to_straight_rgba8(), frame.data);
}
