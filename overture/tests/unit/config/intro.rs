use super::*;

#[test]
fn minimal_json_fills_defaults() {
    let cfg = IntroConfig::from_reader(r#"{ "viewport": { "width": 320, "height": 200 } }"#.as_bytes())
        .unwrap();
    assert_eq!(cfg.viewport, Viewport::new(320, 200));
    assert_eq!(cfg.fps, Fps::default());
    assert_eq!(cfg.seed, 0);
    assert_eq!(cfg.mark, "DZ");
    assert_eq!(cfg.sheen_clock, SheenClock::Session);
    assert!(cfg.captions.is_empty());
    cfg.validate().unwrap();
    assert_eq!(cfg, IntroConfig::new(Viewport::new(320, 200)));
}

#[test]
fn full_json_round_trips_fields() {
    let json = r#"{
        "viewport": { "width": 1280, "height": 720, "device_pixel_ratio": 2.0 },
        "fps": { "num": 30, "den": 1 },
        "seed": 7,
        "mark": "OV",
        "sheen_clock": "wall",
        "captions": [ { "text": "Energy", "start": 0.05, "end": 0.3 }, { "start": 0.4, "end": 0.6 } ]
    }"#;
    let cfg = IntroConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.viewport.device_pixel_ratio, 2.0);
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
    assert_eq!(cfg.captions[0].text, "Energy");
    assert_eq!(cfg.captions[1].text, "");

    let opts = cfg.session_opts();
    assert_eq!(opts.seed, 7);
    assert_eq!(opts.mark, "OV");
    assert_eq!(opts.sheen_clock, SheenClock::Wall);
}

#[test]
fn validation_rejects_bad_values() {
    let base = IntroConfig::new(Viewport::new(10, 10));

    let mut cfg = base.clone();
    cfg.mark = "  ".to_string();
    assert!(cfg.validate().is_err());

    let mut cfg = base.clone();
    cfg.fps = Fps { num: 0, den: 1 };
    assert!(cfg.validate().is_err());

    let mut cfg = base.clone();
    cfg.captions = vec![CaptionDescriptor::new(0.6, 0.4)];
    let err = cfg.validate().unwrap_err().to_string();
    assert!(err.contains("caption 0"), "{err}");

    let mut cfg = base;
    cfg.viewport = Viewport::new(10, 10).with_device_pixel_ratio(f64::NAN);
    assert!(cfg.validate().is_err());
}

#[test]
fn parse_errors_are_serde_errors() {
    let err = IntroConfig::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, OvertureError::Serde(_)));
    assert!(IntroConfig::from_path("/definitely/not/here.json").is_err());
}
