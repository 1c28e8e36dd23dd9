// Config encoding tests
// Expected strings are the exact wire form other clients compare against.

use chrono::{TimeZone, Utc};
use imageflux::image::*;
use rstest::rstest;

fn layout(layout: Layout) -> Config {
    Config {
        layout,
        ..Default::default()
    }
}

#[rstest]
#[case(Config::default(), "f=auto")]
#[case(layout(Layout { width: 200, height: 100, ..Default::default() }), "w=200,h=100")]
#[case(layout(Layout { aspect_mode: AspectMode::Scale, ..Default::default() }), "a=0")]
#[case(layout(Layout { aspect_mode: AspectMode::ForceScale, ..Default::default() }), "a=1")]
#[case(layout(Layout { aspect_mode: AspectMode::Crop, ..Default::default() }), "a=2")]
#[case(layout(Layout { aspect_mode: AspectMode::Pad, ..Default::default() }), "a=3")]
#[case(
    layout(Layout { clip: Rect::new(100, 150, 200, 250), ..Default::default() }),
    "oc=100:150:200:250"
)]
#[case(
    layout(Layout {
        output_clip: Rect::new(100, 150, 200, 250),
        clip: Rect::new(200, 250, 300, 350),
        ..Default::default()
    }),
    "oc=100:150:200:250"
)]
#[case(
    layout(Layout {
        clip_ratio: Rect::new(25, 25, 75, 75),
        clip_max: Point::new(100, 100),
        ..Default::default()
    }),
    "ocr=0.25:0.25:0.75:0.75"
)]
#[case(layout(Layout { rotate: Rotate::LeftBottom, ..Default::default() }), "or=8")]
#[case(
    layout(Layout { output_rotate: Rotate::Auto, rotate: Rotate::LeftBottom, ..Default::default() }),
    "or=auto"
)]
#[case(layout(Layout { background: Some(Color::TRANSPARENT), ..Default::default() }), "b=00000000")]
#[case(Config { device_pixel_ratio: 1.5, ..Default::default() }, "dpr=1.5")]
#[case(
    Config { through: Through::JPEG | Through::PNG | Through::GIF | Through::WEBP, ..Default::default() },
    "through=jpg:png:gif:webp"
)]
#[case(Config { format: Some(Format::AUTO), ..Default::default() }, "f=auto")]
#[case(Config { format: Some(Format::WEBP_FROM_JPEG), ..Default::default() }, "f=webp:jpeg")]
#[case(Config { exif_option: ExifOption::Strip, ..Default::default() }, "s=1")]
#[case(
    Config { unsharp: Unsharp { radius: 10, sigma: 1.0, ..Default::default() }, ..Default::default() },
    "unsharp=10x1"
)]
#[case(Config { brightness: 20, contrast: -20, ..Default::default() }, "brightness=120,contrast=80")]
#[case(
    Config { expires: Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()), ..Default::default() },
    "expires=2030-01-02T03:04:05Z"
)]
fn test_encode(#[case] config: Config, #[case] expected: &str) {
    assert_eq!(config.to_string(), expected);
}

#[test]
fn test_encode_subsecond_expiry() {
    let expires = Utc
        .with_ymd_and_hms(2030, 1, 2, 3, 4, 5)
        .unwrap()
        .checked_add_signed(chrono::Duration::milliseconds(250))
        .unwrap();
    let config = Config {
        expires: Some(expires),
        ..Default::default()
    };
    assert_eq!(config.to_string(), "expires=2030-01-02T03:04:05.250Z");
}

#[test]
fn test_every_key_in_order() {
    let config = Config {
        layout: Layout {
            width: 1,
            height: 2,
            disable_enlarge: true,
            aspect_mode: AspectMode::Crop,
            input_clip: Rect::new(1, 2, 3, 4),
            input_clip_ratio: Rect::new(0, 0, 50, 50),
            input_origin: Origin::TopLeft,
            output_clip: Rect::new(5, 6, 7, 8),
            output_clip_ratio: Rect::new(50, 50, 100, 100),
            output_origin: Origin::BottomRight,
            clip_max: Point::new(100, 100),
            origin: Origin::MiddleCenter,
            background: Some(Color::rgb(0x12, 0x34, 0x56)),
            input_rotate: Rotate::Auto,
            output_rotate: Rotate::BottomRight,
            ..Default::default()
        },
        expires: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
        device_pixel_ratio: 2.0,
        through: Through::GIF,
        overlays: vec![Overlay::new("/a.png")],
        format: Some(Format::PNG),
        quality: 90,
        disable_optimization: true,
        lossless: true,
        exif_option: ExifOption::KeepOrientation,
        unsharp: Unsharp {
            radius: 2,
            sigma: 0.5,
            gain: 1.5,
            threshold: 0.25,
        },
        blur: Blur {
            radius: 3,
            sigma: 2.0,
        },
        grayscale: 10,
        sepia: 20,
        brightness: 5,
        contrast: -5,
        invert: true,
    };
    assert_eq!(
        config.to_string(),
        "w=1,h=2,expires=2030-01-01T00:00:00Z,u=0,a=2,dpr=2,\
         ic=1:2:3:4,icr=0:0:0.5:0.5,ig=1,oc=5:6:7:8,ocr=0.5:0.5:1:1,og=9,g=5,b=123456,\
         ir=auto,or=3,through=gif,l=(%2Fa.png),\
         f=png,q=90,o=0,lossless=1,s=2,\
         unsharp=2x0.5+1.5+0.25,blur=3x2,grayscale=10,sepia=20,\
         brightness=105,contrast=95,invert=1"
    );
}

#[test]
fn test_invalid_format_tokens_are_rejected() {
    for token in ["", "WEBP", "webp:", ":webp", "webp,png", "web p", "webp/png"] {
        assert!(token.parse::<Format>().is_err(), "{:?} should be rejected", token);
    }
    assert_eq!("webp:png".parse::<Format>().unwrap(), Format::WEBP_PNG);
}

#[test]
fn test_display_names() {
    assert_eq!(AspectMode::ForceScale.to_string(), "force-scale");
    assert_eq!(Origin::BottomCenter.to_string(), "bottom-center");
    assert_eq!(Rotate::Auto.to_string(), "auto");
    assert_eq!(Rotate::RightBottom.to_string(), "right-bottom");
    assert_eq!(ExifOption::KeepOrientation.to_string(), "keep-orientation");
    assert_eq!(MaskType::Alpha.to_string(), "alpha");
    assert_eq!((Through::JPEG | Through::WEBP).to_string(), "jpg:webp");
}
