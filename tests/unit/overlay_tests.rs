// Overlay encode/decode tests

use imageflux::image::*;
use rstest::rstest;

fn overlay(layout: Layout) -> Overlay {
    Overlay {
        layout,
        ..Overlay::new("images/1.png")
    }
}

#[rstest]
#[case(overlay(Layout { width: 100, height: 200, ..Default::default() }), "w=100,h=200%2Fimages%2F1.png")]
#[case(overlay(Layout { disable_enlarge: true, ..Default::default() }), "u=0%2Fimages%2F1.png")]
#[case(overlay(Layout { aspect_mode: AspectMode::Scale, ..Default::default() }), "a=0%2Fimages%2F1.png")]
#[case(
    overlay(Layout { input_clip: Rect::new(100, 200, 300, 400), ..Default::default() }),
    "ic=100:200:300:400%2Fimages%2F1.png"
)]
#[case(
    overlay(Layout {
        input_clip_ratio: Rect::new(25, 25, 75, 75),
        clip_max: Point::new(100, 100),
        ..Default::default()
    }),
    "icr=0.25:0.25:0.75:0.75%2Fimages%2F1.png"
)]
#[case(
    overlay(Layout {
        input_clip: Rect::new(100, 200, 300, 400),
        input_origin: Origin::MiddleCenter,
        ..Default::default()
    }),
    "ic=100:200:300:400,ig=5%2Fimages%2F1.png"
)]
#[case(
    overlay(Layout { clip: Rect::new(100, 150, 200, 250), ..Default::default() }),
    "oc=100:150:200:250%2Fimages%2F1.png"
)]
#[case(
    overlay(Layout {
        output_clip: Rect::new(100, 150, 200, 250),
        clip: Rect::new(200, 250, 300, 350),
        ..Default::default()
    }),
    "oc=100:150:200:250%2Fimages%2F1.png"
)]
#[case(
    overlay(Layout {
        clip_ratio: Rect::new(25, 25, 75, 75),
        clip_max: Point::new(100, 100),
        ..Default::default()
    }),
    "ocr=0.25:0.25:0.75:0.75%2Fimages%2F1.png"
)]
#[case(overlay(Layout { origin: Origin::TopLeft, ..Default::default() }), "g=1%2Fimages%2F1.png")]
#[case(
    overlay(Layout { background: Some(Color::BLACK), ..Default::default() }),
    "b=000000%2Fimages%2F1.png"
)]
#[case(overlay(Layout { input_rotate: Rotate::Auto, ..Default::default() }), "ir=auto%2Fimages%2F1.png")]
#[case(overlay(Layout { rotate: Rotate::LeftBottom, ..Default::default() }), "or=8%2Fimages%2F1.png")]
#[case(
    overlay(Layout { output_rotate: Rotate::Auto, rotate: Rotate::LeftBottom, ..Default::default() }),
    "or=auto%2Fimages%2F1.png"
)]
#[case(
    Overlay { overlay_origin: Origin::BottomCenter, ..Overlay::new("images/1.png") },
    "lg=8%2Fimages%2F1.png"
)]
fn test_overlay_encode(#[case] overlay: Overlay, #[case] expected: &str) {
    assert_eq!(overlay.to_string(), expected);
}

#[rstest]
#[case("", Overlay::new("/"))]
#[case("w=100%2Fimages%2F1.png", Overlay { layout: Layout { width: 100, ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case("a=3%2Fimages%2F1.png", Overlay { layout: Layout { aspect_mode: AspectMode::Pad, ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case(
    "c=100:150:200:250%2Fimages%2F1.png",
    Overlay { layout: Layout { output_clip: Rect::new(100, 150, 200, 250), ..Default::default() }, ..Overlay::new("/images/1.png") }
)]
#[case(
    "cr=0.25:0.25:0.75:0.75%2Fimages%2F1.png",
    Overlay {
        layout: Layout {
            output_clip_ratio: Rect::new(16384, 16384, 49152, 49152),
            clip_max: Point::new(65536, 65536),
            ..Default::default()
        },
        ..Overlay::new("/images/1.png")
    }
)]
#[case("b=FFFFFF%2Fimages%2F1.png", Overlay { layout: Layout { background: Some(Color::WHITE), ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case("b=ff0000%2Fimages%2F1.png", Overlay { layout: Layout { background: Some(Color::rgb(255, 0, 0)), ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case("b=ffffff00%2Fimages%2F1.png", Overlay { layout: Layout { background: Some(Color::rgba(255, 255, 255, 0)), ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case("r=8%2Fimages%2F1.png", Overlay { layout: Layout { output_rotate: Rotate::LeftBottom, ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case("r=auto%2Fimages%2F1.png", Overlay { layout: Layout { output_rotate: Rotate::Auto, ..Default::default() }, ..Overlay::new("/images/1.png") })]
#[case("x=-5,y=7%2Fimages%2F1.png", Overlay { offset: Point::new(-5, 7), ..Overlay::new("/images/1.png") })]
fn test_overlay_parse(#[case] input: &str, #[case] want: Overlay) {
    assert_eq!(Overlay::parse(input).unwrap(), want, "input {:?}", input);
}

#[test]
fn test_overlay_path_with_special_characters() {
    let overlay = Overlay::new("/images/a b,c.png");
    let encoded = overlay.to_string();
    assert_eq!(encoded, "%2Fimages%2Fa%20b%2Cc.png");
    assert_eq!(Overlay::parse(&encoded).unwrap(), overlay);
}

#[test]
fn test_overlay_inside_config_parses_back() {
    let config = Config {
        overlays: vec![
            Overlay {
                layout: Layout {
                    width: 50,
                    ..Default::default()
                },
                mask_type: Some(MaskType::Black),
                padding_mode: PaddingMode::Leave,
                ..Overlay::new("/masks/round.png")
            },
            Overlay {
                offset_ratio: Point::new(32768, 0),
                offset_max: Point::new(65536, 65536),
                overlay_origin: Origin::TopRight,
                ..Overlay::new("/logo.png")
            },
        ],
        ..Default::default()
    };
    let encoded = config.to_string();
    assert_eq!(
        encoded,
        "l=(w=50,mask=black:1%2Fmasks%2Fround.png),l=(xr=0.5,yr=0,lg=3%2Flogo.png)"
    );
    let (parsed, rest) = parse_config(&encoded).unwrap();
    assert_eq!(rest, "");
    assert_eq!(parsed, config);
}
