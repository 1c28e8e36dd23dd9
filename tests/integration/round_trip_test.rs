// Encode/decode round-trip properties
//
// Any config that encodes must decode to the same config once aliases are
// folded and an unset format is made explicit.

use chrono::{DateTime, Duration, TimeZone, Utc};
use imageflux::image::*;
use imageflux::FixedClock;
use proptest::prelude::*;

const SCALE: i32 = DEFAULT_RATIO_SCALE;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 24, 9, 23, 0).unwrap()
}

pub(super) fn options() -> ParseOptions {
    ParseOptions::new().with_clock(FixedClock::new(now()))
}

fn pixel_rect() -> impl Strategy<Value = Rect> {
    prop_oneof![
        Just(Rect::ZERO),
        (-100..4000i32, -100..4000i32, 0..4000i32, 0..4000i32)
            .prop_map(|(x0, y0, x1, y1)| Rect::new(x0, y0, x1, y1)),
    ]
}

fn ratio_rect() -> impl Strategy<Value = Rect> {
    prop_oneof![
        Just(Rect::ZERO),
        (0..=SCALE, 0..=SCALE, 0..=SCALE, 0..=SCALE)
            .prop_map(|(x0, y0, x1, y1)| Rect::new(x0, y0, x1, y1)),
    ]
}

fn aspect_mode() -> impl Strategy<Value = AspectMode> {
    (-1i64..=3).prop_map(|v| AspectMode::from_wire(v).unwrap_or_default())
}

fn origin() -> impl Strategy<Value = Origin> {
    (0i64..=9).prop_map(|v| Origin::from_wire(v).unwrap_or_default())
}

fn rotate() -> impl Strategy<Value = Rotate> {
    prop_oneof![
        Just(Rotate::Default),
        Just(Rotate::Auto),
        (1i64..=8).prop_map(|v| Rotate::from_wire(v).unwrap_or_default()),
    ]
}

fn color() -> impl Strategy<Value = Option<Color>> {
    prop::option::of(any::<[u8; 4]>().prop_map(|[r, g, b, a]| Color::rgba(r, g, b, a)))
}

fn layout() -> impl Strategy<Value = Layout> {
    (
        (0..5000i32, 0..5000i32, any::<bool>(), aspect_mode()),
        (pixel_rect(), ratio_rect(), origin()),
        (pixel_rect(), ratio_rect(), origin(), origin()),
        (color(), rotate(), rotate()),
    )
        .prop_map(
            |((width, height, disable_enlarge, aspect_mode), (ic, icr, ig), (oc, ocr, og, g), (b, ir, or))| {
                let clip_max = if icr.is_zero() && ocr.is_zero() {
                    Point::ZERO
                } else {
                    Point::new(SCALE, SCALE)
                };
                Layout {
                    width,
                    height,
                    disable_enlarge,
                    aspect_mode,
                    input_clip: ic,
                    input_clip_ratio: icr,
                    input_origin: ig,
                    output_clip: oc,
                    output_clip_ratio: ocr,
                    output_origin: og,
                    clip_max,
                    origin: g,
                    background: b,
                    input_rotate: ir,
                    output_rotate: or,
                    ..Default::default()
                }
            },
        )
}

fn mask() -> impl Strategy<Value = Option<(MaskType, PaddingMode)>> {
    prop::option::of((
        prop_oneof![Just(MaskType::White), Just(MaskType::Black), Just(MaskType::Alpha)],
        prop_oneof![Just(PaddingMode::Default), Just(PaddingMode::Leave)],
    ))
}

fn overlay() -> impl Strategy<Value = Overlay> {
    (
        layout(),
        "[a-z]{1,8}(/[a-z0-9 ,]{1,8}){0,2}\\.png",
        (-500..500i32, -500..500i32),
        (0..=SCALE, 0..=SCALE),
        origin(),
        mask(),
    )
        .prop_map(|(layout, path, (x, y), (xr, yr), overlay_origin, mask)| {
            let offset_ratio = Point::new(xr, yr);
            let offset_max = if offset_ratio.is_zero() {
                Point::ZERO
            } else {
                Point::new(SCALE, SCALE)
            };
            let (mask_type, padding_mode) = match mask {
                Some((m, p)) => (Some(m), p),
                None => (None, PaddingMode::Default),
            };
            Overlay {
                path: format!("/{}", path),
                layout,
                offset: Point::new(x, y),
                offset_ratio,
                offset_max,
                overlay_origin,
                mask_type,
                padding_mode,
            }
        })
}

fn through() -> impl Strategy<Value = Through> {
    (0u8..16).prop_map(|bits| {
        let mut t = Through::NONE;
        for (i, flag) in [Through::JPEG, Through::PNG, Through::GIF, Through::WEBP]
            .into_iter()
            .enumerate()
        {
            if bits & (1 << i) != 0 {
                t |= flag;
            }
        }
        t
    })
}

fn format() -> impl Strategy<Value = Option<Format>> {
    prop_oneof![
        Just(None),
        Just(Some(Format::AUTO)),
        Just(Some(Format::JPEG)),
        Just(Some(Format::PNG)),
        Just(Some(Format::WEBP_AUTO)),
        Just(Some(Format::WEBP_FROM_JPEG)),
    ]
}

fn exif_option() -> impl Strategy<Value = ExifOption> {
    (0i64..=2).prop_map(|v| ExifOption::from_wire(v).unwrap_or_default())
}

fn unsharp() -> impl Strategy<Value = Unsharp> {
    prop_oneof![
        Just(Unsharp::default()),
        (1..20i32, 1..40u32, prop::option::of((0..40u32, 1..100u32))).prop_map(
            |(radius, sigma, gain_threshold)| {
                let sigma = sigma as f64 / 4.0;
                match gain_threshold {
                    Some((gain, threshold)) => Unsharp {
                        radius,
                        sigma,
                        gain: gain as f64 / 4.0,
                        threshold: threshold as f64 / 100.0,
                    },
                    None => Unsharp {
                        radius,
                        sigma,
                        ..Default::default()
                    },
                }
            }
        ),
    ]
}

fn blur() -> impl Strategy<Value = Blur> {
    prop_oneof![
        Just(Blur::default()),
        (1..20i32, 1..40u32).prop_map(|(radius, sigma)| Blur {
            radius,
            sigma: sigma as f64 / 4.0,
        }),
    ]
}

pub(super) fn config() -> impl Strategy<Value = Config> {
    (
        layout(),
        prop::option::of(1i64..100_000_000),
        prop_oneof![Just(0.0), (1u32..2000).prop_map(|n| n as f64 / 8.0)],
        through(),
        prop::collection::vec(overlay(), 0..3),
        (format(), 0..=100i32, any::<bool>(), any::<bool>(), exif_option()),
        (unsharp(), blur(), 0..=100i32, 0..=100i32),
        (-100..=100i32, -100..=100i32, any::<bool>()),
    )
        .prop_map(
            |(
                layout,
                expires,
                device_pixel_ratio,
                through,
                overlays,
                (format, quality, disable_optimization, lossless, exif_option),
                (unsharp, blur, grayscale, sepia),
                (brightness, contrast, invert),
            )| Config {
                layout,
                expires: expires.map(|secs| now() + Duration::seconds(secs)),
                device_pixel_ratio,
                through,
                overlays,
                format,
                quality,
                disable_optimization,
                lossless,
                exif_option,
                unsharp,
                blur,
                grayscale,
                sepia,
                brightness,
                contrast,
                invert,
            },
        )
}

/// Parameter strings built from real keys and loosely shaped values
fn raw_params() -> impl Strategy<Value = String> {
    let key = prop_oneof![
        Just("w"), Just("h"), Just("u"), Just("a"), Just("dpr"), Just("ic"), Just("icr"),
        Just("oc"), Just("c"), Just("ocr"), Just("cr"), Just("g"), Just("b"), Just("ir"),
        Just("or"), Just("r"), Just("through"), Just("l"), Just("f"), Just("q"), Just("o"),
        Just("lossless"), Just("s"), Just("unsharp"), Just("blur"), Just("grayscale"),
        Just("sepia"), Just("brightness"), Just("contrast"), Just("invert"), Just("sig"),
        Just("zz"), Just("x"), Just("mask"),
    ];
    let pair = (key, "[0-9a-fx.:+()%C=,/-]{0,12}").prop_map(|(k, v)| format!("{}={}", k, v));
    (any::<bool>(), prop::collection::vec(pair, 0..6)).prop_map(|(prefixed, pairs)| {
        let joined = pairs.join(",");
        if prefixed {
            format!("/c/{}/images/1.jpg", joined)
        } else {
            joined
        }
    })
}

proptest! {
    #[test]
    fn encoded_config_parses_back(config in config()) {
        let encoded = config.to_string();
        let (parsed, rest) = options().parse(&encoded).unwrap();
        prop_assert_eq!(rest, "");
        prop_assert_eq!(parsed.normalized(), config.normalized());
    }

    #[test]
    fn escaped_separator_parses_like_literal(config in config()) {
        let (literal, _) = options().parse(&config.to_string()).unwrap();
        let (escaped, _) = options().parse(&config.to_escaped_string()).unwrap();
        prop_assert_eq!(escaped, literal);
    }

    #[test]
    fn reencoding_a_parsed_config_is_stable(input in raw_params()) {
        let Ok((first, _)) = options().parse(&input) else {
            return Ok(());
        };
        let encoded = first.to_string();
        let (second, rest) = options().parse(&encoded).unwrap();
        prop_assert_eq!(rest, "");
        prop_assert_eq!(second.normalized(), first.normalized());
    }
}

#[test]
fn test_overlay_order_is_preserved() {
    let a = Overlay {
        offset: Point::new(10, 20),
        ..Overlay::new("/b.png")
    };
    let b = Overlay {
        offset: Point::new(1, 2),
        ..Overlay::new("/a.png")
    };
    let config = Config {
        overlays: vec![a.clone(), b.clone()],
        ..Default::default()
    };
    let (parsed, _) = parse_config(&config.to_string()).unwrap();
    assert_eq!(parsed.overlays, vec![a, b]);
}

#[test]
fn test_alias_precedence() {
    let with_alias = Config {
        layout: Layout {
            clip: Rect::new(1, 1, 2, 2),
            output_clip: Rect::new(5, 5, 6, 6),
            ..Default::default()
        },
        ..Default::default()
    };
    let without_alias = Config {
        layout: Layout {
            output_clip: Rect::new(5, 5, 6, 6),
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(with_alias.to_string(), without_alias.to_string());
}

#[test]
fn test_ratio_formatting_has_no_extra_digits() {
    let (config, _) = parse_config("icr=0.25:0.25:0.75:0.75").unwrap();
    assert_eq!(
        config.layout.input_clip_ratio,
        Rect::new(SCALE / 4, SCALE / 4, SCALE * 3 / 4, SCALE * 3 / 4)
    );
    assert_eq!(config.layout.clip_max, Point::new(SCALE, SCALE));
    assert_eq!(config.to_string(), "icr=0.25:0.25:0.75:0.75");
}
