//! Fields shared by the top-level config and by overlays
//!
//! Both carry the same size, fit, clipping, origin, background and rotation
//! parameters, under the same keys. `Layout` owns those fields once; the
//! surrounding types decide where in their key order each group is written.

use crate::codec::{push_int, split4, PairWriter};
use crate::error::FluxError;

use super::geometry::{Color, Point, Rect};
use super::types::{AspectMode, Origin, Rotate};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Width in pixels of the scaled image
    pub width: i32,
    /// Height in pixels of the scaled image
    pub height: i32,
    pub disable_enlarge: bool,
    pub aspect_mode: AspectMode,

    /// Clipping area of the input image, in pixels
    pub input_clip: Rect,
    /// Clipping area of the input image, divided by `clip_max`
    pub input_clip_ratio: Rect,
    pub input_origin: Origin,

    /// Clipping area of the output image, in pixels
    pub output_clip: Rect,
    /// Older name of `output_clip`, used only when `output_clip` is unset
    pub clip: Rect,
    /// Clipping area of the output image, divided by `clip_max`
    pub output_clip_ratio: Rect,
    /// Older name of `output_clip_ratio`, used only when that is unset
    pub clip_ratio: Rect,
    pub output_origin: Origin,

    /// Denominators of both ratio rectangles
    pub clip_max: Point,

    pub origin: Origin,
    pub background: Option<Color>,

    pub input_rotate: Rotate,
    pub output_rotate: Rotate,
    /// Older name of `output_rotate`, used only when that is unset
    pub rotate: Rotate,
}

impl Layout {
    pub fn effective_output_clip(&self) -> Rect {
        if self.output_clip.is_zero() {
            self.clip
        } else {
            self.output_clip
        }
    }

    pub fn effective_output_clip_ratio(&self) -> Rect {
        if self.output_clip_ratio.is_zero() {
            self.clip_ratio
        } else {
            self.output_clip_ratio
        }
    }

    pub fn effective_output_rotate(&self) -> Rotate {
        if self.output_rotate.is_default() {
            self.rotate
        } else {
            self.output_rotate
        }
    }

    /// Folds the deprecated aliases into their replacements
    ///
    /// The encoded form is unchanged; afterwards the aliases are all unset.
    pub fn normalize_aliases(&mut self) {
        self.output_clip = self.effective_output_clip();
        self.output_clip_ratio = self.effective_output_clip_ratio();
        self.output_rotate = self.effective_output_rotate();
        self.clip = Rect::ZERO;
        self.clip_ratio = Rect::ZERO;
        self.rotate = Rotate::Default;
    }

    /// `w`, `h`
    pub(crate) fn append_size(&self, w: &mut PairWriter<'_>) {
        if self.width != 0 {
            w.int("w", self.width as i64);
        }
        if self.height != 0 {
            w.int("h", self.height as i64);
        }
    }

    /// `u`, `a`
    pub(crate) fn append_fit(&self, w: &mut PairWriter<'_>) {
        if self.disable_enlarge {
            w.str("u", "0");
        }
        if let Some(a) = self.aspect_mode.to_wire() {
            w.int("a", a);
        }
    }

    /// `ic`, `icr`, `ig`, `oc`, `ocr`, `og`, `g`, `b`
    pub(crate) fn append_framing(&self, w: &mut PairWriter<'_>) {
        let has_denominator = self.clip_max.x != 0 && self.clip_max.y != 0;

        if !self.input_clip.is_zero() {
            w.pair("ic", |buf| self.input_clip.append_pixels(buf));
        }
        if has_denominator && !self.input_clip_ratio.is_zero() {
            w.pair("icr", |buf| {
                self.input_clip_ratio.append_ratio(buf, self.clip_max)
            });
        }
        if self.input_origin != Origin::Default {
            w.int("ig", self.input_origin.to_wire());
        }

        let output_clip = self.effective_output_clip();
        if !output_clip.is_zero() {
            w.pair("oc", |buf| output_clip.append_pixels(buf));
        }
        let output_clip_ratio = self.effective_output_clip_ratio();
        if has_denominator && !output_clip_ratio.is_zero() {
            w.pair("ocr", |buf| output_clip_ratio.append_ratio(buf, self.clip_max));
        }
        if self.output_origin != Origin::Default {
            w.int("og", self.output_origin.to_wire());
        }

        if self.origin != Origin::Default {
            w.int("g", self.origin.to_wire());
        }
        if let Some(color) = self.background {
            w.pair("b", |buf| color.append_hex(buf));
        }
    }

    /// `ir`, `or`
    pub(crate) fn append_rotation(&self, w: &mut PairWriter<'_>) {
        if !self.input_rotate.is_default() {
            w.pair("ir", |buf| push_rotate(buf, self.input_rotate));
        }
        let output_rotate = self.effective_output_rotate();
        if !output_rotate.is_default() {
            w.pair("or", |buf| push_rotate(buf, output_rotate));
        }
    }

    /// Decodes one shared key. Returns `Ok(false)` if `key` is not a layout key.
    ///
    /// Ratio rectangles are stored multiplied by `ratio_scale`, which also
    /// becomes `clip_max` on both axes.
    pub(crate) fn apply(
        &mut self,
        key: &str,
        value: &str,
        ratio_scale: i32,
    ) -> Result<bool, FluxError> {
        match key {
            "w" => self.width = parse_dimension("width", value)?,
            "h" => self.height = parse_dimension("height", value)?,
            "u" => {
                self.disable_enlarge = match value {
                    "0" => true,
                    "1" => false,
                    _ => return Err(FluxError::invalid_value("disable enlarge", value)),
                }
            }
            "a" => {
                self.aspect_mode = value
                    .parse::<i64>()
                    .ok()
                    .and_then(AspectMode::from_wire)
                    .ok_or_else(|| FluxError::invalid_value("aspect mode", value))?
            }
            "ic" => self.input_clip = parse_pixel_rect("input clip", value)?,
            "icr" => {
                self.input_clip_ratio = parse_ratio_rect("input clip ratio", value, ratio_scale)?;
                self.clip_max = Point::new(ratio_scale, ratio_scale);
            }
            "ig" => self.input_origin = parse_origin("input origin", value)?,
            "oc" | "c" => self.output_clip = parse_pixel_rect("output clip", value)?,
            "ocr" | "cr" => {
                self.output_clip_ratio =
                    parse_ratio_rect("output clip ratio", value, ratio_scale)?;
                self.clip_max = Point::new(ratio_scale, ratio_scale);
            }
            "og" => self.output_origin = parse_origin("output origin", value)?,
            "g" => self.origin = parse_origin("origin", value)?,
            "b" => self.background = Some(Color::from_hex(value)?),
            "ir" => self.input_rotate = parse_rotate("input rotate", value)?,
            "or" | "r" => self.output_rotate = parse_rotate("output rotate", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn push_rotate(buf: &mut String, rotate: Rotate) {
    match rotate.to_wire() {
        Some(v) => push_int(buf, v),
        None => buf.push_str("auto"),
    }
}

fn parse_dimension(param: &str, value: &str) -> Result<i32, FluxError> {
    value
        .parse::<i32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| FluxError::invalid_value(param, value))
}

fn parse_origin(param: &str, value: &str) -> Result<Origin, FluxError> {
    value
        .parse::<i64>()
        .ok()
        .and_then(Origin::from_wire)
        .ok_or_else(|| FluxError::invalid_value(param, value))
}

fn parse_rotate(param: &str, value: &str) -> Result<Rotate, FluxError> {
    if value == "auto" {
        return Ok(Rotate::Auto);
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(Rotate::from_wire)
        .ok_or_else(|| FluxError::invalid_value(param, value))
}

fn parse_pixel_rect(param: &str, value: &str) -> Result<Rect, FluxError> {
    let invalid = || FluxError::invalid_value(param, value);
    let (x0, y0, x1, y1) = split4(value).ok_or_else(invalid)?;
    let coord = |s: &str| s.parse::<i32>().map_err(|_| invalid());
    let rect = Rect::new(coord(x0)?, coord(y0)?, coord(x1)?, coord(y1)?);
    if rect.is_zero() {
        return Err(invalid());
    }
    Ok(rect)
}

fn parse_ratio_rect(param: &str, value: &str, scale: i32) -> Result<Rect, FluxError> {
    let invalid = || FluxError::invalid_value(param, value);
    let (x0, y0, x1, y1) = split4(value).ok_or_else(invalid)?;
    let coord = |s: &str| parse_ratio(s, scale).ok_or_else(invalid);
    let rect = Rect::new(coord(x0)?, coord(y0)?, coord(x1)?, coord(y1)?);
    if rect.is_zero() {
        return Err(invalid());
    }
    Ok(rect)
}

/// Parses a fraction in `[0, 1]` and scales it to an integer numerator
pub(crate) fn parse_ratio(s: &str, scale: i32) -> Option<i32> {
    let v = s.parse::<f64>().ok()?;
    if !(0.0..=1.0).contains(&v) {
        return None;
    }
    Some((v * scale as f64).round() as i32)
}
