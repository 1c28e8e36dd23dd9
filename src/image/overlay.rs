//! Overlay images composited over the main image
//!
//! An overlay is written inside the main parameter block as `l=(...)`: its own
//! `key=value` pairs, then the overlay image path percent-escaped so that its
//! slashes cannot end the surrounding path segment.

use std::fmt;

use tracing::debug;

use crate::codec::{
    path_unescape, push_int, push_path_escaped, PairWriter, Separator, ESCAPED_SLASH,
};
use crate::error::FluxError;

use super::geometry::{ratio, Point};
use super::layout::{parse_ratio, Layout};
use super::parser::DEFAULT_RATIO_SCALE;
use super::types::{MaskType, Origin, PaddingMode};

/// One overlay image and how it is placed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    /// Path of the overlay image on the same origin
    pub path: String,

    /// Size, clipping and rotation applied to the overlay image
    pub layout: Layout,

    /// Offset in pixels
    pub offset: Point,
    /// Offset as a fraction of `offset_max`
    pub offset_ratio: Point,
    /// Denominators of `offset_ratio`
    pub offset_max: Point,
    /// Anchor of the overlay image
    pub overlay_origin: Origin,

    /// Use the overlay as a mask instead of painting it
    pub mask_type: Option<MaskType>,
    pub padding_mode: PaddingMode,
}

impl Overlay {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Parses the inside of `l=(...)` with the default ratio scale
    pub fn parse(s: &str) -> Result<Self, FluxError> {
        Self::parse_with(s, DEFAULT_RATIO_SCALE, false)
    }

    /// Parses the inside of `l=(...)`
    ///
    /// The whole blob is percent-unescaped first. Pairs end at `,` or `/`; the
    /// first `/` outside a value starts the path, which always begins with `/`.
    pub(crate) fn parse_with(s: &str, ratio_scale: i32, strict: bool) -> Result<Self, FluxError> {
        let unescaped = path_unescape(s)?;
        let mut scanner = Scanner::new(&unescaped);
        let mut overlay = Overlay::default();

        loop {
            let (key, found_equal) = scanner.key();
            if !found_equal {
                if !key.is_empty() {
                    return Err(FluxError::malformed(
                        "overlay",
                        format!("missing '=' after key {:?}", key),
                    ));
                }
                break;
            }
            let value = scanner.value();
            scanner.skip_comma();
            overlay.apply(key, value, ratio_scale, strict)?;
        }

        if overlay.offset_ratio.is_zero() {
            overlay.offset_max = Point::ZERO;
        }

        let rest = scanner.rest();
        overlay.path = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        };
        Ok(overlay)
    }

    fn apply(
        &mut self,
        key: &str,
        value: &str,
        ratio_scale: i32,
        strict: bool,
    ) -> Result<(), FluxError> {
        if self.layout.apply(key, value, ratio_scale)? {
            return Ok(());
        }

        match key {
            "x" => self.offset.x = parse_offset("x", value)?,
            "y" => self.offset.y = parse_offset("y", value)?,
            "xr" => {
                self.offset_ratio.x = parse_ratio(value, ratio_scale)
                    .ok_or_else(|| FluxError::invalid_value("x ratio", value))?;
                self.offset_max = Point::new(ratio_scale, ratio_scale);
            }
            "yr" => {
                self.offset_ratio.y = parse_ratio(value, ratio_scale)
                    .ok_or_else(|| FluxError::invalid_value("y ratio", value))?;
                self.offset_max = Point::new(ratio_scale, ratio_scale);
            }
            "lg" => {
                self.overlay_origin = value
                    .parse::<i64>()
                    .ok()
                    .and_then(Origin::from_wire)
                    .ok_or_else(|| FluxError::invalid_value("overlay origin", value))?
            }
            "mask" => {
                let (mask, padding) = parse_mask(value)?;
                self.mask_type = Some(mask);
                self.padding_mode = padding;
            }
            _ if strict => {
                return Err(FluxError::malformed(
                    "overlay",
                    format!("unknown key {:?}", key),
                ))
            }
            _ => debug!(key = key, "Ignoring unknown overlay parameter"),
        }
        Ok(())
    }

    /// Appends the encoded overlay, without the surrounding `l=(` and `)`
    pub fn append(&self, buf: &mut String, sep: Separator) {
        let mut w = PairWriter::new(buf, sep);
        self.layout.append_size(&mut w);
        self.layout.append_fit(&mut w);
        self.layout.append_framing(&mut w);
        self.layout.append_rotation(&mut w);

        if !self.offset.is_zero() {
            w.int("x", self.offset.x as i64);
            w.int("y", self.offset.y as i64);
        }
        if !self.offset_ratio.is_zero() && self.offset_max.x != 0 && self.offset_max.y != 0 {
            w.float("xr", ratio(self.offset_ratio.x, self.offset_max.x));
            w.float("yr", ratio(self.offset_ratio.y, self.offset_max.y));
        }
        if self.overlay_origin != Origin::Default {
            w.int("lg", self.overlay_origin.to_wire());
        }
        if let Some(mask) = self.mask_type {
            w.pair("mask", |buf| {
                buf.push_str(mask.as_str());
                if let Some(padding) = self.padding_mode.to_wire() {
                    buf.push(':');
                    push_int(buf, padding);
                }
            });
        }

        let buf = w.finish();
        if self.path.is_empty() {
            return;
        }
        if !self.path.starts_with('/') {
            buf.push_str(ESCAPED_SLASH);
        }
        push_path_escaped(buf, &self.path);
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.append(&mut buf, Separator::Literal);
        f.write_str(&buf)
    }
}

fn parse_offset(param: &str, value: &str) -> Result<i32, FluxError> {
    value
        .parse::<i32>()
        .map_err(|_| FluxError::invalid_value(param, value))
}

/// `white`, `black` or `alpha`, optionally followed by `:<padding mode>`
fn parse_mask(value: &str) -> Result<(MaskType, PaddingMode), FluxError> {
    let invalid = || FluxError::invalid_value("mask", value);
    let (mask, padding) = match value.split_once(':') {
        Some((mask, padding)) => {
            let padding = padding
                .parse::<i64>()
                .ok()
                .and_then(PaddingMode::from_wire)
                .ok_or_else(invalid)?;
            (mask, padding)
        }
        None => (value, PaddingMode::Default),
    };
    let mask = MaskType::from_wire(mask).ok_or_else(invalid)?;
    Ok((mask, padding))
}

/// Scanner over an already unescaped overlay blob
struct Scanner<'a> {
    s: &'a str,
    idx: usize,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, idx: 0 }
    }

    /// Reads up to `=`, `,` or `/`. The flag is true if `=` was found and consumed.
    fn key(&mut self) -> (&'a str, bool) {
        let s = self.s;
        let start = self.idx;
        for (i, b) in s.bytes().enumerate().skip(start) {
            match b {
                b'=' => {
                    self.idx = i + 1;
                    return (&s[start..i], true);
                }
                b'/' | b',' => {
                    self.idx = i;
                    return (&s[start..i], false);
                }
                _ => {}
            }
        }
        self.idx = s.len();
        (&s[start..], false)
    }

    fn value(&mut self) -> &'a str {
        let s = self.s;
        let start = self.idx;
        let end = s[start..]
            .find(&[',', '/'][..])
            .map_or(s.len(), |offset| start + offset);
        self.idx = end;
        &s[start..end]
    }

    fn skip_comma(&mut self) {
        if self.s[self.idx..].starts_with(',') {
            self.idx += 1;
        }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.idx..]
    }
}
