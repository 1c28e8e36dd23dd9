//! Points, rectangles and colors as they appear in parameter values
//!
//! The zero value of every type here means "not set": an all-zero rectangle
//! cannot be expressed on the wire.

use crate::codec::{push_float, push_hex_byte, push_int};
use crate::error::FluxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Axis-aligned rectangle; `min` is inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Builds a rectangle, swapping coordinates so that `min <= max`
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Appends `x0:y0:x1:y1` in pixels
    pub(crate) fn append_pixels(&self, buf: &mut String) {
        push_int(buf, self.min.x as i64);
        buf.push(':');
        push_int(buf, self.min.y as i64);
        buf.push(':');
        push_int(buf, self.max.x as i64);
        buf.push(':');
        push_int(buf, self.max.y as i64);
    }

    /// Appends `x0:y0:x1:y1` as fractions of `denom`
    pub(crate) fn append_ratio(&self, buf: &mut String, denom: Point) {
        push_float(buf, ratio(self.min.x, denom.x));
        buf.push(':');
        push_float(buf, ratio(self.min.y, denom.y));
        buf.push(':');
        push_float(buf, ratio(self.max.x, denom.x));
        buf.push(':');
        push_float(buf, ratio(self.max.y, denom.y));
    }
}

pub(crate) fn ratio(numerator: i32, denominator: i32) -> f64 {
    numerator as f64 / denominator as f64
}

/// Non-premultiplied RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }

    /// Appends `rrggbb` for opaque colors, `rrggbbaa` otherwise
    pub fn append_hex(&self, buf: &mut String) {
        push_hex_byte(buf, self.r);
        push_hex_byte(buf, self.g);
        push_hex_byte(buf, self.b);
        if !self.is_opaque() {
            push_hex_byte(buf, self.a);
        }
    }

    /// Parses 6 or 8 hex digits in either case
    pub fn from_hex(s: &str) -> Result<Self, FluxError> {
        let invalid = || FluxError::invalid_value("background", s);
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let v = u32::from_str_radix(s, 16).map_err(|_| invalid())?;
        match s.len() {
            6 => Ok(Color::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)),
            8 => Ok(Color::rgba(
                (v >> 24) as u8,
                (v >> 16) as u8,
                (v >> 8) as u8,
                v as u8,
            )),
            _ => Err(invalid()),
        }
    }
}
