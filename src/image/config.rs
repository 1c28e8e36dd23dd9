//! The top-level transformation config and its encoder
//!
//! Keys are always written in one fixed order. Proxies and other client
//! libraries compare encoded strings, so the order is part of the format.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::codec::{push_int, BufferPool, PairWriter, Separator};
use crate::error::FluxError;

use super::filter::{Blur, Unsharp};
use super::format::{Format, Through};
use super::layout::Layout;
use super::overlay::Overlay;
use super::parser::parse_config;
use super::types::ExifOption;

/// Every parameter the proxy understands, except the signature
///
/// The zero value of each field means "not set" and is never written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Size, fit, clipping, background and rotation
    pub layout: Layout,

    /// The URL stops working at this instant
    pub expires: Option<DateTime<Utc>>,

    /// Scale factor for high-density displays; 0 means unset
    pub device_pixel_ratio: f64,

    /// Input formats served without conversion
    pub through: Through,

    /// Composited in order, the first one at the bottom
    pub overlays: Vec<Overlay>,

    /// Output format; `None` has the same effect as [`Format::AUTO`]
    pub format: Option<Format>,
    /// JPEG and WebP quality, 0 to 100
    pub quality: i32,
    /// Skip Huffman table optimization for JPEG output
    pub disable_optimization: bool,
    /// Lossless WebP output
    pub lossless: bool,
    pub exif_option: ExifOption,

    pub unsharp: Unsharp,
    pub blur: Blur,
    /// 0 (none) to 100 (full)
    pub grayscale: i32,
    /// 0 (none) to 100 (full)
    pub sepia: i32,
    /// Offset from 100; the proxy receives `brightness + 100`
    pub brightness: i32,
    /// Offset from 100; the proxy receives `contrast + 100`
    pub contrast: i32,
    pub invert: bool,
}

impl Config {
    /// Parses a path with the default options, returning the config and the
    /// remaining image path
    pub fn parse(s: &str) -> Result<(Config, &str), FluxError> {
        parse_config(s)
    }

    /// True if nothing is set, so the image needs no parameter block
    pub fn is_default(&self) -> bool {
        *self == Config::default()
    }

    /// Returns an equivalent config with aliases folded and the format explicit
    ///
    /// Two configs that encode to the same string compare equal once both are
    /// normalized.
    pub fn normalized(mut self) -> Config {
        self.layout.normalize_aliases();
        for overlay in &mut self.overlays {
            overlay.layout.normalize_aliases();
        }
        if self.format.is_none() {
            self.format = Some(Format::AUTO);
        }
        self
    }

    /// Encodes into `buf`, separating pairs with `sep`
    ///
    /// A config with nothing set encodes as `f=auto`, never as an empty string.
    pub fn append(&self, buf: &mut String, sep: Separator) {
        let mut w = PairWriter::new(buf, sep);

        self.layout.append_size(&mut w);
        if let Some(expires) = self.expires {
            w.str(
                "expires",
                &expires.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            );
        }
        self.layout.append_fit(&mut w);
        if self.device_pixel_ratio != 0.0 {
            w.float("dpr", self.device_pixel_ratio);
        }

        // clipping and rotation
        self.layout.append_framing(&mut w);
        self.layout.append_rotation(&mut w);

        if !self.through.is_empty() {
            w.pair("through", |buf| self.through.append(buf));
        }

        for overlay in &self.overlays {
            w.pair("l", |buf| {
                buf.push('(');
                overlay.append(buf, sep);
                buf.push(')');
            });
        }

        // output
        if let Some(format) = &self.format {
            w.str("f", format.as_str());
        }
        if self.quality != 0 {
            w.int("q", self.quality as i64);
        }
        if self.disable_optimization {
            w.str("o", "0");
        }
        if self.lossless {
            w.str("lossless", "1");
        }
        if let Some(s) = self.exif_option.to_wire() {
            w.int("s", s);
        }

        // filters
        if self.unsharp.is_set() {
            w.pair("unsharp", |buf| self.unsharp.append(buf));
        }
        if self.blur.is_set() {
            w.pair("blur", |buf| self.blur.append(buf));
        }
        if self.grayscale != 0 {
            w.int("grayscale", self.grayscale as i64);
        }
        if self.sepia != 0 {
            w.int("sepia", self.sepia as i64);
        }
        if self.brightness != 0 {
            w.pair("brightness", |buf| push_int(buf, self.brightness as i64 + 100));
        }
        if self.contrast != 0 {
            w.pair("contrast", |buf| push_int(buf, self.contrast as i64 + 100));
        }
        if self.invert {
            w.str("invert", "1");
        }

        if w.is_empty() {
            w.str("f", Format::AUTO.as_str());
        }
        w.finish();
    }

    /// Encodes with the given separator, reusing a pooled buffer
    pub fn encode(&self, sep: Separator) -> String {
        BufferPool::global().with_buffer(|buf| self.append(buf, sep))
    }

    /// Encodes with `%2C` between pairs
    pub fn to_escaped_string(&self) -> String {
        self.encode(Separator::Escaped)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Separator::Literal))
    }
}
