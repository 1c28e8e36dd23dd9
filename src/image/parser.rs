//! Decoder for parameter blocks
//!
//! Input looks like `/c/w=200,h=100/images/1.jpg`. The `c/` or `c!/` prefix is
//! optional; without it a block is assumed when an `=` appears before the
//! first `/`. Pairs are separated by `,` or `%2C`. A `/` outside parentheses
//! ends the block and everything from there on is the image path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::codec::starts_with_escaped_comma;
use crate::error::FluxError;
use crate::signature::SIGNATURE_KEY;

use super::config::Config;
use super::filter::{Blur, Unsharp};
use super::format::{Format, Through};
use super::overlay::Overlay;
use super::types::ExifOption;

/// Denominator for ratio rectangles and offsets
pub const DEFAULT_RATIO_SCALE: i32 = 65536;

/// Denominator used by the earlier protocol generation
pub const LEGACY_RATIO_SCALE: i32 = 100;

/// Settings for decoding
#[derive(Debug, Clone)]
pub struct ParseOptions {
    clock: Arc<dyn Clock>,
    strict: bool,
    ratio_scale: i32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            strict: false,
            ratio_scale: DEFAULT_RATIO_SCALE,
        }
    }
}

/// Result of decoding a full request path
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath<'a> {
    pub config: Config,
    /// The image path after the parameter block
    pub rest: &'a str,
    /// The first `sig=` value, if any
    pub signature: Option<&'a str>,
    /// The bytes a signature over this path must cover
    pub signed_data: String,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `clock` for `expires` checks
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Rejects unknown keys instead of skipping them
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the denominator ratio values are scaled by; must be positive
    pub fn ratio_scale(mut self, scale: i32) -> Result<Self, FluxError> {
        if scale <= 0 {
            return Err(FluxError::config(format!(
                "ratio scale must be positive, got {}",
                scale
            )));
        }
        self.ratio_scale = scale;
        Ok(self)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn scale(&self) -> i32 {
        self.ratio_scale
    }

    /// Decodes `s` into a config and the remaining image path
    pub fn parse<'a>(&self, s: &'a str) -> Result<(Config, &'a str), FluxError> {
        let parsed = Parser::new(self, s).run(None)?;
        Ok((parsed.config, parsed.rest))
    }

    /// Decodes `s` and also rebuilds the exact bytes its signature covers
    ///
    /// The signed data is the path with every `sig=` pair removed: a leading
    /// `/`, the prefix, the remaining pairs as written, then the image path.
    /// When no pair other than `sig` is present the prefix is dropped too.
    pub fn parse_path<'a>(&self, s: &'a str) -> Result<ParsedPath<'a>, FluxError> {
        let mut signed_data = String::with_capacity(s.len() + 1);
        let mut parsed = Parser::new(self, s).run(Some(&mut signed_data))?;
        parsed.signed_data = signed_data;
        Ok(parsed)
    }
}

/// Decodes `s` with the default options
pub fn parse_config(s: &str) -> Result<(Config, &str), FluxError> {
    ParseOptions::default().parse(s)
}

struct Parser<'o, 'a> {
    options: &'o ParseOptions,
    s: &'a str,
    idx: usize,
    config: Config,
    signature: Option<&'a str>,
}

impl<'o, 'a> Parser<'o, 'a> {
    fn new(options: &'o ParseOptions, s: &'a str) -> Self {
        Self {
            options,
            s,
            idx: 0,
            config: Config::default(),
            signature: None,
        }
    }

    fn run(mut self, mut signed: Option<&mut String>) -> Result<ParsedPath<'a>, FluxError> {
        let s = self.s;
        let needs_slash = !s.starts_with('/');

        let has_block = self.has_parameter();
        debug!(has_block, len = s.len(), "Parsing path");
        if !has_block {
            if let Some(buf) = signed.as_mut() {
                if needs_slash {
                    buf.push('/');
                }
                buf.push_str(s);
            }
            return Ok(self.finish());
        }

        if let Some(buf) = signed.as_mut() {
            if needs_slash {
                buf.push('/');
            }
            buf.push_str(&s[..self.idx]);
        }

        let mut has_param = false;
        loop {
            let start = self.idx;
            let key = self.key();
            if key.is_empty() {
                break;
            }
            if !self.skip_equal() {
                return Err(FluxError::malformed(
                    "parameter",
                    format!("missing '=' after key {:?}", key),
                ));
            }
            let value = self.value()?;
            self.skip_comma();
            self.apply(key, value)?;

            if key != SIGNATURE_KEY {
                has_param = true;
                if let Some(buf) = signed.as_mut() {
                    buf.push_str(&s[start..self.idx]);
                }
            }
        }

        if let Some(buf) = signed.as_mut() {
            if has_param {
                trim_separator(buf);
            } else {
                buf.clear();
            }
            buf.push_str(self.rest());
        }

        Ok(self.finish())
    }

    fn finish(self) -> ParsedPath<'a> {
        ParsedPath {
            rest: &self.s[self.idx..],
            config: self.config,
            signature: self.signature,
            signed_data: String::new(),
        }
    }

    /// Finds the start of the parameter block, if there is one
    fn has_parameter(&mut self) -> bool {
        match parameter_start(self.s) {
            Some(idx) => {
                self.idx = idx;
                true
            }
            None => false,
        }
    }

    /// Reads up to `=` or `/`
    fn key(&mut self) -> &'a str {
        let s = self.s;
        let start = self.idx;
        let end = s[start..]
            .find(&['=', '/'][..])
            .map_or(s.len(), |offset| start + offset);
        self.idx = end;
        &s[start..end]
    }

    fn skip_equal(&mut self) -> bool {
        if self.s[self.idx..].starts_with('=') {
            self.idx += 1;
            return true;
        }
        false
    }

    /// Reads up to a separator or `/`, skipping over parenthesized groups
    ///
    /// A `)` without a matching `(`, or a group still open at the end of the
    /// input, is malformed.
    fn value(&mut self) -> Result<&'a str, FluxError> {
        let s = self.s;
        let bytes = s.as_bytes();
        let start = self.idx;
        let mut depth = 0u32;
        let mut i = start;
        while i < bytes.len() {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        FluxError::malformed(
                            "parameter",
                            format!("unbalanced ')' in {:?}", &s[start..]),
                        )
                    })?
                }
                b',' | b'/' if depth == 0 => break,
                b'%' if depth == 0 && starts_with_escaped_comma(&s[i..]) => break,
                _ => {}
            }
            i += 1;
        }
        if depth != 0 {
            return Err(FluxError::malformed(
                "parameter",
                format!("unterminated group {:?}", &s[start..]),
            ));
        }
        self.idx = i;
        Ok(&s[start..i])
    }

    fn skip_comma(&mut self) {
        let rest = &self.s[self.idx..];
        if rest.starts_with(',') {
            self.idx += 1;
        } else if starts_with_escaped_comma(rest) {
            self.idx += 3;
        }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.idx..]
    }

    fn apply(&mut self, key: &str, value: &'a str) -> Result<(), FluxError> {
        let scale = self.options.ratio_scale;
        if self.config.layout.apply(key, value, scale)? {
            return Ok(());
        }

        let config = &mut self.config;
        match key {
            "expires" => {
                let expires = DateTime::parse_from_rfc3339(value)
                    .map_err(|_| FluxError::invalid_value("expires", value))?
                    .with_timezone(&Utc);
                if expires <= self.options.clock.now() {
                    warn!(expires = %expires, "URL has expired");
                    return Err(FluxError::Expired);
                }
                config.expires = Some(expires);
            }
            "dpr" => {
                config.device_pixel_ratio = value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| FluxError::invalid_value("device pixel ratio", value))?
            }
            "through" => config.through = Through::parse(value),
            "l" => {
                let inner = single_group(value).ok_or_else(|| {
                    FluxError::malformed("overlay", format!("expected one group, got {:?}", value))
                })?;
                let overlay = Overlay::parse_with(inner, scale, self.options.strict)?;
                config.overlays.push(overlay);
            }
            "f" => config.format = Some(value.parse::<Format>()?),
            "q" => config.quality = parse_percent("quality", value)?,
            "o" => {
                config.disable_optimization = match value {
                    "0" => true,
                    "1" => false,
                    _ => return Err(FluxError::invalid_value("optimization", value)),
                }
            }
            "lossless" => config.lossless = parse_flag("lossless", value)?,
            "s" => {
                config.exif_option = value
                    .parse::<i64>()
                    .ok()
                    .and_then(ExifOption::from_wire)
                    .ok_or_else(|| FluxError::invalid_value("exif option", value))?
            }
            "unsharp" => config.unsharp = Unsharp::parse(value)?,
            "blur" => config.blur = Blur::parse(value)?,
            "grayscale" => config.grayscale = parse_percent("grayscale", value)?,
            "sepia" => config.sepia = parse_percent("sepia", value)?,
            "brightness" => config.brightness = parse_level("brightness", value)? - 100,
            "contrast" => config.contrast = parse_level("contrast", value)? - 100,
            "invert" => config.invert = parse_flag("invert", value)?,
            SIGNATURE_KEY => {
                // only the first signature counts
                if self.signature.is_none() {
                    self.signature = Some(value);
                }
            }
            _ if self.options.strict => {
                return Err(FluxError::malformed(
                    "parameter",
                    format!("unknown key {:?}", key),
                ))
            }
            _ => debug!(key = key, "Ignoring unknown parameter"),
        }
        Ok(())
    }
}

/// Index where the parameter block of `s` starts, if it has one
///
/// A block is either introduced by `c/` or `c!/` (after an optional leading
/// `/`), or assumed when an `=` appears before the first `/`.
pub(crate) fn parameter_start(s: &str) -> Option<usize> {
    let i = usize::from(s.starts_with('/'));
    let tail = &s[i..];
    if tail.starts_with("c/") {
        return Some(i + "c/".len());
    }
    if tail.starts_with("c!/") {
        return Some(i + "c!/".len());
    }

    // Pairs always contain '=', so look for one before the first '/'.
    for b in tail.bytes() {
        match b {
            b'/' => return None,
            b'=' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Contents of `(...)` when the opening parenthesis closes at the very end
fn single_group(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0u32;
    for b in inner.bytes() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    Some(inner)
}

/// Drops one trailing `,`, `%2C` or `%2c`
fn trim_separator(buf: &mut String) {
    if buf.ends_with(',') {
        buf.pop();
    } else if buf.len() >= 3 && buf.as_bytes()[buf.len() - 3..].eq_ignore_ascii_case(b"%2c") {
        buf.truncate(buf.len() - 3);
    }
}

fn parse_flag(param: &str, value: &str) -> Result<bool, FluxError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(FluxError::invalid_value(param, value)),
    }
}

fn parse_percent(param: &str, value: &str) -> Result<i32, FluxError> {
    value
        .parse::<i32>()
        .ok()
        .filter(|v| (0..=100).contains(v))
        .ok_or_else(|| FluxError::invalid_value(param, value))
}

/// Non-negative level where 100 means unchanged
fn parse_level(param: &str, value: &str) -> Result<i32, FluxError> {
    value
        .parse::<i32>()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| FluxError::invalid_value(param, value))
}
