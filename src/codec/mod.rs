//! Primitive formatting shared by the config and overlay codecs
//!
//! All encoders append into a caller-provided `String` so a whole parameter
//! block is built in one buffer. Floats use the shortest representation that
//! parses back to the same bits, which the round-trip property depends on.

pub mod pool;

use std::borrow::Cow;
use std::fmt::Write as _;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::FluxError;

pub use pool::BufferPool;

/// Characters left as-is inside a single path segment (RFC 3986 §3.3).
/// `/`, `;`, `,` and `?` are escaped so the segment can't split the path.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Escaped form of `,`
pub const ESCAPED_COMMA: &str = "%2C";

/// Escaped form of `/`
pub const ESCAPED_SLASH: &str = "%2F";

/// How pairs in a parameter block are separated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// A literal `,`
    #[default]
    Literal,
    /// `%2C`, for contexts that strip or split on bare commas
    Escaped,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Literal => ",",
            Separator::Escaped => ESCAPED_COMMA,
        }
    }

    /// Appends the separator after a `key=value` pair
    pub fn push(&self, buf: &mut String) {
        buf.push_str(self.as_str());
    }

    /// Removes one trailing separator, if the buffer grew past `start`
    pub fn trim_trailing(&self, buf: &mut String, start: usize) {
        let sep = self.as_str();
        if buf.len() >= start + sep.len() && buf.ends_with(sep) {
            buf.truncate(buf.len() - sep.len());
        }
    }
}

/// Writes `key=value` pairs, each followed by a separator, and strips the
/// last separator on [`PairWriter::finish`].
pub struct PairWriter<'a> {
    buf: &'a mut String,
    sep: Separator,
    start: usize,
}

impl<'a> PairWriter<'a> {
    pub fn new(buf: &'a mut String, sep: Separator) -> Self {
        let start = buf.len();
        Self { buf, sep, start }
    }

    pub fn separator(&self) -> Separator {
        self.sep
    }

    /// Writes `key=` then lets `f` write the value
    pub fn pair<F>(&mut self, key: &str, f: F)
    where
        F: FnOnce(&mut String),
    {
        self.buf.push_str(key);
        self.buf.push('=');
        f(&mut *self.buf);
        self.sep.push(self.buf);
    }

    pub fn int(&mut self, key: &str, v: i64) {
        self.pair(key, |buf| push_int(buf, v));
    }

    pub fn float(&mut self, key: &str, v: f64) {
        self.pair(key, |buf| push_float(buf, v));
    }

    pub fn str(&mut self, key: &str, v: &str) {
        self.pair(key, |buf| buf.push_str(v));
    }

    /// True if nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.buf.len() == self.start
    }

    /// Drops the trailing separator; returns the underlying buffer
    pub fn finish(self) -> &'a mut String {
        self.sep.trim_trailing(self.buf, self.start);
        self.buf
    }
}

pub fn push_int(buf: &mut String, v: i64) {
    // Writing into a String never fails
    let _ = write!(buf, "{}", v);
}

/// Shortest decimal that round-trips to the same `f64`, never in exponent form
pub fn push_float(buf: &mut String, v: f64) {
    let _ = write!(buf, "{}", v);
}

/// Two lowercase hex digits
pub fn push_hex_byte(buf: &mut String, b: u8) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    buf.push(DIGITS[(b >> 4) as usize] as char);
    buf.push(DIGITS[(b & 0x0f) as usize] as char);
}

/// Percent-escapes `s` for use inside one path segment
pub fn push_path_escaped(buf: &mut String, s: &str) {
    for chunk in utf8_percent_encode(s, PATH_SEGMENT) {
        buf.push_str(chunk);
    }
}

pub fn path_escape(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    push_path_escaped(&mut buf, s);
    buf
}

/// Reverses [`path_escape`]. Any `%` not followed by two hex digits is an error.
pub fn path_unescape(s: &str) -> Result<Cow<'_, str>, FluxError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(FluxError::malformed(
                    "escape",
                    format!("invalid escape sequence in {:?}", s),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(s)
        .decode_utf8()
        .map_err(|_| FluxError::malformed("escape", format!("invalid UTF-8 in {:?}", s)))
}

/// True if `s` starts with an escaped comma in either case
pub fn starts_with_escaped_comma(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 3 && b[0] == b'%' && b[1..3].eq_ignore_ascii_case(b"2c")
}

/// Splits `a:b:c:d` into its four fields. A fifth field stays glued to the
/// fourth, which then fails numeric parsing.
pub fn split4(s: &str) -> Option<(&str, &str, &str, &str)> {
    let (a, rest) = s.split_once(':')?;
    let (b, rest) = rest.split_once(':')?;
    let (c, d) = rest.split_once(':')?;
    Some((a, b, c, d))
}
