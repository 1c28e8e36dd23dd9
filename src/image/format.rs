//! Output format tokens and the pass-through format set

use std::borrow::Cow;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::FluxError;

/// Output format token sent as `f=`
///
/// Tokens are lowercase words joined by `:` (`webp:auto`), so arbitrary text
/// can never be smuggled into the parameter block through this field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Format(Cow<'static, str>);

impl Format {
    /// Same format as the input image
    pub const AUTO: Format = Format(Cow::Borrowed("auto"));
    pub const JPEG: Format = Format(Cow::Borrowed("jpg"));
    pub const PNG: Format = Format(Cow::Borrowed("png"));
    pub const GIF: Format = Format(Cow::Borrowed("gif"));
    pub const WEBP: Format = Format(Cow::Borrowed("webp"));
    /// WebP when the client accepts it, otherwise the input format
    pub const WEBP_AUTO: Format = Format(Cow::Borrowed("webp:auto"));
    /// WebP when the client accepts it, otherwise JPEG
    pub const WEBP_JPEG: Format = Format(Cow::Borrowed("webp:jpg"));
    /// WebP when the client accepts it, otherwise PNG
    pub const WEBP_PNG: Format = Format(Cow::Borrowed("webp:png"));
    /// WebP when the client accepts it, otherwise GIF
    pub const WEBP_GIF: Format = Format(Cow::Borrowed("webp:gif"));
    /// Older spelling of [`Format::WEBP_JPEG`]
    pub const WEBP_FROM_JPEG: Format = Format(Cow::Borrowed("webp:jpeg"));

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid_token(s: &str) -> bool {
        !s.is_empty()
            && s
                .split(':')
                .all(|word| !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase()))
    }
}

impl FromStr for Format {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid_token(s) {
            return Err(FluxError::invalid_value("format", s));
        }
        Ok(Format(Cow::Owned(s.to_string())))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of input formats that skip conversion, sent as `through=jpg:png`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Through(u8);

impl Through {
    pub const NONE: Through = Through(0);
    pub const JPEG: Through = Through(1 << 0);
    pub const PNG: Through = Through(1 << 1);
    pub const GIF: Through = Through(1 << 2);
    pub const WEBP: Through = Through(1 << 3);

    /// Wire order of the tokens
    const TOKENS: [(Through, &'static str); 4] = [
        (Through::JPEG, "jpg"),
        (Through::PNG, "png"),
        (Through::GIF, "gif"),
        (Through::WEBP, "webp"),
    ];

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Through) -> bool {
        self.0 & other.0 == other.0
    }

    /// Appends the colon-joined tokens in canonical order
    pub fn append(self, buf: &mut String) {
        let mut first = true;
        for (flag, token) in Self::TOKENS {
            if self.contains(flag) {
                if !first {
                    buf.push(':');
                }
                buf.push_str(token);
                first = false;
            }
        }
    }

    /// Parses colon-joined tokens. Unknown tokens are ignored.
    pub fn parse(s: &str) -> Through {
        let mut t = Through::NONE;
        for word in s.split(':') {
            if let Some((flag, _)) = Self::TOKENS.iter().find(|(_, token)| *token == word) {
                t |= *flag;
            }
        }
        t
    }
}

impl BitOr for Through {
    type Output = Through;

    fn bitor(self, rhs: Through) -> Through {
        Through(self.0 | rhs.0)
    }
}

impl BitOrAssign for Through {
    fn bitor_assign(&mut self, rhs: Through) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Through {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.append(&mut buf);
        f.write_str(&buf)
    }
}
