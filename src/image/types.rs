//! Enumerated transformation options
//!
//! Each enum keeps an explicit table between variants and the integers the
//! proxy expects on the wire. Several of these tables are not the natural
//! zero-based ordering (aspect mode is shifted by one, rotation uses `auto`),
//! so nothing here is derived from discriminants.

use std::fmt;

/// How the image is fitted into the requested width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectMode {
    /// Not sent; the proxy decides
    #[default]
    Default,
    /// Keep the aspect ratio and scale to fit inside the box
    Scale,
    /// Ignore the aspect ratio
    ForceScale,
    /// Keep the aspect ratio and crop the overflow
    Crop,
    /// Keep the aspect ratio and pad with the background color
    Pad,
}

impl AspectMode {
    /// Wire value for `a=`; `None` for the default, which is never sent
    pub fn to_wire(self) -> Option<i64> {
        match self {
            Self::Default => None,
            Self::Scale => Some(0),
            Self::ForceScale => Some(1),
            Self::Crop => Some(2),
            Self::Pad => Some(3),
        }
    }

    pub fn from_wire(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::Scale),
            1 => Some(Self::ForceScale),
            2 => Some(Self::Crop),
            3 => Some(Self::Pad),
            _ => None,
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Scale => "scale",
            Self::ForceScale => "force-scale",
            Self::Crop => "crop",
            Self::Pad => "pad",
        })
    }
}

/// Anchor position used for clipping, padding and overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Origin {
    #[default]
    Default,
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Origin {
    pub fn to_wire(self) -> i64 {
        match self {
            Self::Default => 0,
            Self::TopLeft => 1,
            Self::TopCenter => 2,
            Self::TopRight => 3,
            Self::MiddleLeft => 4,
            Self::MiddleCenter => 5,
            Self::MiddleRight => 6,
            Self::BottomLeft => 7,
            Self::BottomCenter => 8,
            Self::BottomRight => 9,
        }
    }

    pub fn from_wire(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::Default),
            1 => Some(Self::TopLeft),
            2 => Some(Self::TopCenter),
            3 => Some(Self::TopRight),
            4 => Some(Self::MiddleLeft),
            5 => Some(Self::MiddleCenter),
            6 => Some(Self::MiddleRight),
            7 => Some(Self::BottomLeft),
            8 => Some(Self::BottomCenter),
            9 => Some(Self::BottomRight),
            _ => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleCenter => "middle-center",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        })
    }
}

/// Orientation transform, numbered like the Exif Orientation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotate {
    /// Not sent; same effect as `TopLeft`
    #[default]
    Default,
    /// No change
    TopLeft,
    /// Flip left and right
    TopRight,
    /// Rotate 180 degrees
    BottomRight,
    /// Flip upside down
    BottomLeft,
    /// Mirror around the diagonal axis
    LeftTop,
    /// Rotate left 90 degrees
    RightTop,
    /// Rotate 180 degrees and mirror around the diagonal axis
    RightBottom,
    /// Rotate right 90 degrees
    LeftBottom,
    /// Follow the Exif Orientation of the input image
    Auto,
}

impl Rotate {
    pub fn is_default(self) -> bool {
        self == Self::Default
    }

    pub fn to_wire(self) -> Option<i64> {
        match self {
            Self::Default | Self::Auto => None,
            Self::TopLeft => Some(1),
            Self::TopRight => Some(2),
            Self::BottomRight => Some(3),
            Self::BottomLeft => Some(4),
            Self::LeftTop => Some(5),
            Self::RightTop => Some(6),
            Self::RightBottom => Some(7),
            Self::LeftBottom => Some(8),
        }
    }

    pub fn from_wire(v: i64) -> Option<Self> {
        match v {
            1 => Some(Self::TopLeft),
            2 => Some(Self::TopRight),
            3 => Some(Self::BottomRight),
            4 => Some(Self::BottomLeft),
            5 => Some(Self::LeftTop),
            6 => Some(Self::RightTop),
            7 => Some(Self::RightBottom),
            8 => Some(Self::LeftBottom),
            _ => None,
        }
    }
}

impl fmt::Display for Rotate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::LeftTop => "left-top",
            Self::RightTop => "right-top",
            Self::RightBottom => "right-bottom",
            Self::LeftBottom => "left-bottom",
            Self::Auto => "auto",
        })
    }
}

/// Exif data kept in the output image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExifOption {
    #[default]
    Default,
    /// Remove all Exif data
    Strip,
    /// Remove everything except Orientation
    KeepOrientation,
}

impl ExifOption {
    pub fn to_wire(self) -> Option<i64> {
        match self {
            Self::Default => None,
            Self::Strip => Some(1),
            Self::KeepOrientation => Some(2),
        }
    }

    pub fn from_wire(v: i64) -> Option<Self> {
        match v {
            1 => Some(Self::Strip),
            2 => Some(Self::KeepOrientation),
            _ => None,
        }
    }
}

impl fmt::Display for ExifOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Strip => "strip",
            Self::KeepOrientation => "keep-orientation",
        })
    }
}

/// Which part of an overlay acts as the mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskType {
    /// Keep the white parts
    White,
    /// Keep the black parts
    Black,
    /// Keep the opaque parts
    Alpha,
}

impl MaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Alpha => "alpha",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "white" => Some(Self::White),
            "black" => Some(Self::Black),
            "alpha" => Some(Self::Alpha),
            _ => None,
        }
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens outside a mask smaller than the input image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaddingMode {
    /// The overflow becomes transparent
    #[default]
    Default,
    /// The overflow is left as it is
    Leave,
}

impl PaddingMode {
    pub fn to_wire(self) -> Option<i64> {
        match self {
            Self::Default => None,
            Self::Leave => Some(1),
        }
    }

    pub fn from_wire(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::Default),
            1 => Some(Self::Leave),
            _ => None,
        }
    }
}
