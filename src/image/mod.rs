//! Image transformation parameters and their URL encoding

pub mod config;
pub mod filter;
pub mod format;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod parser;
pub mod types;

pub use config::Config;
pub use filter::{Blur, Unsharp};
pub use format::{Format, Through};
pub use geometry::{Color, Point, Rect};
pub use layout::Layout;
pub use overlay::Overlay;
pub use parser::{
    parse_config, ParseOptions, ParsedPath, DEFAULT_RATIO_SCALE, LEGACY_RATIO_SCALE,
};
pub use types::{AspectMode, ExifOption, MaskType, Origin, PaddingMode, Rotate};
