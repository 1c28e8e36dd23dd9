//! Imageflux URL library
//!
//! Encodes image transformation parameters into proxy URLs, parses them back
//! and signs them with HMAC-SHA256.

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod proxy;
pub mod signature;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ProxyConfig;
pub use error::FluxError;
pub use image::{parse_config, Config, Overlay, ParseOptions};
pub use proxy::{Image, Proxy};
pub use signature::Signer;
