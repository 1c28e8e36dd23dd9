//! Unsharp mask and blur sub-values
//!
//! Both use a small fixed grammar inside one parameter value:
//! `unsharp=<radius>x<sigma>[+<gain>+<threshold>]` and
//! `blur=<radius>x<sigma>`.

use crate::codec::{push_float, push_int};
use crate::error::FluxError;

/// Unsharp mask filter; a zero radius means "not set"
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Unsharp {
    pub radius: i32,
    pub sigma: f64,
    pub gain: f64,
    /// Must be in (0, 1) when set; zero omits gain and threshold
    pub threshold: f64,
}

impl Unsharp {
    pub fn is_set(&self) -> bool {
        self.radius != 0
    }

    pub fn append(&self, buf: &mut String) {
        push_int(buf, self.radius as i64);
        buf.push('x');
        push_float(buf, self.sigma);
        if self.threshold != 0.0 {
            buf.push('+');
            push_float(buf, self.gain);
            buf.push('+');
            push_float(buf, self.threshold);
        }
    }

    pub fn parse(s: &str) -> Result<Self, FluxError> {
        let invalid = || FluxError::invalid_value("unsharp", s);

        let (radius, rest) = s.split_once('x').ok_or_else(invalid)?;
        let radius = parse_radius(radius).ok_or_else(invalid)?;

        let Some((sigma, rest)) = rest.split_once('+') else {
            let sigma = parse_positive(rest).ok_or_else(invalid)?;
            return Ok(Unsharp {
                radius,
                sigma,
                ..Default::default()
            });
        };
        let sigma = parse_positive(sigma).ok_or_else(invalid)?;

        let (gain, threshold) = rest.split_once('+').ok_or_else(invalid)?;
        let gain = parse_finite(gain).ok_or_else(invalid)?;
        let threshold = parse_finite(threshold).ok_or_else(invalid)?;
        if threshold <= 0.0 || threshold >= 1.0 {
            return Err(invalid());
        }

        Ok(Unsharp {
            radius,
            sigma,
            gain,
            threshold,
        })
    }
}

/// Gaussian blur filter; a zero radius means "not set"
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Blur {
    pub radius: i32,
    pub sigma: f64,
}

impl Blur {
    pub fn is_set(&self) -> bool {
        self.radius != 0
    }

    pub fn append(&self, buf: &mut String) {
        push_int(buf, self.radius as i64);
        buf.push('x');
        push_float(buf, self.sigma);
    }

    pub fn parse(s: &str) -> Result<Self, FluxError> {
        let invalid = || FluxError::invalid_value("blur", s);

        let (radius, sigma) = s.split_once('x').ok_or_else(invalid)?;
        let radius = parse_radius(radius).ok_or_else(invalid)?;
        let sigma = parse_positive(sigma).ok_or_else(invalid)?;
        Ok(Blur { radius, sigma })
    }
}

fn parse_radius(s: &str) -> Option<i32> {
    s.parse::<i32>().ok().filter(|r| *r > 0)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_positive(s: &str) -> Option<f64> {
    parse_finite(s).filter(|v| *v > 0.0)
}
