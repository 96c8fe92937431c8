use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Browser viewport used while laying out a slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            device_scale_factor: 1.0,
        }
    }
}

impl Viewport {
    /// Same geometry with a different device scale factor.
    pub fn with_scale(self, device_scale_factor: f64) -> Self {
        Self {
            device_scale_factor,
            ..self
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewportParseError {
    #[error("Invalid viewport format: expected WIDTHxHEIGHT or WIDTHxHEIGHT@SCALE (e.g., 1600x900@2)")]
    InvalidFormat,
    #[error("Invalid width: {0}")]
    InvalidWidth(String),
    #[error("Invalid height: {0}")]
    InvalidHeight(String),
    #[error("Invalid scale factor: {0}")]
    InvalidScale(String),
    #[error("Width must be positive")]
    ZeroWidth,
    #[error("Height must be positive")]
    ZeroHeight,
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dims, scale) = match s.split_once('@') {
            Some((dims, scale)) => (dims, Some(scale)),
            None => (s, None),
        };

        let parts: Vec<&str> = dims.split('x').collect();
        if parts.len() != 2 {
            return Err(ViewportParseError::InvalidFormat);
        }

        let width: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidWidth(parts[0].to_string()))?;

        let height: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidHeight(parts[1].to_string()))?;

        let device_scale_factor = match scale {
            Some(raw) => {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ViewportParseError::InvalidScale(raw.to_string()))?;
                if !(value.is_finite() && value > 0.0) {
                    return Err(ViewportParseError::InvalidScale(raw.to_string()));
                }
                value
            }
            None => 1.0,
        };

        if width == 0 {
            return Err(ViewportParseError::ZeroWidth);
        }
        if height == 0 {
            return Err(ViewportParseError::ZeroHeight);
        }

        Ok(Viewport {
            width,
            height,
            device_scale_factor,
        })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)?;
        if (self.device_scale_factor - 1.0).abs() > f64::EPSILON {
            write!(f, "@{}", self.device_scale_factor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let vp: Viewport = "1600x900".parse().unwrap();
        assert_eq!(vp.width, 1600);
        assert_eq!(vp.height, 900);
        assert_eq!(vp.device_scale_factor, 1.0);
    }

    #[test]
    fn test_parse_with_scale_and_spaces() {
        let vp: Viewport = " 1920 x 1080 @ 2 ".parse().unwrap();
        assert_eq!(vp.width, 1920);
        assert_eq!(vp.height, 1080);
        assert_eq!(vp.device_scale_factor, 2.0);
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!("1600".parse::<Viewport>().is_err());
        assert!("1600x900x600".parse::<Viewport>().is_err());
        assert!("x900".parse::<Viewport>().is_err());
    }

    #[test]
    fn test_parse_invalid_scale() {
        assert!("1600x900@abc".parse::<Viewport>().is_err());
        assert!("1600x900@0".parse::<Viewport>().is_err());
        assert!("1600x900@-1".parse::<Viewport>().is_err());
    }

    #[test]
    fn test_parse_zero_dimensions() {
        assert!("0x900".parse::<Viewport>().is_err());
        assert!("1600x0".parse::<Viewport>().is_err());
    }

    #[test]
    fn test_display() {
        let vp = Viewport::default();
        assert_eq!(format!("{}", vp), "1600x900");
        assert_eq!(format!("{}", vp.with_scale(2.0)), "1600x900@2");
    }
}
