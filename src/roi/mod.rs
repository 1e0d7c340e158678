//! Region-of-interest handling: turning a window bounding box plus an
//! absolute or fractional ROI into the screen rectangle that gets captured.

mod resolve;
mod state;

pub use resolve::resolve;
pub use state::{RoiSnapshot, RoiState};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiMode {
    Absolute,
    Relative,
}

impl RoiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoiMode::Absolute => "absolute",
            RoiMode::Relative => "relative",
        }
    }
}

impl fmt::Display for RoiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(RoiMode::Absolute),
            "relative" => Ok(RoiMode::Relative),
            other => Err(other.to_string()),
        }
    }
}

/// Pixel rectangle measured from the window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteRoi {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl AbsoluteRoi {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn as_array(&self) -> [i32; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

/// Edges expressed as fractions of the window width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeRoi {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RelativeRoi {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoiSpec {
    Absolute(AbsoluteRoi),
    Relative(RelativeRoi),
}

impl RoiSpec {
    pub fn mode(&self) -> RoiMode {
        match self {
            RoiSpec::Absolute(_) => RoiMode::Absolute,
            RoiSpec::Relative(_) => RoiMode::Relative,
        }
    }
}
