use std::collections::HashMap;

use crate::roi::{AbsoluteRoi, RelativeRoi, RoiMode, RoiSpec};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RoiRequestError {
    #[error("Specify mode=absolute or mode=relative")]
    MissingMode,
    #[error("Specify mode=absolute or mode=relative (got '{0}')")]
    UnknownMode(String),
    #[error("Invalid value for '{field}': '{value}'")]
    BadNumber { field: &'static str, value: String },
}

/// Turns `/set_roi` query parameters into an override.
///
/// Absolute values are read as decimals and truncated to whole pixels;
/// omitted fields fall back to `x=0,y=0,w=1,h=1` or `l=0,t=0,r=1,b=1`.
pub fn parse(params: &HashMap<String, String>) -> Result<RoiSpec, RoiRequestError> {
    let mode = params
        .get("mode")
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .ok_or(RoiRequestError::MissingMode)?;
    let mode: RoiMode = mode.parse().map_err(RoiRequestError::UnknownMode)?;

    let spec = match mode {
        RoiMode::Absolute => RoiSpec::Absolute(AbsoluteRoi::new(
            number(params, "x", 0.0)? as i32,
            number(params, "y", 0.0)? as i32,
            number(params, "w", 1.0)? as i32,
            number(params, "h", 1.0)? as i32,
        )),
        RoiMode::Relative => RoiSpec::Relative(RelativeRoi::new(
            number(params, "l", 0.0)?,
            number(params, "t", 0.0)?,
            number(params, "r", 1.0)?,
            number(params, "b", 1.0)?,
        )),
    };
    Ok(spec)
}

fn number(
    params: &HashMap<String, String>,
    field: &'static str,
    default: f64,
) -> Result<f64, RoiRequestError> {
    let Some(raw) = params.get(field) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RoiRequestError::BadNumber {
            field,
            value: raw.clone(),
        })
}

pub fn applied_message(spec: &RoiSpec) -> String {
    match spec {
        RoiSpec::Absolute(roi) => {
            format!("Applied ABS_ROI=({},{},{},{})", roi.x, roi.y, roi.w, roi.h)
        }
        RoiSpec::Relative(roi) => format!(
            "Applied REL_ROI=({:.6},{:.6},{:.6},{:.6})",
            roi.left, roi.top, roi.right, roi.bottom
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_absolute_truncates_decimals() {
        let spec = parse(&params(&[
            ("mode", "absolute"),
            ("x", "10.9"),
            ("y", "-3.5"),
            ("w", "200"),
            ("h", "100"),
        ]))
        .unwrap();
        assert_eq!(spec, RoiSpec::Absolute(AbsoluteRoi::new(10, -3, 200, 100)));
    }

    #[test]
    fn test_absolute_defaults() {
        let spec = parse(&params(&[("mode", "ABSOLUTE")])).unwrap();
        assert_eq!(spec, RoiSpec::Absolute(AbsoluteRoi::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_relative_defaults_cover_window() {
        let spec = parse(&params(&[("mode", "relative"), ("l", "0.25")])).unwrap();
        assert_eq!(spec, RoiSpec::Relative(RelativeRoi::new(0.25, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_missing_mode() {
        assert_eq!(parse(&params(&[("x", "1")])), Err(RoiRequestError::MissingMode));
        assert_eq!(parse(&params(&[("mode", "")])), Err(RoiRequestError::MissingMode));
    }

    #[test]
    fn test_unknown_mode() {
        assert_eq!(
            parse(&params(&[("mode", "polar")])),
            Err(RoiRequestError::UnknownMode("polar".to_string()))
        );
    }

    #[test]
    fn test_bad_number() {
        let err = parse(&params(&[("mode", "relative"), ("r", "wide")])).unwrap_err();
        assert_eq!(
            err,
            RoiRequestError::BadNumber {
                field: "r",
                value: "wide".to_string()
            }
        );
        assert!(parse(&params(&[("mode", "absolute"), ("x", "NaN")])).is_err());
    }

    #[test]
    fn test_applied_messages() {
        assert_eq!(
            applied_message(&RoiSpec::Absolute(AbsoluteRoi::new(1, 2, 3, 4))),
            "Applied ABS_ROI=(1,2,3,4)"
        );
        assert_eq!(
            applied_message(&RoiSpec::Relative(RelativeRoi::new(0.5, 0.25, 1.0, 0.75))),
            "Applied REL_ROI=(0.500000,0.250000,1.000000,0.750000)"
        );
    }
}
