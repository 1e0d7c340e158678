use std::sync::RwLock;

use crate::capture::Rectangle;
use crate::config::RoiConfig;

use super::{resolve, AbsoluteRoi, RelativeRoi, RoiMode, RoiSpec};

/// Compiled ROI defaults plus the override set at runtime through `/set_roi`.
///
/// Only one override can be active; installing a relative override drops an
/// absolute one and vice versa.
#[derive(Debug)]
pub struct RoiState {
    default_mode: RoiMode,
    default_absolute: AbsoluteRoi,
    default_relative: RelativeRoi,
    clamp: u32,
    runtime: RwLock<Option<RoiSpec>>,
}

/// Consistent view of [`RoiState`] taken at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiSnapshot {
    pub mode: RoiMode,
    pub spec: RoiSpec,
    pub runtime: Option<RoiSpec>,
    pub clamp: u32,
}

impl RoiState {
    pub fn new(config: &RoiConfig) -> Self {
        Self {
            default_mode: config.mode,
            default_absolute: config.absolute,
            default_relative: config.relative,
            clamp: config.clamp,
            runtime: RwLock::new(None),
        }
    }

    pub fn snapshot(&self) -> RoiSnapshot {
        let runtime = *self.runtime.read().unwrap_or_else(|e| e.into_inner());
        let spec = runtime.unwrap_or(match self.default_mode {
            RoiMode::Absolute => RoiSpec::Absolute(self.default_absolute),
            RoiMode::Relative => RoiSpec::Relative(self.default_relative),
        });
        RoiSnapshot {
            mode: spec.mode(),
            spec,
            runtime,
            clamp: self.clamp,
        }
    }

    pub fn set_override(&self, spec: RoiSpec) {
        *self.runtime.write().unwrap_or_else(|e| e.into_inner()) = Some(spec);
    }
}

impl RoiSnapshot {
    pub fn resolve(&self, window: &Rectangle) -> Rectangle {
        resolve(window, &self.spec, self.clamp)
    }

    pub fn runtime_absolute(&self) -> Option<AbsoluteRoi> {
        match self.runtime {
            Some(RoiSpec::Absolute(roi)) => Some(roi),
            _ => None,
        }
    }

    pub fn runtime_relative(&self) -> Option<RelativeRoi> {
        match self.runtime {
            Some(RoiSpec::Relative(roi)) => Some(roi),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state() -> RoiState {
        RoiState::new(&Config::default().roi)
    }

    #[test]
    fn test_defaults_used_without_override() {
        let snapshot = state().snapshot();
        assert_eq!(snapshot.mode, RoiMode::Relative);
        assert_eq!(
            snapshot.spec,
            RoiSpec::Relative(Config::default().roi.relative)
        );
        assert_eq!(snapshot.runtime, None);
    }

    #[test]
    fn test_absolute_default_mode() {
        let mut config = Config::default().roi;
        config.mode = RoiMode::Absolute;
        let snapshot = RoiState::new(&config).snapshot();
        assert_eq!(snapshot.spec, RoiSpec::Absolute(config.absolute));
    }

    #[test]
    fn test_override_supersedes_default() {
        let state = state();
        state.set_override(RoiSpec::Absolute(AbsoluteRoi::new(1, 2, 3, 4)));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.mode, RoiMode::Absolute);
        assert_eq!(snapshot.runtime_absolute(), Some(AbsoluteRoi::new(1, 2, 3, 4)));
        assert_eq!(snapshot.runtime_relative(), None);
    }

    #[test]
    fn test_overrides_are_mutually_exclusive() {
        let state = state();
        state.set_override(RoiSpec::Absolute(AbsoluteRoi::new(1, 2, 3, 4)));
        state.set_override(RoiSpec::Relative(RelativeRoi::new(0.1, 0.2, 0.3, 0.4)));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.mode, RoiMode::Relative);
        assert_eq!(snapshot.runtime_absolute(), None);
        assert_eq!(
            snapshot.runtime_relative(),
            Some(RelativeRoi::new(0.1, 0.2, 0.3, 0.4))
        );
    }

    #[test]
    fn test_snapshot_resolve_applies_clamp() {
        let mut config = Config::default().roi;
        config.clamp = 3;
        let state = RoiState::new(&config);
        state.set_override(RoiSpec::Absolute(AbsoluteRoi::new(0, 0, 10, 10)));
        let rect = state.snapshot().resolve(&Rectangle::new(0, 0, 10, 10));
        assert_eq!(rect, Rectangle::new(3, 3, 4, 4));
    }
}
