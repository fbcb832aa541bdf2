//! Pure render maps
//!
//! Rotation, opacity and the two indicator opacities are functions of the
//! horizontal offset alone. Inputs outside the mapped range clamp to the end
//! values; no offset is ever an error.

use crate::config::EngineConfig;

/// Piecewise-linear map of `x` through `input` → `output`, clamped at both ends.
///
/// `input` must be ascending and the same length as `output`; mismatched or
/// empty tables map everything to 0.
pub fn interpolate(x: f64, input: &[f64], output: &[f64]) -> f64 {
    if input.len() != output.len() {
        return 0.0;
    }
    let (Some(&first), Some(&last)) = (input.first(), input.last()) else {
        return 0.0;
    };
    if x.is_nan() {
        return output[0];
    }
    if x <= first {
        return output[0];
    }
    if x >= last {
        return output[output.len() - 1];
    }
    for i in 1..input.len() {
        if x <= input[i] {
            let span = input[i] - input[i - 1];
            if span <= 0.0 {
                return output[i];
            }
            let t = (x - input[i - 1]) / span;
            return output[i - 1] + t * (output[i] - output[i - 1]);
        }
    }
    output[output.len() - 1]
}

/// Offset → visual parameters, parameterised by the engine config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderMap {
    range: f64,
    band: f64,
    max_rotation: f64,
}

impl Default for RenderMap {
    fn default() -> Self {
        Self {
            range: crate::EXIT_DISTANCE,
            band: crate::OPAQUE_BAND,
            max_rotation: crate::MAX_ROTATION_DEG,
        }
    }
}

impl RenderMap {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            range: config.exit_distance,
            band: config.opaque_band,
            max_rotation: config.max_rotation_deg,
        }
    }

    /// [-range, range] → [-max, max] degrees
    pub fn rotation(&self, offset: f64) -> f64 {
        interpolate(
            offset,
            &[-self.range, self.range],
            &[-self.max_rotation, self.max_rotation],
        )
    }

    /// [-range, -band, 0, band, range] → [0, 1, 1, 1, 0]
    pub fn opacity(&self, offset: f64) -> f64 {
        interpolate(
            offset,
            &[-self.range, -self.band, 0.0, self.band, self.range],
            &[0.0, 1.0, 1.0, 1.0, 0.0],
        )
    }

    /// "LIKE" overlay: [0, range] → [0, 1]
    pub fn accept_opacity(&self, offset: f64) -> f64 {
        interpolate(offset, &[0.0, self.range], &[0.0, 1.0])
    }

    /// "NOPE" overlay: [-range, 0] → [1, 0]
    pub fn reject_opacity(&self, offset: f64) -> f64 {
        interpolate(offset, &[-self.range, 0.0], &[1.0, 0.0])
    }
}

pub fn rotation(offset: f64) -> f64 {
    RenderMap::default().rotation(offset)
}

pub fn opacity(offset: f64) -> f64 {
    RenderMap::default().opacity(offset)
}

pub fn accept_opacity(offset: f64) -> f64 {
    RenderMap::default().accept_opacity(offset)
}

pub fn reject_opacity(offset: f64) -> f64 {
    RenderMap::default().reject_opacity(offset)
}

/// Resting scale and lift of a card at a stack depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPlacement {
    pub scale: f64,
    pub lift: f64,
    pub visible: bool,
}

/// Placement for `depth` (0 = top). Only depth matters, never card state.
pub fn stack_placement(depth: usize, config: &EngineConfig) -> StackPlacement {
    if depth == 0 {
        StackPlacement {
            scale: 1.0,
            lift: 0.0,
            visible: true,
        }
    } else {
        StackPlacement {
            scale: config.behind_scale,
            lift: config.behind_lift,
            visible: depth < config.visible_depth,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotation_anchors() {
        assert!(close(rotation(0.0), 0.0));
        assert!(close(rotation(200.0), 25.0));
        assert!(close(rotation(-200.0), -25.0));
        assert!(close(rotation(100.0), 12.5));
    }

    #[test]
    fn test_rotation_clamped() {
        assert!(close(rotation(900.0), 25.0));
        assert!(close(rotation(-900.0), -25.0));
    }

    #[test]
    fn test_opacity_band() {
        assert!(close(opacity(0.0), 1.0));
        assert!(close(opacity(100.0), 1.0));
        assert!(close(opacity(-60.0), 1.0));
        assert!(close(opacity(150.0), 0.5));
        assert!(close(opacity(-150.0), 0.5));
        assert!(close(opacity(200.0), 0.0));
        assert!(close(opacity(-200.0), 0.0));
        assert!(close(opacity(350.0), 0.0));
    }

    #[test]
    fn test_indicators_exclusive() {
        for step in -40..=40 {
            let offset = step as f64 * 10.0;
            let like = accept_opacity(offset);
            let nope = reject_opacity(offset);
            assert!(like == 0.0 || nope == 0.0, "both visible at {}", offset);
        }
        assert!(close(accept_opacity(100.0), 0.5));
        assert!(close(reject_opacity(-100.0), 0.5));
        assert!(close(reject_opacity(-250.0), 1.0));
    }

    #[test]
    fn test_interpolate_nan_and_empty() {
        assert_eq!(interpolate(f64::NAN, &[0.0, 1.0], &[3.0, 4.0]), 3.0);
        assert_eq!(interpolate(0.5, &[], &[]), 0.0);
    }

    #[test]
    fn test_interpolate_length_mismatch() {
        assert_eq!(interpolate(50.0, &[0.0, 100.0], &[1.0]), 0.0);
        assert_eq!(interpolate(50.0, &[0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_stack_placement() {
        let config = EngineConfig::default();
        let top = stack_placement(0, &config);
        assert_eq!(top.scale, 1.0);
        assert_eq!(top.lift, 0.0);

        let behind = stack_placement(1, &config);
        assert_eq!(behind.scale, 0.95);
        assert_eq!(behind.lift, 8.0);
        assert!(behind.visible);

        assert!(stack_placement(2, &config).visible);
        assert!(!stack_placement(3, &config).visible);
    }
}
