//! Engine configuration
//!
//! Every field defaults to the constant of the same name in the crate root,
//! so a config file only needs to list what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Record;

/// Spring parameters (framer-style: absolute damping coefficient, not ratio)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub rest_delta: f64,
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: crate::SPRING_STIFFNESS,
            damping: crate::SPRING_DAMPING,
            mass: crate::SPRING_MASS,
            rest_delta: crate::SPRING_REST_DELTA,
            rest_speed: crate::SPRING_REST_SPEED,
        }
    }
}

/// Gesture, animation and layout tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub commit_threshold: f64,
    pub exit_distance: f64,
    pub max_rotation_deg: f64,
    pub opaque_band: f64,
    pub drag_elastic: f64,
    /// 0 emits programmatic decisions synchronously
    pub decision_delay_ms: u64,
    pub frame_ms: u64,
    pub visible_depth: usize,
    pub behind_scale: f64,
    pub behind_lift: f64,
    pub spring: SpringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_threshold: crate::COMMIT_THRESHOLD,
            exit_distance: crate::EXIT_DISTANCE,
            max_rotation_deg: crate::MAX_ROTATION_DEG,
            opaque_band: crate::OPAQUE_BAND,
            drag_elastic: crate::DRAG_ELASTIC,
            decision_delay_ms: crate::DECISION_DELAY_MS,
            frame_ms: crate::FRAME_MS,
            visible_depth: crate::VISIBLE_DEPTH,
            behind_scale: crate::BEHIND_SCALE,
            behind_lift: crate::BEHIND_LIFT,
            spring: SpringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("commit_threshold", self.commit_threshold),
            ("exit_distance", self.exit_distance),
            ("max_rotation_deg", self.max_rotation_deg),
            ("opaque_band", self.opaque_band),
            ("drag_elastic", self.drag_elastic),
            ("behind_scale", self.behind_scale),
            ("behind_lift", self.behind_lift),
            ("spring.stiffness", self.spring.stiffness),
            ("spring.damping", self.spring.damping),
            ("spring.mass", self.spring.mass),
            ("spring.rest_delta", self.spring.rest_delta),
            ("spring.rest_speed", self.spring.rest_speed),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if !(self.commit_threshold > 0.0) {
            return Err(ConfigError::Invalid("commit_threshold must be > 0".into()));
        }
        if self.exit_distance < self.commit_threshold {
            return Err(ConfigError::Invalid(
                "exit_distance must be >= commit_threshold".into(),
            ));
        }
        if !(self.opaque_band > 0.0 && self.opaque_band < self.exit_distance) {
            return Err(ConfigError::Invalid(
                "opaque_band must be within (0, exit_distance)".into(),
            ));
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::Invalid("frame_ms must be > 0".into()));
        }
        if self.visible_depth == 0 {
            return Err(ConfigError::Invalid("visible_depth must be >= 1".into()));
        }
        if !(self.drag_elastic > 0.0) {
            return Err(ConfigError::Invalid("drag_elastic must be > 0".into()));
        }
        if !(self.behind_scale > 0.0) {
            return Err(ConfigError::Invalid("behind_scale must be > 0".into()));
        }
        // an undamped spring oscillates forever and a zero rest band never snaps
        let spring = &self.spring;
        if !(spring.stiffness > 0.0
            && spring.mass > 0.0
            && spring.damping > 0.0
            && spring.rest_delta > 0.0
            && spring.rest_speed > 0.0)
        {
            return Err(ConfigError::Invalid(
                "spring needs stiffness, damping, mass, rest_delta and rest_speed > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Load a deck (JSON array of records)
pub fn load_deck(path: impl AsRef<Path>) -> Result<Vec<Record>, ConfigError> {
    read_json(path.as_ref())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
