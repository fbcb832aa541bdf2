//! Damped spring tween
//!
//! F = -k*(x - target) - c*v, a = F / m
//!
//! Damping is the absolute coefficient `c` (300/30 gives a lightly
//! underdamped settle). Integration is semi-implicit Euler in fixed sub-steps
//! of at most `SPRING_MAX_STEP_MS`, so the result does not depend on how the
//! caller slices time.

use crate::config::SpringConfig;

/// Animated scalar with spring physics
#[derive(Debug, Clone)]
pub struct Spring {
    current: f64,
    target: f64,
    velocity: f64,
    config: SpringConfig,
}

impl Spring {
    pub fn new(initial: f64, config: SpringConfig) -> Self {
        Self {
            current: initial,
            target: initial,
            velocity: 0.0,
            config,
        }
    }

    /// Start animating toward `target`, keeping current velocity
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Jump to `value` with no animation
    pub fn set_immediate(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn get(&self) -> f64 {
        self.current
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_animating(&self) -> bool {
        self.current != self.target || self.velocity != 0.0
    }

    /// Advance by `dt_ms`. Returns true if the spring came to rest during this call.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        if !self.is_animating() || dt_ms <= 0.0 {
            return false;
        }

        let mut remaining = dt_ms;
        while remaining > 0.0 {
            let step_ms = remaining.min(crate::SPRING_MAX_STEP_MS);
            remaining -= step_ms;
            let dt = step_ms / 1000.0;

            let displacement = self.current - self.target;
            let force = -self.config.stiffness * displacement - self.config.damping * self.velocity;
            let acceleration = force / self.config.mass;

            self.velocity += acceleration * dt;
            self.current += self.velocity * dt;

            if (self.current - self.target).abs() < self.config.rest_delta
                && self.velocity.abs() < self.config.rest_speed
            {
                self.current = self.target;
                self.velocity = 0.0;
                return true;
            }
        }
        false
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_rest_is_not_animating() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        assert!(!spring.is_animating());
        assert!(!spring.tick(16.0));
    }

    #[test]
    fn test_settles_on_target() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        spring.set_target(200.0);

        let mut settled = false;
        for _ in 0..120 {
            if spring.tick(16.0) {
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert_eq!(spring.get(), 200.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_moves_toward_target_early() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        spring.set_target(-200.0);
        spring.tick(50.0);
        assert!(spring.get() < 0.0);
        assert!(spring.get() > -200.0);
    }

    #[test]
    fn test_frame_size_independent() {
        let mut coarse = Spring::new(0.0, SpringConfig::default());
        let mut fine = Spring::new(0.0, SpringConfig::default());
        coarse.set_target(100.0);
        fine.set_target(100.0);

        coarse.tick(40.0);
        for _ in 0..10 {
            fine.tick(4.0);
        }
        assert!((coarse.get() - fine.get()).abs() < 1e-9);
    }

    #[test]
    fn test_set_immediate() {
        let mut spring = Spring::new(0.0, SpringConfig::default());
        spring.set_target(50.0);
        spring.tick(10.0);
        spring.set_immediate(0.0);
        assert!(!spring.is_animating());
        assert_eq!(spring.get(), 0.0);
    }
}
