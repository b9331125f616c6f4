//! Discrete-time steering laws.
//!
//! Each tick the robot measures two errors against the target, an angle and a
//! distance, and the controller turns them into a rotation and a raw velocity.
//! The "derivative" terms use the previous tick's error directly; no elapsed
//! time is tracked, the tick is the time unit.

use serde::{Deserialize, Serialize};

use crate::constants::{KD, KI, KP_ANGLE, KP_DISTANCE, PD_SPECIAL_RATE};
use crate::enums::ControllerKind;

/// Controller gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gains {
    /// Proportional gain on distance error.
    pub kp_distance: f64,
    /// Proportional gain on angle error.
    pub kp_angle: f64,
    /// Gain on the previous tick's error.
    pub kd: f64,
    /// Gain on the accumulated error.
    pub ki: f64,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            kp_distance: KP_DISTANCE,
            kp_angle: KP_ANGLE,
            kd: KD,
            ki: KI,
        }
    }
}

impl Gains {
    /// All gains zero; a robot with these never moves.
    pub const ZERO: Gains = Gains {
        kp_distance: 0.0,
        kp_angle: 0.0,
        kd: 0.0,
        ki: 0.0,
    };
}

/// Errors measured against the target on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingErrors {
    /// Signed angle from the heading to the target direction (radians).
    pub angle: f64,
    /// Distance from robot centre to target.
    pub distance: f64,
}

/// Output of one controller step, before velocity saturation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Command {
    /// Rotation to apply to the heading this tick (radians).
    pub rotation: f64,
    /// Requested velocity (units per tick).
    pub velocity: f64,
}

/// Per-robot controller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    kind: ControllerKind,
    gains: Gains,
    /// Errors from the previous tick (PD, PID, PD-special).
    previous: TrackingErrors,
    /// Running sums of every error seen so far (PI, PID).
    sum: TrackingErrors,
    /// Symmetric bound on the sums. `None` leaves them unbounded.
    integral_limit: Option<f64>,
}

impl Controller {
    pub fn new(kind: ControllerKind, gains: Gains) -> Self {
        Self {
            kind,
            gains,
            previous: TrackingErrors::default(),
            sum: TrackingErrors::default(),
            integral_limit: None,
        }
    }

    /// Bound the accumulated error sums to `[-limit, limit]`.
    pub fn with_integral_limit(mut self, limit: Option<f64>) -> Self {
        self.integral_limit = limit.map(f64::abs);
        self
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    pub fn integral_limit(&self) -> Option<f64> {
        self.integral_limit
    }

    /// Errors remembered from the previous tick.
    pub fn previous(&self) -> TrackingErrors {
        self.previous
    }

    /// Accumulated error sums.
    pub fn sum(&self) -> TrackingErrors {
        self.sum
    }

    /// Compute this tick's command and update the error memory.
    pub fn step(&mut self, errors: TrackingErrors) -> Command {
        let g = self.gains;
        let proportional = Command {
            rotation: g.kp_angle * errors.angle,
            velocity: g.kp_distance * errors.distance,
        };

        // PI and PID add this tick's error before using the sums.
        if self.kind.uses_integral() {
            self.accumulate(errors);
        }

        let command = match self.kind {
            ControllerKind::P => proportional,
            ControllerKind::Pd => Command {
                rotation: proportional.rotation + g.kd * self.previous.angle,
                velocity: proportional.velocity + g.kd * self.previous.distance,
            },
            ControllerKind::PdSpecial => Command {
                rotation: proportional.rotation + g.kd * self.previous.angle / PD_SPECIAL_RATE,
                velocity: proportional.velocity + g.kd * self.previous.distance / PD_SPECIAL_RATE,
            },
            ControllerKind::Pi => Command {
                rotation: proportional.rotation + g.ki * self.sum.angle,
                velocity: proportional.velocity + g.ki * self.sum.distance,
            },
            ControllerKind::Pid => Command {
                rotation: proportional.rotation
                    + g.kd * self.previous.angle
                    + g.ki * self.sum.angle,
                velocity: proportional.velocity
                    + g.kd * self.previous.distance
                    + g.ki * self.sum.distance,
            },
        };

        if self.kind.uses_previous_error() {
            self.previous = errors;
        }

        command
    }

    fn accumulate(&mut self, errors: TrackingErrors) {
        self.sum.angle += errors.angle;
        self.sum.distance += errors.distance;
        if let Some(limit) = self.integral_limit {
            self.sum.angle = self.sum.angle.clamp(-limit, limit);
            self.sum.distance = self.sum.distance.clamp(-limit, limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ERR: TrackingErrors = TrackingErrors {
        angle: 0.2,
        distance: 80.0,
    };

    #[test]
    fn test_p_has_no_memory() {
        let mut c = Controller::new(ControllerKind::P, Gains::default());
        let first = c.step(ERR);
        let second = c.step(ERR);
        assert_eq!(first, second);
        assert_eq!(c.previous(), TrackingErrors::default());
        assert_eq!(c.sum(), TrackingErrors::default());
        assert_abs_diff_eq!(first.rotation, 0.25 * 0.2);
        assert_abs_diff_eq!(first.velocity, 0.1 * 80.0);
    }

    #[test]
    fn test_pd_uses_previous_tick() {
        let mut c = Controller::new(ControllerKind::Pd, Gains::default());
        let first = c.step(ERR);
        // No previous error on the first tick.
        assert_abs_diff_eq!(first.velocity, 8.0);

        let second = c.step(TrackingErrors {
            angle: 0.1,
            distance: 40.0,
        });
        assert_abs_diff_eq!(second.rotation, 0.25 * 0.1 + 0.1 * 0.2);
        assert_abs_diff_eq!(second.velocity, 0.1 * 40.0 + 0.1 * 80.0);
        assert_eq!(
            c.previous(),
            TrackingErrors {
                angle: 0.1,
                distance: 40.0
            }
        );
        assert_eq!(c.sum(), TrackingErrors::default());
    }

    #[test]
    fn test_pd_special_scales_previous_term() {
        let mut c = Controller::new(ControllerKind::PdSpecial, Gains::default());
        c.step(ERR);
        let second = c.step(ERR);
        assert_abs_diff_eq!(second.rotation, 0.25 * 0.2 + 0.1 * 0.2 / 60.0);
        assert_abs_diff_eq!(second.velocity, 0.1 * 80.0 + 0.1 * 80.0 / 60.0);
        assert_eq!(c.sum(), TrackingErrors::default());
    }

    #[test]
    fn test_pi_accumulates_before_use() {
        let mut c = Controller::new(ControllerKind::Pi, Gains::default());
        let first = c.step(ERR);
        assert_abs_diff_eq!(first.velocity, 0.1 * 80.0 + 0.075 * 80.0);
        assert_abs_diff_eq!(first.rotation, 0.25 * 0.2 + 0.075 * 0.2);
        // PI does not record the previous error.
        assert_eq!(c.previous(), TrackingErrors::default());
    }

    #[test]
    fn test_integral_is_exact_running_sum() {
        for kind in [ControllerKind::Pi, ControllerKind::Pid] {
            let mut c = Controller::new(kind, Gains::default());
            let n = 25;
            for _ in 0..n {
                c.step(ERR);
            }
            let mut expected_angle = 0.0;
            let mut expected_distance = 0.0;
            for _ in 0..n {
                expected_angle += ERR.angle;
                expected_distance += ERR.distance;
            }
            assert_eq!(c.sum().angle, expected_angle, "{kind}");
            assert_eq!(c.sum().distance, expected_distance, "{kind}");
        }
    }

    #[test]
    fn test_pid_combines_all_terms() {
        let mut c = Controller::new(ControllerKind::Pid, Gains::default());
        c.step(ERR);
        let second = c.step(ERR);
        assert_abs_diff_eq!(
            second.velocity,
            0.1 * 80.0 + 0.1 * 80.0 + 0.075 * 160.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            second.rotation,
            0.25 * 0.2 + 0.1 * 0.2 + 0.075 * 0.4,
            epsilon = 1e-12
        );
        assert_eq!(c.previous(), ERR);
    }

    #[test]
    fn test_integral_limit_bounds_sums() {
        let mut c =
            Controller::new(ControllerKind::Pid, Gains::default()).with_integral_limit(Some(100.0));
        for _ in 0..10 {
            c.step(ERR);
        }
        assert_eq!(c.sum().distance, 100.0);
        assert_abs_diff_eq!(c.sum().angle, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_only_integral_laws_keep_sums() {
        for kind in ControllerKind::ALL {
            let mut c = Controller::new(kind, Gains::default());
            c.step(ERR);
            c.step(ERR);
            let expected = if kind.uses_integral() {
                TrackingErrors {
                    angle: 0.4,
                    distance: 160.0,
                }
            } else {
                TrackingErrors::default()
            };
            assert_abs_diff_eq!(c.sum().angle, expected.angle, epsilon = 1e-12);
            assert_eq!(c.sum().distance, expected.distance, "{kind}");
        }
        assert!(ControllerKind::Pi.uses_integral());
        assert!(ControllerKind::Pid.uses_integral());
        assert!(!ControllerKind::PdSpecial.uses_integral());
    }

    #[test]
    fn test_zero_gains_command_nothing() {
        for kind in ControllerKind::ALL {
            let mut c = Controller::new(kind, Gains::ZERO);
            for _ in 0..5 {
                assert_eq!(c.step(ERR), Command::default());
            }
        }
    }
}
