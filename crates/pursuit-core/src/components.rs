//! Simulated entities: robots and the target they chase.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::controller::{Command, Controller, Gains, TrackingErrors};
use crate::enums::{ControllerKind, EntityKind};
use crate::error::{SimError, SimResult};
use crate::geometry;
use crate::proximity::{self, ProximityRule, Respawn};
use crate::state::{CircleView, LineView, RobotTelemetry};
use crate::types::{Rgb, Vec2};

/// Arena bounds. The target always respawns inside them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f64, height: f64) -> SimResult<Self> {
        let arena = Self { width, height };
        arena.validate()?;
        Ok(arena)
    }

    pub fn validate(&self) -> SimResult<()> {
        let ok = |v: f64| (1.0..=ARENA_MAX_EXTENT).contains(&v);
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(SimError::InvalidArena {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Whether `point` lies inside the arena (edges included).
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// The point every robot steers toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Centre of the target.
    pub position: Vec2,
    /// Render diameter.
    pub size: f64,
    pub color: Rgb,
    /// How many times the target has been reached and moved.
    pub respawns: u64,
}

impl Target {
    pub fn new(position: Vec2, size: f64) -> SimResult<Self> {
        if !(size.is_finite() && size >= 0.0) {
            return Err(SimError::InvalidSize(size));
        }
        Ok(Self {
            position,
            size,
            color: Rgb(0, 247, 255),
            respawns: 0,
        })
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Move to a uniformly random integer position that keeps the whole
    /// circle inside `arena`.
    pub fn respawn<R: Rng>(&mut self, arena: &Arena, rng: &mut R) {
        let half = self.size / 2.0;
        let mut draw = |extent: f64| {
            let span = (extent - self.size).max(0.0).floor() as u64;
            rng.gen_range(0..=span) as f64 + half.min(extent / 2.0)
        };

        self.position = Vec2::new(draw(arena.width), draw(arena.height));
        self.respawns += 1;
    }

    pub fn circle(&self) -> CircleView {
        CircleView {
            center: self.position,
            radius: self.size / 2.0,
            color: self.color,
        }
    }
}

/// A robot steering toward the target with a fixed controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    /// Centre of the robot.
    pub position: Vec2,
    /// Unit facing direction.
    heading: Vec2,
    /// Speed applied on the last tick (units per tick).
    pub velocity: f64,
    /// Rotation applied on the last tick (radians).
    pub rotation: f64,
    /// Velocity saturation bound.
    pub max_velocity: f64,
    /// Render diameter.
    pub size: f64,
    pub color: Rgb,
    controller: Controller,
}

impl Robot {
    /// Create a robot at `position` facing along `heading` (any non-zero
    /// vector; it is normalized).
    pub fn new(position: Vec2, heading: Vec2, kind: ControllerKind) -> SimResult<Self> {
        let heading = geometry::normalize(heading).ok_or(SimError::DegenerateHeading)?;
        Ok(Self {
            position,
            heading,
            velocity: 0.0,
            rotation: 0.0,
            max_velocity: MAX_VELOCITY,
            size: ROBOT_SIZE,
            color: Rgb(255, 0, 0),
            controller: Controller::new(kind, Gains::default()),
        })
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_gains(mut self, gains: Gains) -> Self {
        let limit = self.controller.integral_limit();
        self.controller = Controller::new(self.controller.kind(), gains).with_integral_limit(limit);
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: f64) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_integral_limit(mut self, limit: Option<f64>) -> Self {
        self.controller = self.controller.with_integral_limit(limit);
        self
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Angle and distance errors against a target position. Pure.
    pub fn measure(&self, target: Vec2) -> TrackingErrors {
        TrackingErrors {
            angle: geometry::signed_angle(target - self.position, self.heading),
            distance: geometry::distance(self.position, target),
        }
    }

    /// Run one control step against `target`.
    ///
    /// Errors are measured before the proximity check, so a respawn triggered
    /// here only affects robots updated after this one.
    pub fn update<R: Rng>(
        &mut self,
        target: &mut Target,
        rule: &ProximityRule,
        rng: &mut R,
    ) -> Option<Respawn> {
        let errors = self.measure(target.position);
        let respawn = proximity::maybe_respawn(target, errors.distance, rule, rng);

        let Command { rotation, velocity } = self.controller.step(errors);
        self.rotation = rotation;
        self.velocity = velocity.min(self.max_velocity);
        self.advance();

        respawn
    }

    /// Rotate the heading by the current rotation, then integrate position.
    fn advance(&mut self) {
        if let Some(heading) = geometry::normalize(geometry::rotate(self.heading, self.rotation)) {
            self.heading = heading;
        }
        self.position += self.velocity * self.heading;
    }

    pub fn circle(&self) -> CircleView {
        CircleView {
            center: self.position,
            radius: self.size / 2.0,
            color: self.color,
        }
    }

    /// Heading indicator segment drawn from the centre.
    pub fn heading_line(&self) -> LineView {
        LineView {
            start: self.position,
            end: self.position + self.heading * HEADING_LINE_LENGTH,
            color: Rgb::WHITE,
            width: HEADING_LINE_WIDTH,
        }
    }

    pub fn telemetry(&self) -> RobotTelemetry {
        RobotTelemetry {
            controller: self.controller.kind(),
            heading: self.heading,
            velocity: self.velocity,
            rotation: self.rotation,
        }
    }
}

/// Anything the simulation registry can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Robot(Robot),
    Target(Target),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Robot(_) => EntityKind::Robot,
            Entity::Target(_) => EntityKind::Target,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Entity::Robot(robot) => robot.position,
            Entity::Target(target) => target.position,
        }
    }
}

impl From<Robot> for Entity {
    fn from(robot: Robot) -> Self {
        Entity::Robot(robot)
    }
}

impl From<Target> for Entity {
    fn from(target: Target) -> Self {
        Entity::Target(target)
    }
}
