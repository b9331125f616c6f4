//! Render snapshot: the complete visible state handed to a renderer each tick.
//!
//! Plain geometric records only. Renderers consume these and never touch the
//! simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{ControllerKind, EntityKind};
use crate::events::SimEvent;
use crate::types::{EntityId, Rgb, SimTime, Vec2};

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub time: SimTime,
    /// Sorted by id.
    pub entities: Vec<EntityView>,
    /// Events raised during the tick that produced this frame.
    pub events: Vec<SimEvent>,
}

impl RenderFrame {
    pub fn entity(&self, id: EntityId) -> Option<&EntityView> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn robots(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(|e| e.kind == EntityKind::Robot)
    }
}

/// One entity on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub circle: CircleView,
    /// Heading indicator, robots only.
    pub heading_line: Option<LineView>,
    /// Controller readout, robots only.
    pub telemetry: Option<RobotTelemetry>,
}

/// Filled circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleView {
    pub center: Vec2,
    pub radius: f64,
    pub color: Rgb,
}

/// Line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineView {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Rgb,
    pub width: u32,
}

/// Per-robot controller readout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotTelemetry {
    pub controller: ControllerKind,
    pub heading: Vec2,
    pub velocity: f64,
    pub rotation: f64,
}
