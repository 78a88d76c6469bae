use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};

pub type AgentId = u64;

/// Identifier of the externally controlled agent. It is part of the scene
/// before this crate runs and is never created or removed here.
pub const RESERVED_AGENT_ID: AgentId = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentType {
    Adult,
    Child,
    Elder,
    Vehicle,
    Polygon,
}

impl AgentType {
    /// Maps the numeric tag carried by simulator requests.
    pub fn from_tag(tag: u8) -> DomainResult<Self> {
        match tag {
            0 => Ok(AgentType::Adult),
            1 => Ok(AgentType::Child),
            2 => Ok(AgentType::Elder),
            3 => Ok(AgentType::Vehicle),
            4 => Ok(AgentType::Polygon),
            other => Err(DomainError::InvalidCommand {
                reason: format!("unknown agent type tag {}", other),
            }),
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, AgentType::Polygon)
    }

    /// Spatial distribution spread used when placing cluster members.
    /// Polygon shapes get a wider box than pedestrians.
    pub fn spread(&self) -> (f64, f64) {
        if self.is_polygon() {
            (4.0, 4.0)
        } else {
            (2.0, 2.0)
        }
    }
}

/// Waypoint behavior is fixed to `Simple` for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointBehavior {
    Simple,
}

/// A named circular target area agents steer towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub position: Position,
    pub radius: f64,
    pub behavior: WaypointBehavior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub agent_type: AgentType,
    pub position: Position,
    pub waypoint_ids: Vec<String>,
}

/// A batch-spawn grouping of agents sharing position, spread and waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCluster {
    pub position: Position,
    pub count: usize,
    pub spread: (f64, f64),
    pub agent_type: AgentType,
    pub waypoint_ids: Vec<String>,
}

/// An immutable static obstacle, stored as a line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub start: Position,
    pub end: Position,
}

/// Outbound record describing one backend-spawnable model. Produced by the
/// cluster builder and handed straight to the backend; never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub resource_path: String,
    pub name: String,
    pub namespace: String,
    pub pose: Position,
}

/// One waypoint triple of an incoming specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointSpec {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Incoming batch specification (the PedSpec / ZeroAgentSpec wire shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub id: u32,
    pub position: Position,
    pub count: usize,
    pub agent_type: AgentType,
    pub resource_path: String,
    pub waypoints: Vec<WaypointSpec>,
}
