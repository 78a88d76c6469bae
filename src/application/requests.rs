//! Transport-agnostic request/response shapes consumed by the scene service.
//! How these arrive at the service boundary is up to the hosting framework.

use serde::{Deserialize, Serialize};

use crate::domains::scene::{ClusterSpec, Obstacle, Position};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub peds: Vec<ClusterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespawnRequest {
    pub peds: Vec<ClusterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPolygonsRequest {
    pub polygons: Vec<ClusterSpec>,
}

/// Shared response of the spawn/respawn family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnResponse {
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RemoveAllRequest {
    pub flag: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RemoveAllResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddObstaclesRequest {
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AddObstaclesResponse {
    pub finished: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub pattern_waypoints: Vec<Position>,
    pub episode: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    pub waypoints: Vec<Position>,
    pub finished: bool,
}
