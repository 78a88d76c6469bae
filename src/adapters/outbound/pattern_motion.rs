use async_trait::async_trait;

use crate::common::DomainResult;
use crate::domains::scene::{MotionEngine, Position};

/// Episode-keyed motion engine: rotates the requested pattern so each episode
/// starts the clusters on a different waypoint of the same pattern.
pub struct PatternMotionEngine;

#[async_trait]
impl MotionEngine for PatternMotionEngine {
    async fn move_clusters(
        &self,
        pattern_waypoints: &[Position],
        episode: i32,
    ) -> DomainResult<Vec<Position>> {
        if pattern_waypoints.is_empty() {
            return Ok(Vec::new());
        }
        let shift = episode.rem_euclid(pattern_waypoints.len() as i32) as usize;
        let mut rotated = pattern_waypoints.to_vec();
        rotated.rotate_left(shift);
        Ok(rotated)
    }
}
