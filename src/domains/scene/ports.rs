use std::time::Duration;

use async_trait::async_trait;

use crate::common::DomainResult;

use super::elements::{ModelDescriptor, Position};

/// Port to the rendering/physics backend that mirrors the scene.
/// Each call returns the backend's success flag; transport failures are
/// reported as errors.
#[async_trait]
pub trait BackendChannel: Send + Sync {
    /// Whether the underlying handle is currently usable.
    fn is_connected(&self) -> bool;

    /// Wait up to `wait` for the backend to become reachable again.
    /// Returns whether it did.
    async fn wait_for_backend(&self, wait: Duration) -> bool;

    /// Re-acquire the underlying handle after an outage.
    async fn reconnect(&self) -> DomainResult<()>;

    async fn spawn_models(&self, models: &[ModelDescriptor]) -> DomainResult<bool>;

    async fn respawn_models(
        &self,
        old_names: &[String],
        new_models: &[ModelDescriptor],
    ) -> DomainResult<bool>;

    async fn delete_models(&self, names: &[String]) -> DomainResult<bool>;
}

/// Port to the motion/behavior engine that recomputes cluster waypoints for
/// a movement episode. Motion simulation itself lives behind this boundary.
#[async_trait]
pub trait MotionEngine: Send + Sync {
    async fn move_clusters(
        &self,
        pattern_waypoints: &[Position],
        episode: i32,
    ) -> DomainResult<Vec<Position>>;
}
