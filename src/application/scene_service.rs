use std::sync::Arc;

use tracing::info;

use crate::application::backend_sync::BackendSyncClient;
use crate::application::requests::{
    AddObstaclesRequest, AddObstaclesResponse, MoveRequest, MoveResponse, RemoveAllRequest,
    RemoveAllResponse, RespawnRequest, SpawnPolygonsRequest, SpawnRequest, SpawnResponse,
};
use crate::common::{ApplicationResult, DomainError};
use crate::domains::scene::{
    ClusterBuilder, ClusterSpec, IdAllocator, ModelDescriptor, MotionEngine, RemovalFilter,
    SceneRegistry,
};
use crate::domains::DynLogger;

/// Orchestrates registry mutations and backend synchronization for the scene
/// operation catalogue. Operations run one at a time; the registry is owned
/// exclusively by this service.
pub struct SceneService {
    registry: SceneRegistry,
    ids: IdAllocator,
    backend: BackendSyncClient,
    motion: Arc<dyn MotionEngine>,
    logger: DynLogger,
}

impl SceneService {
    pub fn new(
        backend: BackendSyncClient,
        motion: Arc<dyn MotionEngine>,
        logger: DynLogger,
    ) -> Self {
        Self {
            registry: SceneRegistry::new(),
            ids: IdAllocator::new(),
            backend,
            motion,
            logger,
        }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Mutable access for scene setup (e.g. seeding the reserved agent).
    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    /// Spawns one cluster per specification and mirrors them to the backend
    /// in a single call.
    pub async fn spawn_peds(&mut self, request: SpawnRequest) -> ApplicationResult<SpawnResponse> {
        let mut models = Vec::new();
        let mut builder = ClusterBuilder::new(&mut self.registry, &mut self.ids);
        for spec in &request.peds {
            models.extend(builder.build_cluster(spec)?);
        }

        let finished = self.backend.spawn(&models).await?;
        if !finished {
            self.logger
                .error(&format!("Failed to spawn all {} agents", request.peds.len()));
        }
        Ok(SpawnResponse { finished })
    }

    /// Replaces every non-reserved agent with the requested clusters. The
    /// removal pass reports pedestrian names as the backend's old-model list.
    pub async fn respawn_peds(
        &mut self,
        request: RespawnRequest,
    ) -> ApplicationResult<SpawnResponse> {
        let old_names = self.registry.remove_agents_matching(RemovalFilter::Pedestrians);
        let new_models = self.build_clusters(&request.peds, false)?;

        let finished = self.backend.respawn(&old_names, &new_models).await?;
        if !finished {
            self.logger
                .error(&format!("Failed to respawn all {} humans", request.peds.len()));
        }
        Ok(SpawnResponse { finished })
    }

    /// Removes all pedestrians from the scene and deletes them on the
    /// backend. The delete result is logged but the response always reports
    /// success; scene and backend may diverge after a failure.
    pub async fn remove_all_peds(
        &mut self,
        _request: RemoveAllRequest,
    ) -> ApplicationResult<RemoveAllResponse> {
        let names = self.registry.remove_agents_matching(RemovalFilter::Pedestrians);
        let deleted = self.backend.delete(&names).await?;
        if !deleted {
            self.logger.error(&format!(
                "Failed to delete all {} agents. Maybe a few were deleted.",
                names.len()
            ));
        }
        Ok(RemoveAllResponse { success: true })
    }

    /// Polygon counterpart of [`Self::remove_all_peds`]. The removal pass also
    /// clears pedestrian agents from the registry while only polygon names
    /// are reported to the backend; see the registry documentation.
    pub async fn remove_all_polygons(
        &mut self,
        _request: RemoveAllRequest,
    ) -> ApplicationResult<RemoveAllResponse> {
        let names = self.registry.remove_agents_matching(RemovalFilter::Polygons);
        let deleted = self.backend.delete(&names).await?;
        if !deleted {
            self.logger.error(&format!(
                "Failed to delete all {} agents. Maybe a few were deleted.",
                names.len()
            ));
        }
        Ok(RemoveAllResponse { success: true })
    }

    /// Inserts the requested static obstacles after validating every segment.
    /// No backend call is involved.
    pub async fn add_static_obstacles(
        &mut self,
        request: AddObstaclesRequest,
    ) -> ApplicationResult<AddObstaclesResponse> {
        for obstacle in &request.obstacles {
            if !obstacle.start.is_finite() || !obstacle.end.is_finite() {
                return Err(DomainError::InvalidCommand {
                    reason: "obstacle endpoints must be finite coordinates".to_string(),
                }
                .into());
            }
        }
        for obstacle in request.obstacles {
            self.registry.add_obstacle(obstacle);
        }
        Ok(AddObstaclesResponse { finished: true })
    }

    /// Replaces the scene's polygon shapes: removes existing polygons, builds
    /// the requested clusters through the polygon path and respawns them on
    /// the backend with the same retry policy as pedestrian respawn.
    pub async fn spawn_polygons(
        &mut self,
        request: SpawnPolygonsRequest,
    ) -> ApplicationResult<SpawnResponse> {
        let old_names = self.registry.remove_agents_matching(RemovalFilter::Polygons);
        let new_models = self.build_clusters(&request.polygons, true)?;

        let finished = self.backend.respawn(&old_names, &new_models).await?;
        if !finished {
            self.logger.error(&format!(
                "Failed to respawn all {} polygons",
                request.polygons.len()
            ));
        }
        Ok(SpawnResponse { finished })
    }

    /// Delegates waypoint recomputation to the motion engine. Every movement
    /// episode invalidates the static obstacle state.
    pub async fn move_agent_clusters(
        &mut self,
        request: MoveRequest,
    ) -> ApplicationResult<MoveResponse> {
        let waypoints = self
            .motion
            .move_clusters(&request.pattern_waypoints, request.episode)
            .await?;
        self.registry.remove_all_obstacles();
        info!(episode = request.episode, "moved agent clusters, obstacles cleared");
        Ok(MoveResponse {
            waypoints,
            finished: true,
        })
    }

    fn build_clusters(
        &mut self,
        specs: &[ClusterSpec],
        polygon_path: bool,
    ) -> ApplicationResult<Vec<ModelDescriptor>> {
        let mut models = Vec::new();
        let mut builder = ClusterBuilder::new(&mut self.registry, &mut self.ids);
        for spec in specs {
            let batch = if polygon_path {
                builder.build_polygon_cluster(spec)?
            } else {
                builder.build_cluster(spec)?
            };
            models.extend(batch);
        }
        Ok(models)
    }
}
