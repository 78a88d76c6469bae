use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crowdsim_scene::adapters::outbound::{init_noop_logger, PatternMotionEngine};
use crowdsim_scene::application::{
    AddObstaclesRequest, BackendSyncClient, MoveRequest, RemoveAllRequest, RespawnRequest,
    SceneService, SpawnPolygonsRequest, SpawnRequest, SyncPolicy,
};
use crowdsim_scene::common::{ApplicationError, DomainResult};
use crowdsim_scene::domains::scene::{
    Agent, AgentType, BackendChannel, ClusterSpec, ModelDescriptor, Obstacle, Position,
    WaypointSpec, RESERVED_AGENT_ID,
};

/// Backend double that records every call. Respawn can be told to fail a
/// number of times before acknowledging.
#[derive(Default)]
struct RecordingBackend {
    respawn_failures: AtomicU32,
    respawn_attempts: AtomicU32,
    deletes_succeed: Option<bool>,
    spawns: Mutex<Vec<Vec<ModelDescriptor>>>,
    respawns: Mutex<Vec<(Vec<String>, Vec<ModelDescriptor>)>>,
    deletes: Mutex<Vec<Vec<String>>>,
}

impl RecordingBackend {
    fn failing_respawns(times: u32) -> Self {
        let backend = Self::default();
        backend.respawn_failures.store(times, Ordering::SeqCst);
        backend
    }
}

#[async_trait]
impl BackendChannel for RecordingBackend {
    fn is_connected(&self) -> bool {
        true
    }

    async fn wait_for_backend(&self, _wait: Duration) -> bool {
        true
    }

    async fn reconnect(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn spawn_models(&self, models: &[ModelDescriptor]) -> DomainResult<bool> {
        self.spawns.lock().unwrap().push(models.to_vec());
        Ok(true)
    }

    async fn respawn_models(
        &self,
        old_names: &[String],
        new_models: &[ModelDescriptor],
    ) -> DomainResult<bool> {
        self.respawns
            .lock()
            .unwrap()
            .push((old_names.to_vec(), new_models.to_vec()));
        let attempt = self.respawn_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(attempt > self.respawn_failures.load(Ordering::SeqCst))
    }

    async fn delete_models(&self, names: &[String]) -> DomainResult<bool> {
        self.deletes.lock().unwrap().push(names.to_vec());
        Ok(self.deletes_succeed.unwrap_or(true))
    }
}

fn service_with(backend: Arc<RecordingBackend>) -> SceneService {
    let (client, _cancel) = BackendSyncClient::new(backend, SyncPolicy::default());
    SceneService::new(client, Arc::new(PatternMotionEngine), init_noop_logger())
}

fn ped_spec(id: u32, count: usize) -> ClusterSpec {
    ClusterSpec {
        id,
        position: Position::new(0.0, 0.0),
        count,
        agent_type: AgentType::Adult,
        resource_path: "models/person.model.yaml".to_string(),
        waypoints: vec![WaypointSpec {
            x: 4.0,
            y: 4.0,
            radius: 1.0,
        }],
    }
}

fn polygon_spec(id: u32, count: usize) -> ClusterSpec {
    ClusterSpec {
        agent_type: AgentType::Polygon,
        resource_path: "models/polygon.model.yaml".to_string(),
        ..ped_spec(id, count)
    }
}

async fn spawn_three_pedestrians(service: &mut SceneService) {
    let request = SpawnRequest {
        peds: vec![ped_spec(1, 1), ped_spec(2, 1), ped_spec(3, 1)],
    };
    let response = service.spawn_peds(request).await.unwrap();
    assert!(response.finished);
}

#[tokio::test]
async fn test_spawn_mirrors_every_descriptor() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend.clone());

    spawn_three_pedestrians(&mut service).await;

    assert_eq!(service.registry().agents().len(), 3);
    assert!(service
        .registry()
        .agents()
        .iter()
        .all(|a| a.id != RESERVED_AGENT_ID));
    assert_eq!(service.registry().waypoint_count(), 3);

    let spawns = backend.spawns.lock().unwrap();
    assert_eq!(spawns.len(), 1);
    assert_eq!(spawns[0].len(), 3);
}

#[tokio::test]
async fn test_respawn_with_empty_input_drains_scene() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend.clone());
    spawn_three_pedestrians(&mut service).await;

    let response = service
        .respawn_peds(RespawnRequest { peds: vec![] })
        .await
        .unwrap();
    assert!(response.finished);

    let respawns = backend.respawns.lock().unwrap();
    assert_eq!(respawns.len(), 1);
    let (old_names, new_models) = &respawns[0];
    assert_eq!(old_names, &["person_1", "person_2", "person_3"]);
    assert!(new_models.is_empty());

    assert!(service.registry().agents().is_empty());
}

#[tokio::test]
async fn test_respawn_succeeds_on_last_attempt() {
    let backend = Arc::new(RecordingBackend::failing_respawns(9));
    let mut service = service_with(backend.clone());

    let response = service
        .respawn_peds(RespawnRequest { peds: vec![ped_spec(1, 2)] })
        .await
        .unwrap();

    assert!(response.finished);
    assert_eq!(backend.respawn_attempts.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_respawn_gives_up_after_ten_attempts() {
    let backend = Arc::new(RecordingBackend::failing_respawns(10));
    let mut service = service_with(backend.clone());

    let response = service
        .respawn_peds(RespawnRequest { peds: vec![ped_spec(1, 2)] })
        .await
        .unwrap();

    assert!(!response.finished);
    assert_eq!(backend.respawn_attempts.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_remove_all_polygons_reports_only_polygon_names() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend.clone());

    service.registry_mut().add_agent(Agent {
        id: RESERVED_AGENT_ID,
        agent_type: AgentType::Adult,
        position: Position::default(),
        waypoint_ids: vec![],
    });
    for id in [1, 2] {
        service.registry_mut().add_agent(Agent {
            id,
            agent_type: AgentType::Adult,
            position: Position::default(),
            waypoint_ids: vec![],
        });
    }
    service.registry_mut().add_agent(Agent {
        id: 3,
        agent_type: AgentType::Polygon,
        position: Position::default(),
        waypoint_ids: vec![],
    });

    let response = service
        .remove_all_polygons(RemoveAllRequest { flag: true })
        .await
        .unwrap();
    assert!(response.success);

    let deletes = backend.deletes.lock().unwrap();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0], vec!["polygon_1"]);

    // Documented side effect: pedestrians are drained from the registry too.
    let remaining: Vec<_> = service.registry().agents().iter().map(|a| a.id).collect();
    assert_eq!(remaining, vec![RESERVED_AGENT_ID]);
}

#[tokio::test]
async fn test_remove_all_peds_twice_yields_empty_second_list() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend.clone());
    spawn_three_pedestrians(&mut service).await;

    service
        .remove_all_peds(RemoveAllRequest { flag: true })
        .await
        .unwrap();
    service
        .remove_all_peds(RemoveAllRequest { flag: true })
        .await
        .unwrap();

    let deletes = backend.deletes.lock().unwrap();
    assert_eq!(deletes.len(), 2);
    assert_eq!(deletes[0].len(), 3);
    assert!(deletes[1].is_empty());
}

#[tokio::test]
async fn test_remove_all_reports_success_even_when_delete_fails() {
    let mut backend = RecordingBackend::default();
    backend.deletes_succeed = Some(false);
    let mut service = service_with(Arc::new(backend));
    spawn_three_pedestrians(&mut service).await;

    let response = service
        .remove_all_peds(RemoveAllRequest { flag: true })
        .await
        .unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_add_obstacles_validates_segments() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend);

    let valid = Obstacle {
        start: Position::new(0.0, 0.0),
        end: Position::new(1.0, 1.0),
    };
    let response = service
        .add_static_obstacles(AddObstaclesRequest {
            obstacles: vec![valid, valid],
        })
        .await
        .unwrap();
    assert!(response.finished);
    assert_eq!(service.registry().obstacle_count(), 2);

    let broken = Obstacle {
        start: Position::new(f64::NAN, 0.0),
        end: Position::new(1.0, 1.0),
    };
    let result = service
        .add_static_obstacles(AddObstaclesRequest {
            obstacles: vec![valid, broken],
        })
        .await;
    assert!(result.is_err());
    // Rejected requests leave the obstacle set untouched.
    assert_eq!(service.registry().obstacle_count(), 2);
}

#[tokio::test]
async fn test_move_returns_waypoints_and_clears_obstacles() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend);

    let segment = Obstacle {
        start: Position::new(0.0, 0.0),
        end: Position::new(2.0, 0.0),
    };
    service
        .add_static_obstacles(AddObstaclesRequest {
            obstacles: vec![segment],
        })
        .await
        .unwrap();
    assert_eq!(service.registry().obstacle_count(), 1);

    let pattern = vec![
        Position::new(0.0, 0.0),
        Position::new(1.0, 0.0),
        Position::new(2.0, 0.0),
    ];
    let response = service
        .move_agent_clusters(MoveRequest {
            pattern_waypoints: pattern.clone(),
            episode: 1,
        })
        .await
        .unwrap();

    assert!(response.finished);
    assert_eq!(response.waypoints[0], pattern[1]);
    assert_eq!(response.waypoints[2], pattern[0]);
    assert_eq!(service.registry().obstacle_count(), 0);
}

#[tokio::test]
async fn test_id_spaces_stay_disjoint_across_operations() {
    let backend = Arc::new(RecordingBackend::default());
    let mut service = service_with(backend.clone());

    service
        .spawn_peds(SpawnRequest { peds: vec![ped_spec(1, 2)] })
        .await
        .unwrap();
    service
        .spawn_peds(SpawnRequest { peds: vec![polygon_spec(2, 1)] })
        .await
        .unwrap();
    service
        .spawn_polygons(SpawnPolygonsRequest { polygons: vec![polygon_spec(3, 1)] })
        .await
        .unwrap();

    let spawns = backend.spawns.lock().unwrap();
    assert_eq!(spawns[0][0].namespace, "crowdsim_agent_1");
    assert_eq!(spawns[0][1].namespace, "crowdsim_agent_2");
    assert_eq!(spawns[1][0].namespace, "crowdsim_polygon_1");

    // The polygon respawn path continues the polygon counter.
    let respawns = backend.respawns.lock().unwrap();
    assert_eq!(respawns[0].1[0].namespace, "crowdsim_polyg_2");
}

/// Backend double that is never reachable.
struct DownBackend;

#[async_trait]
impl BackendChannel for DownBackend {
    fn is_connected(&self) -> bool {
        false
    }

    async fn wait_for_backend(&self, wait: Duration) -> bool {
        tokio::time::sleep(wait).await;
        false
    }

    async fn reconnect(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn spawn_models(&self, _models: &[ModelDescriptor]) -> DomainResult<bool> {
        Ok(false)
    }

    async fn respawn_models(
        &self,
        _old_names: &[String],
        _new_models: &[ModelDescriptor],
    ) -> DomainResult<bool> {
        Ok(false)
    }

    async fn delete_models(&self, _names: &[String]) -> DomainResult<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn test_connect_timeout_surfaces_backend_unavailable() {
    let policy = SyncPolicy {
        reconnect_wait: Duration::from_millis(5),
        connect_timeout: Some(Duration::from_millis(25)),
        max_respawn_attempts: 10,
    };
    let (mut client, _cancel) = BackendSyncClient::new(Arc::new(DownBackend), policy);

    let result = client.spawn(&[]).await;
    assert!(matches!(result, Err(ApplicationError::BackendUnavailable(_))));
}

#[tokio::test]
async fn test_cancellation_interrupts_reconnect_wait() {
    let policy = SyncPolicy {
        reconnect_wait: Duration::from_secs(5),
        connect_timeout: None,
        max_respawn_attempts: 10,
    };
    let (mut client, cancel) = BackendSyncClient::new(Arc::new(DownBackend), policy);

    cancel.cancel();
    let result = client.delete(&[]).await;
    assert!(matches!(result, Err(ApplicationError::BackendUnavailable(_))));
}
