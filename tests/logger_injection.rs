use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crowdsim_scene::adapters::outbound::PatternMotionEngine;
use crowdsim_scene::application::{
    BackendSyncClient, RemoveAllRequest, SceneService, SpawnRequest, SyncPolicy,
};
use crowdsim_scene::common::DomainResult;
use crowdsim_scene::domains::logger::DomainLogger;
use crowdsim_scene::domains::scene::{
    AgentType, BackendChannel, ClusterSpec, ModelDescriptor, Position,
};

/// Captures everything the service logs through the domain port.
#[derive(Default)]
struct CollectingLogger {
    errors: Mutex<Vec<String>>,
}

impl DomainLogger for CollectingLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }
}

/// Backend that accepts spawns but refuses deletions.
struct RefusingDeleteBackend;

#[async_trait]
impl BackendChannel for RefusingDeleteBackend {
    fn is_connected(&self) -> bool {
        true
    }

    async fn wait_for_backend(&self, _wait: Duration) -> bool {
        true
    }

    async fn reconnect(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn spawn_models(&self, _models: &[ModelDescriptor]) -> DomainResult<bool> {
        Ok(true)
    }

    async fn respawn_models(
        &self,
        _old_names: &[String],
        _new_models: &[ModelDescriptor],
    ) -> DomainResult<bool> {
        Ok(true)
    }

    async fn delete_models(&self, _names: &[String]) -> DomainResult<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn test_injected_logger_sees_delete_failures() {
    let logger = Arc::new(CollectingLogger::default());
    let (client, _cancel) =
        BackendSyncClient::new(Arc::new(RefusingDeleteBackend), SyncPolicy::default());
    let mut service = SceneService::new(client, Arc::new(PatternMotionEngine), logger.clone());

    let spec = ClusterSpec {
        id: 1,
        position: Position::new(0.0, 0.0),
        count: 1,
        agent_type: AgentType::Adult,
        resource_path: "models/person.model.yaml".to_string(),
        waypoints: vec![],
    };
    service
        .spawn_peds(SpawnRequest { peds: vec![spec] })
        .await
        .unwrap();

    let response = service
        .remove_all_peds(RemoveAllRequest { flag: true })
        .await
        .unwrap();

    // The failure is logged but the operation still reports success.
    assert!(response.success);
    let errors = logger.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Failed to delete all 1 agents"));
}
