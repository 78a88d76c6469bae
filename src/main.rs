use crowdsim_scene::Config;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crowdsim_scene::adapters::outbound::{
    init_console_logger, BackendRequest, ChannelBackend, PatternMotionEngine,
};
use crowdsim_scene::application::{BackendSyncClient, SceneService, SpawnRequest, SyncPolicy};
use crowdsim_scene::domains::logger::FileLogger;
use crowdsim_scene::domains::scene::{AgentType, ClusterSpec, Position, WaypointSpec};
use crowdsim_scene::domains::DynLogger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting crowdsim scene service");

    // Load configuration
    let config = match Config::from_file("config.toml").await {
        Ok(config) => config,
        Err(e) => {
            info!("No config.toml ({}), falling back to defaults", e);
            Config::default()
        }
    };

    info!("Reconnect wait: {}s", config.backend.reconnect_wait_secs);
    info!("Max respawn attempts: {}", config.backend.max_respawn_attempts);

    // In-process backend stub that acknowledges every request. A deployment
    // would replace this task with a transport to the real backend.
    let (backend_tx, mut backend_rx) = mpsc::channel(config.backend.request_queue_depth);
    tokio::spawn(async move {
        while let Some(request) = backend_rx.recv().await {
            match request {
                BackendRequest::Spawn { models, reply } => {
                    info!("backend: spawn {} models", models.len());
                    let _ = reply.send(true);
                }
                BackendRequest::Respawn {
                    old_names,
                    new_models,
                    reply,
                } => {
                    info!(
                        "backend: respawn {} -> {} models",
                        old_names.len(),
                        new_models.len()
                    );
                    let _ = reply.send(true);
                }
                BackendRequest::Delete { names, reply } => {
                    info!("backend: delete {} models", names.len());
                    let _ = reply.send(true);
                }
            }
        }
    });

    let channel = Arc::new(ChannelBackend::new(backend_tx));
    let (backend, _cancel) = BackendSyncClient::new(channel, SyncPolicy::from(&config.backend));
    let logger: DynLogger = match &config.logging.file {
        Some(path) => {
            FileLogger::init(path)?;
            Arc::new(FileLogger)
        }
        None => init_console_logger(),
    };
    let mut service = SceneService::new(backend, Arc::new(PatternMotionEngine), logger);

    // Demo: spawn one small pedestrian cluster (non-fatal)
    let request = SpawnRequest {
        peds: vec![ClusterSpec {
            id: 1,
            position: Position::new(0.0, 0.0),
            count: 3,
            agent_type: AgentType::Adult,
            resource_path: "models/person.model.yaml".to_string(),
            waypoints: vec![WaypointSpec {
                x: 5.0,
                y: 5.0,
                radius: 1.0,
            }],
        }],
    };
    match service.spawn_peds(request).await {
        Ok(response) => info!("Spawned demo cluster, finished={}", response.finished),
        Err(e) => error!("Failed to spawn demo cluster: {:?}", e),
    }

    info!("Scene service started successfully");

    // Keep the application running
    tokio::signal::ctrl_c().await?;
    info!("Shutting down crowdsim scene service");

    Ok(())
}
