use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::common::{DomainError, DomainResult};
use crate::domains::scene::{BackendChannel, ModelDescriptor};

/// One request to the backend task, paired with a reply slot.
#[derive(Debug)]
pub enum BackendRequest {
    Spawn {
        models: Vec<ModelDescriptor>,
        reply: oneshot::Sender<bool>,
    },
    Respawn {
        old_names: Vec<String>,
        new_models: Vec<ModelDescriptor>,
        reply: oneshot::Sender<bool>,
    },
    Delete {
        names: Vec<String>,
        reply: oneshot::Sender<bool>,
    },
}

/// In-process backend transport over a tokio channel, used by the demo
/// binary and by tests. A network transport would implement the same port.
pub struct ChannelBackend {
    sender: mpsc::Sender<BackendRequest>,
}

impl ChannelBackend {
    pub fn new(sender: mpsc::Sender<BackendRequest>) -> Self {
        Self { sender }
    }

    async fn call(
        &self,
        request: BackendRequest,
        reply: oneshot::Receiver<bool>,
    ) -> DomainResult<bool> {
        self.sender
            .send(request)
            .await
            .map_err(|_| DomainError::InfrastructureError("backend task is gone".to_string()))?;
        reply
            .await
            .map_err(|_| DomainError::InfrastructureError("backend dropped the reply".to_string()))
    }
}

#[async_trait]
impl BackendChannel for ChannelBackend {
    fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn wait_for_backend(&self, wait: Duration) -> bool {
        // A closed channel cannot come back; the wait only paces the caller's
        // reconnect loop.
        if self.sender.is_closed() {
            tokio::time::sleep(wait).await;
        }
        !self.sender.is_closed()
    }

    async fn reconnect(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn spawn_models(&self, models: &[ModelDescriptor]) -> DomainResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.call(
            BackendRequest::Spawn {
                models: models.to_vec(),
                reply,
            },
            rx,
        )
        .await
    }

    async fn respawn_models(
        &self,
        old_names: &[String],
        new_models: &[ModelDescriptor],
    ) -> DomainResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.call(
            BackendRequest::Respawn {
                old_names: old_names.to_vec(),
                new_models: new_models.to_vec(),
                reply,
            },
            rx,
        )
        .await
    }

    async fn delete_models(&self, names: &[String]) -> DomainResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.call(
            BackendRequest::Delete {
                names: names.to_vec(),
                reply,
            },
            rx,
        )
        .await
    }
}
