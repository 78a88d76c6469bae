use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::common::{ApplicationError, ApplicationResult};
use crate::config::BackendConfig;
use crate::domains::scene::{BackendChannel, ModelDescriptor};

/// Connection state of the sync client towards the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
}

/// Reconnect and retry policy for backend synchronization.
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    /// Single wait interval while the backend is unreachable.
    pub reconnect_wait: Duration,
    /// Overall budget for becoming ready. `None` waits indefinitely, which
    /// matches the historical behavior of the simulator.
    pub connect_timeout: Option<Duration>,
    /// Upper bound on respawn attempts.
    pub max_respawn_attempts: u32,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            reconnect_wait: Duration::from_secs(5),
            connect_timeout: None,
            max_respawn_attempts: 10,
        }
    }
}

impl From<&BackendConfig> for SyncPolicy {
    fn from(config: &BackendConfig) -> Self {
        Self {
            reconnect_wait: Duration::from_secs(config.reconnect_wait_secs),
            connect_timeout: config.connect_timeout_secs.map(Duration::from_secs),
            max_respawn_attempts: config.max_respawn_attempts,
        }
    }
}

/// Cancels a sync client blocked in its reconnect loop.
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

/// Drives the remote spawn/respawn/delete protocol against the backend.
///
/// Every call class first brings the connection to `Ready`, waiting in
/// `reconnect_wait` steps while the backend is unreachable. The wait is
/// bounded by `connect_timeout` when configured and can be interrupted
/// through the [`CancelHandle`]; both surface as
/// [`ApplicationError::BackendUnavailable`].
pub struct BackendSyncClient {
    channel: Arc<dyn BackendChannel>,
    policy: SyncPolicy,
    state: ConnectionState,
    cancel: watch::Receiver<bool>,
}

impl BackendSyncClient {
    pub fn new(channel: Arc<dyn BackendChannel>, policy: SyncPolicy) -> (Self, CancelHandle) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (
            Self {
                channel,
                policy,
                state: ConnectionState::Disconnected,
                cancel: cancel_rx,
            },
            CancelHandle(cancel_tx),
        )
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Single-attempt spawn. On a reported failure the scene may already be
    /// partially applied on the backend; the caller owns those semantics.
    pub async fn spawn(&mut self, models: &[ModelDescriptor]) -> ApplicationResult<bool> {
        self.ensure_ready().await?;
        let ok = self.channel.spawn_models(models).await?;
        if !ok {
            warn!(count = models.len(), "backend did not spawn all models");
        }
        Ok(ok)
    }

    /// Single-attempt delete; a few models may be gone even when the backend
    /// reports failure.
    pub async fn delete(&mut self, names: &[String]) -> ApplicationResult<bool> {
        self.ensure_ready().await?;
        let ok = self.channel.delete_models(names).await?;
        if !ok {
            warn!(count = names.len(), "backend did not delete all models");
        }
        Ok(ok)
    }

    /// Respawn with a bounded retry loop: stop on the first success, give up
    /// after `max_respawn_attempts`. Deletions already issued by earlier
    /// attempts are not rolled back.
    pub async fn respawn(
        &mut self,
        old_names: &[String],
        new_models: &[ModelDescriptor],
    ) -> ApplicationResult<bool> {
        self.ensure_ready().await?;
        for attempt in 1..=self.policy.max_respawn_attempts {
            if self.channel.respawn_models(old_names, new_models).await? {
                debug!(attempt, "backend acknowledged respawn");
                return Ok(true);
            }
            warn!(
                attempt,
                max = self.policy.max_respawn_attempts,
                "backend rejected respawn"
            );
        }
        Ok(false)
    }

    /// Reconnect state machine: Disconnected -> Connecting -> Ready.
    async fn ensure_ready(&mut self) -> ApplicationResult<()> {
        let channel = Arc::clone(&self.channel);
        let mut cancel = self.cancel.clone();
        let deadline = self
            .policy
            .connect_timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);

        loop {
            if channel.is_connected() {
                self.state = ConnectionState::Ready;
                return Ok(());
            }
            if *cancel.borrow() {
                self.state = ConnectionState::Disconnected;
                return Err(ApplicationError::BackendUnavailable(
                    "synchronization cancelled".to_string(),
                ));
            }
            if let Some(deadline) = deadline {
                if tokio::time::Instant::now() >= deadline {
                    self.state = ConnectionState::Disconnected;
                    return Err(ApplicationError::BackendUnavailable(format!(
                        "backend not reachable within {:?}",
                        self.policy.connect_timeout.unwrap_or_default()
                    )));
                }
            }

            self.state = ConnectionState::Connecting;
            warn!(wait = ?self.policy.reconnect_wait, "backend unreachable, waiting to reconnect");
            let reachable = tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() {
                        // Cancel handle dropped; keep waiting on the backend alone.
                        channel.wait_for_backend(self.policy.reconnect_wait).await
                    } else {
                        continue;
                    }
                }
                reachable = channel.wait_for_backend(self.policy.reconnect_wait) => reachable,
            };
            if reachable {
                channel.reconnect().await?;
            }
        }
    }
}
