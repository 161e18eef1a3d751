//! Background backend-health polling

use crate::client::ApiClient;
use crate::types::HealthStatus;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Default period between two health checks
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Backend availability as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Online,
    Offline,
    Checking,
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline => f.write_str("offline"),
            Self::Checking => f.write_str("checking"),
        }
    }
}

/// Result of the latest poll; replaced wholesale on every check
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSnapshot {
    pub state: HealthState,
    pub payload: Option<HealthStatus>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl Default for HealthSnapshot {
    fn default() -> Self {
        Self {
            state: HealthState::Checking,
            payload: None,
            checked_at: None,
        }
    }
}

struct Probe {
    client: ApiClient,
    state_tx: watch::Sender<HealthSnapshot>,
}

impl Probe {
    async fn check(&self) -> HealthState {
        self.state_tx.send_modify(|snapshot| snapshot.state = HealthState::Checking);

        let snapshot = match self.client.health().await {
            Ok(payload) => {
                debug!(status = %payload.status, "Backend is online");
                HealthSnapshot {
                    state: HealthState::Online,
                    payload: Some(payload),
                    checked_at: Some(Utc::now()),
                }
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                HealthSnapshot {
                    state: HealthState::Offline,
                    payload: None,
                    checked_at: Some(Utc::now()),
                }
            }
        };

        let state = snapshot.state;
        self.state_tx.send_replace(snapshot);
        state
    }
}

/// Polls the health endpoint on a fixed period.
///
/// The first check runs as soon as the monitor starts. Failed checks only
/// flip the state to offline; polling continues until shutdown or drop.
pub struct HealthMonitor {
    probe: Arc<Probe>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    /// Start polling every [`HEALTH_CHECK_INTERVAL`]. Requires a tokio runtime.
    pub fn start(client: ApiClient) -> Self {
        Self::start_with_interval(client, HEALTH_CHECK_INTERVAL)
    }

    pub fn start_with_interval(client: ApiClient, period: Duration) -> Self {
        let (state_tx, _) = watch::channel(HealthSnapshot::default());
        let probe = Arc::new(Probe { client, state_tx });

        let task = tokio::spawn({
            let probe = probe.clone();
            async move {
                let mut ticker = time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    probe.check().await;
                }
            }
        });

        info!(period_secs = period.as_secs_f64(), "Health monitor started");
        Self { probe, task }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.probe.state_tx.borrow().clone()
    }

    pub fn state(&self) -> HealthState {
        self.probe.state_tx.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.probe.state_tx.subscribe()
    }

    /// Poll once now, outside the timer cadence. The timer is not reset.
    pub async fn check_now(&self) -> HealthState {
        self.probe.check().await
    }

    /// Stop the polling task
    pub fn shutdown(&self) {
        if !self.task.is_finished() {
            info!("Health monitor stopped");
        }
        self.task.abort();
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
