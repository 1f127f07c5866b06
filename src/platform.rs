//! Orchestration platform observation boundary
//!
//! The compiler hands its [`DeploymentPlan`](crate::plan::DeploymentPlan) to
//! an external platform and never observes running state itself. Callers
//! that need to know when a rollout has converged poll through this
//! interface: the stability predicate is `desired == running`, polling is
//! read-only (re-querying never mutates anything), and every wait carries an
//! explicit timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::retry::{retry_with_backoff, RetryConfig};

/// Error surface for collaborator operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlatformError {
    /// A transient failure (network error, rate limit); safe to retry
    #[error("transient platform error: {0}")]
    Transient(String),

    /// A terminal API failure; retrying will not help
    #[error("platform error: {0}")]
    Api(String),

    /// A bounded wait expired before the predicate held
    #[error("timed out after {waited_secs}s waiting for {what}")]
    Timeout {
        /// What the caller was waiting for
        what: String,
        /// How long the caller waited, in seconds
        waited_secs: u64,
    },
}

impl PlatformError {
    /// Create a transient error with the given message
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Create a terminal API error with the given message
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}

/// Last observed status of one task instance
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    /// Task instance identifier
    pub task_id: String,
    /// Last reported status (e.g. "RUNNING", "STOPPED")
    pub last_status: String,
}

/// Snapshot of a service's rollout state
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunningState {
    /// Number of task instances the service wants
    pub desired: u32,
    /// Number of task instances currently running
    pub running: u32,
    /// Per-task status detail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_states: Vec<TaskState>,
}

impl RunningState {
    /// The stability predicate: every desired task is running
    pub fn is_stable(&self) -> bool {
        self.desired == self.running
    }
}

/// Read-only observation interface over the orchestration platform
///
/// Implementations wrap the platform's describe-service API. Queries must be
/// safely re-entrant; observing state never mutates it.
#[async_trait]
pub trait TaskPlatform: Send + Sync {
    /// Fetch the current rollout state of a service
    async fn running_state(
        &self,
        cluster_id: &str,
        service_id: &str,
    ) -> Result<RunningState, PlatformError>;
}

/// Polling parameters for bounded waits against the platform
#[derive(Clone, Debug)]
pub struct WaitConfig {
    /// Delay between stability polls
    pub poll_interval: Duration,
    /// Overall bound on the wait
    pub timeout: Duration,
    /// Retry policy for each individual query
    pub retry: RetryConfig,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(600),
            retry: RetryConfig::default(),
        }
    }
}

/// Poll a service until it is stable or the timeout expires
///
/// Transient query failures are retried with bounded backoff inside each
/// poll; the overall wait is bounded by `config.timeout` regardless.
///
/// # Errors
/// [`PlatformError::Timeout`] when the service does not stabilize in time;
/// any terminal error from the underlying queries.
pub async fn wait_for_service_stable(
    platform: &dyn TaskPlatform,
    cluster_id: &str,
    service_id: &str,
    config: &WaitConfig,
) -> Result<RunningState, PlatformError> {
    let start = Instant::now();

    loop {
        let state = retry_with_backoff(&config.retry, "running_state", || {
            platform.running_state(cluster_id, service_id)
        })
        .await?;

        if state.is_stable() {
            info!(
                cluster = %cluster_id,
                service = %service_id,
                running = state.running,
                "service is stable"
            );
            return Ok(state);
        }

        debug!(
            cluster = %cluster_id,
            service = %service_id,
            desired = state.desired,
            running = state.running,
            "service not yet stable"
        );

        if start.elapsed() + config.poll_interval > config.timeout {
            return Err(PlatformError::Timeout {
                what: format!("service {service_id} to stabilize"),
                waited_secs: start.elapsed().as_secs(),
            });
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
