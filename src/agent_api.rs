//! Security-vendor agent status boundary
//!
//! After the platform schedules a plan with the agent enabled, the
//! provisioned agent registers itself with the vendor. Callers confirm the
//! registration through this interface; the compiler itself never talks to
//! the vendor. Like all collaborator calls, queries are read-only and waits
//! are bounded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::platform::{PlatformError, WaitConfig};
use crate::retry::retry_with_backoff;

/// Registration status the vendor reports for an agent
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum AgentActivation {
    /// Agent has registered and is reporting
    Active,
    /// Agent registered at some point but is not currently reporting
    Inactive,
    /// Vendor has no record of the agent yet
    Unknown,
}

/// Status of a provisioned agent as reported by the vendor API
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    /// Registration status
    pub status: AgentActivation,
    /// Runtime language the agent instrumented (e.g. "java")
    pub language: String,
    /// When the vendor last heard from the agent
    pub last_seen: DateTime<Utc>,
}

/// Query interface over the vendor's agent registry
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Fetch the status of the agent registered under an application name
    async fn agent_status(&self, application_name: &str) -> Result<AgentStatus, PlatformError>;
}

/// Poll the vendor until the agent is active or the timeout expires
///
/// # Errors
/// [`PlatformError::Timeout`] when the agent does not activate in time; any
/// terminal error from the underlying queries.
pub async fn wait_for_agent_active(
    api: &dyn AgentApi,
    application_name: &str,
    config: &WaitConfig,
) -> Result<AgentStatus, PlatformError> {
    let start = Instant::now();

    loop {
        let status = retry_with_backoff(&config.retry, "agent_status", || {
            api.agent_status(application_name)
        })
        .await?;

        if status.status == AgentActivation::Active {
            info!(
                application = %application_name,
                language = %status.language,
                "agent is active"
            );
            return Ok(status);
        }

        debug!(
            application = %application_name,
            status = ?status.status,
            "agent not yet active"
        );

        if start.elapsed() + config.poll_interval > config.timeout {
            return Err(PlatformError::Timeout {
                what: format!("agent for {application_name} to activate"),
                waited_secs: start.elapsed().as_secs(),
            });
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
