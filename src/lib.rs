//! Gantry - deterministic deployment-plan compiler for agent-injected workloads
//!
//! Gantry compiles a declarative [`WorkloadSpec`](spec::WorkloadSpec) - an
//! application image, its resource budget, and a toggle-controlled security
//! agent add-on - into an immutable [`DeploymentPlan`](plan::DeploymentPlan):
//! the full set of containers, volumes, environment variables, and start-order
//! dependencies the orchestration platform needs, plus derived named outputs.
//!
//! # Architecture
//!
//! Compilation is a pure, single-pass computation:
//! - Budget validation runs first and short-circuits before any plan exists
//! - Container graph, environment projection, and volume planning are
//!   independent functions over the spec (no shared mutable state)
//! - The compiler assembles their results, projects outputs, and verifies
//!   plan invariants before returning
//!
//! Compiling the same spec twice yields byte-identical plans.
//!
//! # Modules
//!
//! - [`spec`] - Input types (WorkloadSpec, credentials, proxy settings)
//! - [`plan`] - Compiled plan types (ContainerSpec, VolumeSpec, DeploymentPlan)
//! - [`budget`] - Resource budget validation against fixed agent overhead
//! - [`containers`] - Container graph builder (application + init container)
//! - [`environment`] - Environment/proxy projection for the init container
//! - [`volumes`] - Shared volume and mount planning
//! - [`outputs`] - Derived named outputs with conditional-absence semantics
//! - [`compiler`] - Plan compiler orchestrating the above
//! - [`platform`] - Orchestration platform observation (collaborator boundary)
//! - [`agent_api`] - Security-vendor agent status API (collaborator boundary)
//! - [`retry`] - Retry with exponential backoff for collaborator calls
//! - [`error`] - Error taxonomy

#![deny(missing_docs)]

pub mod agent_api;
pub mod budget;
pub mod compiler;
pub mod containers;
pub mod environment;
pub mod error;
pub mod outputs;
pub mod plan;
pub mod platform;
pub mod retry;
pub mod spec;
pub mod volumes;

pub use error::CompileError;

/// Result type alias using the compiler's error type
pub type Result<T> = std::result::Result<T, CompileError>;

// =============================================================================
// Fixed Compilation Constants
// =============================================================================
// These values are part of the compiled plan's contract: container names,
// mount paths, and overhead reservations must be stable across agent versions
// so that upgrades change only version-carrying fields.

/// CPU units reserved for the agent init container when the agent is enabled
pub const AGENT_OVERHEAD_CPU: u32 = 128;

/// Memory (MiB) reserved for the agent init container when the agent is enabled
pub const AGENT_OVERHEAD_MEMORY: u32 = 128;

/// Name of the ephemeral volume shared between the init and application containers
pub const AGENT_VOLUME_NAME: &str = "agent-storage";

/// Name of the init container that provisions agent binaries
pub const AGENT_INIT_CONTAINER: &str = "agent-init";

/// Path where the application container mounts the agent volume (read-only)
pub const AGENT_MOUNT_PATH: &str = "/opt/agent";

/// Full path of the provisioned agent binary inside the application container
pub const AGENT_BINARY_PATH: &str = "/opt/agent/agent.jar";
