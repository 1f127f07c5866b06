//! Deployment plan compiler
//!
//! This module provides the single entry point for turning a
//! [`WorkloadSpec`] into a [`DeploymentPlan`]. It composes the specialized
//! components:
//! - [`budget`](crate::budget): resource budget validation (short-circuits)
//! - [`containers`](crate::containers): container graph building
//! - [`environment`](crate::environment): env/proxy projection
//! - [`volumes`](crate::volumes): volume and mount planning
//! - [`outputs`](crate::outputs): derived output projection
//!
//! # Usage
//!
//! ```text
//! let plan = compiler::compile(&spec)?;
//! // plan.containers, plan.volumes, plan.outputs
//! ```
//!
//! Compilation is stateless and idempotent: calling it twice with identical
//! input yields byte-identical plans. All errors are returned before any
//! plan exists - there is no partial output.

use tracing::debug;

use crate::plan::DeploymentPlan;
use crate::spec::WorkloadSpec;
use crate::{budget, containers, environment, outputs, volumes, CompileError, AGENT_INIT_CONTAINER};

/// Compile a workload spec into a deployment plan
///
/// Steps, in order:
/// 1. Validate the spec (field-level configuration checks)
/// 2. Validate the resource budget against the fixed agent overhead
/// 3. Build the container graph, project the environment, and plan volumes
///    (independent functions over the spec)
/// 4. Attach the projected environment to the init container and the mount
///    assignments to both containers
/// 5. Project the derived outputs
/// 6. Verify plan invariants before returning
///
/// # Errors
/// [`CompileError::Config`] or [`CompileError::Budget`] for input problems;
/// [`CompileError::Invariant`] if the assembled plan is internally
/// inconsistent, which signals a defect in the compiler itself.
pub fn compile(spec: &WorkloadSpec) -> crate::Result<DeploymentPlan> {
    spec.validate()?;
    budget::validate(spec)?;

    let mut containers = containers::build(spec);
    let (volumes, mounts) = volumes::plan(spec.agent_enabled);

    if spec.agent_enabled {
        // The projected environment is consumed only by the init container;
        // the application container sees the agent purely through the volume.
        let env = environment::project(spec)?;

        let init = containers
            .iter_mut()
            .find(|c| c.name == AGENT_INIT_CONTAINER)
            .ok_or_else(|| {
                CompileError::invariant("agent enabled but init container missing from graph")
            })?;
        init.environment = env;
        if let Some(mount) = mounts.init {
            init.mount_points.push(mount);
        }

        let app = containers
            .iter_mut()
            .find(|c| c.name == spec.application_name)
            .ok_or_else(|| CompileError::invariant("application container missing from graph"))?;
        if let Some(mount) = mounts.application {
            app.mount_points.push(mount);
        }
    }

    let plan = DeploymentPlan {
        task_family: spec.task_family(),
        task_cpu: spec.task_cpu,
        task_memory: spec.task_memory,
        containers,
        volumes,
        outputs: outputs::project(spec),
    };

    plan.verify()?;

    debug!(
        task_family = %plan.task_family,
        containers = plan.containers.len(),
        volumes = plan.volumes.len(),
        agent_enabled = spec.agent_enabled,
        "compiled deployment plan"
    );

    Ok(plan)
}
