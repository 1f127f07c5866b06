//! Compiled plan types
//!
//! These types form the [`DeploymentPlan`] document the orchestration
//! platform consumes: an ordered container list, a volume set, and the
//! derived named outputs. The plan owns its containers and volumes
//! exclusively; nothing is shared across plans.
//!
//! For plan generation, use [`crate::compiler::compile`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::outputs::Outputs;

// =============================================================================
// Container Types
// =============================================================================

/// Start-order condition a dependency must reach before the dependent starts
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum DependencyCondition {
    /// The dependency must run to completion (exit zero) first
    Complete,
    /// The dependency only needs to have started
    Start,
}

/// Start-order dependency edge between two containers in a plan
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDependency {
    /// Name of the container this one depends on
    pub container_name: String,
    /// Condition the dependency must satisfy
    pub condition: DependencyCondition,
}

/// A volume mount inside a container
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MountPoint {
    /// Name of the volume, which must exist in the plan's volume set
    pub volume_name: String,
    /// Mount path inside the container
    pub container_path: String,
    /// Whether the mount is read-only
    pub read_only: bool,
}

/// One container in the compiled plan
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    /// Container name, unique within the plan
    pub name: String,

    /// Container image
    pub image: String,

    /// CPU units reserved for this container
    pub cpu: u32,

    /// Memory (MiB) reserved for this container
    pub memory: u32,

    /// Environment variables (sorted by name for deterministic output)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Volume mounts, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mount_points: Vec<MountPoint>,

    /// Containers that must reach their condition before this one starts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<ContainerDependency>,

    /// Whether the task fails if this container stops
    pub essential: bool,
}

// =============================================================================
// Volume Types
// =============================================================================

/// A volume declared in the plan
///
/// Lifecycle is scoped to the task instance: created at task start,
/// destroyed at task stop, never independently addressable.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpec {
    /// Volume name, unique within the plan
    pub name: String,
    /// Whether the volume is ephemeral (task-scoped scratch storage)
    pub ephemeral: bool,
}

// =============================================================================
// Deployment Plan
// =============================================================================

/// The compiled, immutable description of one task's containers, volumes,
/// and dependency graph
///
/// Produced fresh per [`compile`](crate::compiler::compile) call; handed to
/// the orchestration platform which owns the runtime lifecycle. The compiler
/// never observes or mutates running state.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPlan {
    /// Task family identifier (application name scoped by the unique id)
    pub task_family: String,

    /// Total CPU units for the task
    pub task_cpu: u32,

    /// Total memory (MiB) for the task
    pub task_memory: u32,

    /// Containers, in start-intent order (init containers before dependents)
    pub containers: Vec<ContainerSpec>,

    /// Volumes the containers may mount
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeSpec>,

    /// Derived named outputs
    pub outputs: Outputs,
}

impl DeploymentPlan {
    /// Look up a container by name
    pub fn container(&self, name: &str) -> Option<&ContainerSpec> {
        self.containers.iter().find(|c| c.name == name)
    }

    /// Verify plan invariants: unique container names, referential
    /// integrity of volumes and dependency targets, and an acyclic
    /// dependency graph
    ///
    /// A violation here is a defect in the compiler, never a user input
    /// error, so it surfaces as [`CompileError::Invariant`].
    pub fn verify(&self) -> Result<(), CompileError> {
        let mut names = std::collections::BTreeSet::new();
        for container in &self.containers {
            if !names.insert(container.name.as_str()) {
                return Err(CompileError::invariant(format!(
                    "duplicate container name '{}'",
                    container.name
                )));
            }
        }

        for container in &self.containers {
            for mount in &container.mount_points {
                if !self.volumes.iter().any(|v| v.name == mount.volume_name) {
                    return Err(CompileError::invariant(format!(
                        "container '{}' mounts undeclared volume '{}'",
                        container.name, mount.volume_name
                    )));
                }
            }
            for dep in &container.depends_on {
                if !names.contains(dep.container_name.as_str()) {
                    return Err(CompileError::invariant(format!(
                        "container '{}' depends on unknown container '{}'",
                        container.name, dep.container_name
                    )));
                }
            }
        }

        self.verify_acyclic()
    }

    /// Depth-first search over dependency edges, rejecting any cycle
    fn verify_acyclic(&self) -> Result<(), CompileError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            name: &'a str,
            plan: &'a DeploymentPlan,
            marks: &mut BTreeMap<&'a str, Mark>,
        ) -> Result<(), CompileError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => {
                    return Err(CompileError::invariant(format!(
                        "dependency cycle involving container '{name}'"
                    )));
                }
                None => {}
            }
            marks.insert(name, Mark::Visiting);
            if let Some(container) = plan.container(name) {
                for dep in &container.depends_on {
                    visit(&dep.container_name, plan, marks)?;
                }
            }
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = BTreeMap::new();
        for container in &self.containers {
            visit(&container.name, self, &mut marks)?;
        }
        Ok(())
    }
}
