//! Container graph building
//!
//! Assembles the set of containers for a task and the start-order dependency
//! edges between them. The application container is always present and
//! essential. When the agent is enabled, a non-essential init container is
//! placed before it in the sequence and the application gains a
//! `dependsOn: COMPLETE` edge on it, encoding the at-most-once, ordered
//! provisioning guarantee: the application must not start until the agent
//! binaries are in place.
//!
//! Environment and mount attachment happen later in
//! [`crate::compiler::compile`]; this module decides only which containers
//! exist and how they relate.

use crate::plan::{ContainerDependency, ContainerSpec, DependencyCondition};
use crate::spec::WorkloadSpec;
use crate::{AGENT_INIT_CONTAINER, AGENT_OVERHEAD_CPU, AGENT_OVERHEAD_MEMORY};

/// Build the ordered container sequence for a spec
///
/// Disabled agent: a single essential application container, structurally
/// identical to a plan that never had the agent. Enabled: the init container
/// first, then the application depending on its completion.
pub fn build(spec: &WorkloadSpec) -> Vec<ContainerSpec> {
    let mut application = ContainerSpec {
        name: spec.application_name.clone(),
        image: spec.application_image.clone(),
        cpu: spec.application_cpu,
        memory: spec.application_memory,
        environment: Default::default(),
        mount_points: vec![],
        depends_on: vec![],
        essential: true,
    };

    if !spec.agent_enabled {
        return vec![application];
    }

    let init = ContainerSpec {
        name: AGENT_INIT_CONTAINER.to_string(),
        image: spec.init_image(),
        cpu: AGENT_OVERHEAD_CPU,
        memory: AGENT_OVERHEAD_MEMORY,
        environment: Default::default(),
        mount_points: vec![],
        depends_on: vec![],
        essential: false,
    };

    application.depends_on.push(ContainerDependency {
        container_name: AGENT_INIT_CONTAINER.to_string(),
        condition: DependencyCondition::Complete,
    });

    vec![init, application]
}
