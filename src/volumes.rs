//! Volume and mount planning
//!
//! One ephemeral volume, deterministically named, exists iff the agent is
//! enabled. The init container mounts it read-write to provision agent
//! binaries; the application container mounts it read-only at a fixed path
//! that is stable across agent versions, so upgrades never require
//! application-side path changes.

use crate::plan::{MountPoint, VolumeSpec};
use crate::{AGENT_MOUNT_PATH, AGENT_VOLUME_NAME};

/// Mount assignments for the containers that share the agent volume
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MountAssignments {
    /// Read-write mount for the init container, if the agent is enabled
    pub init: Option<MountPoint>,
    /// Read-only mount for the application container, if the agent is enabled
    pub application: Option<MountPoint>,
}

/// Plan the volume set and mount assignments for a task
///
/// Returns an empty volume list and no mounts when the agent is disabled;
/// the compiled plan must be structurally identical to one that never had
/// the agent.
pub fn plan(agent_enabled: bool) -> (Vec<VolumeSpec>, MountAssignments) {
    if !agent_enabled {
        return (vec![], MountAssignments::default());
    }

    let volumes = vec![VolumeSpec {
        name: AGENT_VOLUME_NAME.to_string(),
        ephemeral: true,
    }];

    let assignments = MountAssignments {
        init: Some(MountPoint {
            volume_name: AGENT_VOLUME_NAME.to_string(),
            container_path: AGENT_MOUNT_PATH.to_string(),
            read_only: false,
        }),
        application: Some(MountPoint {
            volume_name: AGENT_VOLUME_NAME.to_string(),
            container_path: AGENT_MOUNT_PATH.to_string(),
            read_only: true,
        }),
    };

    (volumes, assignments)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Story: Shared Volume Exists Iff the Agent Is Enabled
    // =========================================================================

    #[test]
    fn story_enabled_agent_declares_one_ephemeral_volume() {
        let (volumes, _) = plan(true);
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, AGENT_VOLUME_NAME);
        assert!(volumes[0].ephemeral);
    }

    #[test]
    fn story_disabled_agent_declares_nothing() {
        let (volumes, mounts) = plan(false);
        assert!(volumes.is_empty());
        assert_eq!(mounts, MountAssignments::default());
    }

    // =========================================================================
    // Story: Writer/Reader Mount Split
    // =========================================================================

    #[test]
    fn story_init_writes_and_application_reads() {
        let (_, mounts) = plan(true);

        let init = mounts.init.unwrap();
        assert!(!init.read_only, "init container must write agent binaries");
        assert_eq!(init.volume_name, AGENT_VOLUME_NAME);

        let app = mounts.application.unwrap();
        assert!(app.read_only, "application must not modify agent binaries");
        assert_eq!(app.container_path, AGENT_MOUNT_PATH);
    }

    /// The application mount path is part of the derived outputs and must
    /// never move between versions.
    #[test]
    fn story_mount_path_is_stable() {
        let (_, mounts) = plan(true);
        assert_eq!(mounts.application.unwrap().container_path, "/opt/agent");
    }
}
