//! Derived named outputs of a compiled plan
//!
//! Outputs are a read-only projection over the assembled plan: identifiers,
//! paths, and log destinations downstream automation consumes. Conditional
//! outputs are *absent from the mapping entirely* when the agent is
//! disabled - absence is a distinct, observable state from null, so lookups
//! return a not-found error rather than an empty value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a requested output key does not exist
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("output \"{0}\" not found")]
pub struct OutputNotFound(
    /// The key that was looked up
    pub String,
);

/// A single output value, typed at the tag level
///
/// The enabled flag is a real boolean, never a string stand-in.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum OutputValue {
    /// String-valued output (identifiers, paths, log groups)
    String(String),
    /// Boolean-valued output (the agent-enabled flag)
    Bool(bool),
}

impl OutputValue {
    /// The string value, if this output is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    /// The boolean value, if this output is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }
}

/// The named output mapping of a compiled plan
///
/// Keys are sorted, so serialization is deterministic. Consumers must use
/// existence checks ([`get`](Self::get) returns [`OutputNotFound`] for
/// absent keys), not null checks.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Outputs(BTreeMap<String, OutputValue>);

impl Outputs {
    /// Create an empty output mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string-valued output
    pub fn insert_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), OutputValue::String(value.into()));
    }

    /// Insert a boolean-valued output
    pub fn insert_bool(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), OutputValue::Bool(value));
    }

    /// Whether the key exists in the mapping
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Look up an output by key
    ///
    /// # Errors
    /// Returns [`OutputNotFound`] when the key is absent. An absent key is
    /// the contract for disabled features, never a null value.
    pub fn get(&self, key: &str) -> Result<&OutputValue, OutputNotFound> {
        self.0.get(key).ok_or_else(|| OutputNotFound(key.to_string()))
    }

    /// Look up a string-valued output by key
    ///
    /// # Errors
    /// Returns [`OutputNotFound`] when the key is absent or not a string.
    pub fn get_str(&self, key: &str) -> Result<&str, OutputNotFound> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| OutputNotFound(key.to_string()))
    }

    /// Look up a boolean-valued output by key
    ///
    /// # Errors
    /// Returns [`OutputNotFound`] when the key is absent or not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, OutputNotFound> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| OutputNotFound(key.to_string()))
    }

    /// Iterate over all outputs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of outputs present
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Output Projection
// =============================================================================

/// Standard output keys produced by [`project`]
pub mod keys {
    /// Task family identifier (always present)
    pub const TASK_FAMILY: &str = "task_family";
    /// Application name (always present)
    pub const APP_NAME: &str = "app_name";
    /// Registered server label: application name + region (always present)
    pub const SERVER_NAME: &str = "server_name";
    /// Log destination for the application container (always present)
    pub const LOG_GROUP_APP: &str = "log_group_app";
    /// Whether the agent was compiled into the plan (always present, boolean)
    pub const AGENT_ENABLED: &str = "agent_enabled";
    /// Agent binary path inside the application container (iff enabled)
    pub const AGENT_PATH: &str = "agent_path";
    /// Log destination for the agent init container (iff enabled)
    pub const LOG_GROUP_AGENT: &str = "log_group_agent";
}

/// Project the derived named outputs for a spec
///
/// Unconditional keys are always present and non-empty. The conditional keys
/// ([`keys::AGENT_PATH`], [`keys::LOG_GROUP_AGENT`]) exist iff the agent is
/// enabled; when disabled they are omitted entirely, never set to an empty
/// placeholder.
pub fn project(spec: &crate::spec::WorkloadSpec) -> Outputs {
    let family = spec.task_family();

    let mut outputs = Outputs::new();
    outputs.insert_str(keys::TASK_FAMILY, &family);
    outputs.insert_str(keys::APP_NAME, &spec.application_name);
    outputs.insert_str(keys::SERVER_NAME, spec.server_name());
    outputs.insert_str(keys::LOG_GROUP_APP, format!("/tasks/{family}/application"));
    outputs.insert_bool(keys::AGENT_ENABLED, spec.agent_enabled);

    if spec.agent_enabled {
        outputs.insert_str(keys::AGENT_PATH, crate::AGENT_BINARY_PATH);
        outputs.insert_str(keys::LOG_GROUP_AGENT, format!("/tasks/{family}/agent"));
    }

    outputs
}
