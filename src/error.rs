//! Error types for plan compilation and collaborator calls
//!
//! The taxonomy distinguishes three failure classes:
//! - [`BudgetError`]: the declared resources cannot fit the agent overhead;
//!   user-facing, carries the numeric shortfall
//! - [`ConfigError`]: input validation failures, always naming the offending
//!   field; fail fast, never partially compile
//! - [`CompileError::Invariant`]: an internal defect in the compiler itself
//!   (cycle, dangling reference); unreachable under correct components
//!
//! Compile-time errors are never retried - identical input always yields the
//! identical failure. Transient collaborator failures live in
//! [`PlatformError`](crate::platform::PlatformError) instead.

use thiserror::Error;

/// Resource budget validation failure
///
/// Raised when the application's declared CPU/memory plus the fixed agent
/// overhead exceed the task-level budget. Surfaces at compile time, before
/// any container is scheduled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BudgetError {
    /// Application CPU plus agent overhead exceeds the task CPU budget
    #[error("insufficient CPU: application and agent overhead exceed task budget by {shortfall} units")]
    InsufficientCpu {
        /// How many CPU units over budget the request is
        shortfall: u32,
    },

    /// Application memory plus agent overhead exceeds the task memory budget
    #[error("insufficient memory: application and agent overhead exceed task budget by {shortfall} MiB")]
    InsufficientMemory {
        /// How many MiB over budget the request is
        shortfall: u32,
    },
}

/// Input configuration validation failure
///
/// Every variant references the offending field by name so callers can point
/// users at the exact input to fix.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Proxy username was set without a password
    #[error("proxySettings.username is set but proxySettings.password is missing")]
    IncompleteProxyAuth,

    /// Environment label is not one of the allowed set
    #[error("environmentLabel must be one of: DEVELOPMENT, QA, PRODUCTION (got '{value}')")]
    InvalidEnvironmentLabel {
        /// The rejected label value
        value: String,
    },

    /// A credentials field is empty while the agent is enabled
    #[error("credentials.{field} must be non-empty when agentEnabled is true")]
    MissingCredentials {
        /// Name of the empty credentials field
        field: &'static str,
    },

    /// A CPU or memory value is not a positive integer
    #[error("{field} must be a positive integer")]
    InvalidResource {
        /// Name of the offending resource field
        field: &'static str,
    },
}

/// Top-level compilation error
///
/// All-or-nothing: when any variant is returned, no partial plan exists.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Resource budget cannot accommodate the agent overhead
    #[error("budget error: {0}")]
    Budget(#[from] BudgetError),

    /// Input configuration is invalid
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The assembled plan violated an internal invariant
    ///
    /// This signals a defect in the compiler, not in user input, and is
    /// always fatal.
    #[error("plan invariant violated: {0}")]
    Invariant(String),
}

impl CompileError {
    /// Create an invariant-violation error with the given message
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}
