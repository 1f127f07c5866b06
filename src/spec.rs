//! Input types for plan compilation
//!
//! A [`WorkloadSpec`] is the sole input to the compiler: it describes the
//! application workload, its resource budget, and the security-agent add-on
//! configuration. The caller builds it once and hands it to
//! [`compile`](crate::compiler::compile); the compiler never mutates it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deployment environment the workload reports itself under
///
/// A closed set: unknown labels are rejected at parse time with the allowed
/// values named. The canonical (uppercase) form is what gets injected into
/// the agent environment.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum EnvironmentLabel {
    /// Development environment (default)
    #[default]
    Development,
    /// QA / test environment
    Qa,
    /// Production environment
    Production,
}

impl EnvironmentLabel {
    /// Canonical uppercase form, as injected into the agent environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "DEVELOPMENT",
            Self::Qa => "QA",
            Self::Production => "PRODUCTION",
        }
    }
}

impl std::str::FromStr for EnvironmentLabel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEVELOPMENT" => Ok(Self::Development),
            "QA" => Ok(Self::Qa),
            "PRODUCTION" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironmentLabel {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EnvironmentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials for registering the agent with the vendor API
///
/// Injected into the init container as separate named variables, never
/// concatenated or encoded.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Vendor API key
    pub api_key: String,
    /// Vendor service key
    pub service_key: String,
    /// Vendor user name
    pub user_name: String,
}

impl Credentials {
    /// Validates that all fields are non-empty
    ///
    /// Only enforced when the agent is enabled; dummy values are acceptable
    /// otherwise since nothing consumes them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingCredentials { field: "apiKey" });
        }
        if self.service_key.is_empty() {
            return Err(ConfigError::MissingCredentials {
                field: "serviceKey",
            });
        }
        if self.user_name.is_empty() {
            return Err(ConfigError::MissingCredentials { field: "userName" });
        }
        Ok(())
    }
}

/// Outbound proxy settings for the agent's vendor API traffic
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    /// Proxy host name or address
    pub host: String,

    /// Proxy port
    pub port: u16,

    /// Whether the proxy connection uses TLS
    #[serde(default)]
    pub ssl: bool,

    /// Proxy auth username; requires `password` to also be set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Proxy auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProxySettings {
    /// Validates auth completeness: a username without a password is an error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_some() && self.password.is_none() {
            return Err(ConfigError::IncompleteProxyAuth);
        }
        Ok(())
    }
}

/// Declarative description of an application workload plus the agent add-on
///
/// The single, immutable input to [`compile`](crate::compiler::compile).
/// CPU values are in platform CPU units; memory values are in MiB.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    /// Logical name of the application; names the application container and
    /// feeds the derived outputs
    pub application_name: String,

    /// Container image for the application
    pub application_image: String,

    /// CPU units reserved for the application container
    pub application_cpu: u32,

    /// Memory (MiB) reserved for the application container
    pub application_memory: u32,

    /// Total CPU units for the task
    pub task_cpu: u32,

    /// Total memory (MiB) for the task
    pub task_memory: u32,

    /// Whether the security agent add-on is compiled into the plan
    pub agent_enabled: bool,

    /// Agent version; drives the init container image tag and the version
    /// environment variable, nothing structural
    #[serde(default = "default_agent_version")]
    pub agent_version: String,

    /// Override for the init container image; when absent the image is
    /// derived from `agent_version`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_image: Option<String>,

    /// Vendor API credentials; must be non-empty when the agent is enabled
    #[serde(default)]
    pub credentials: Credentials,

    /// Vendor API URL the agent reports to
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Optional outbound proxy for agent traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_settings: Option<ProxySettings>,

    /// Deployment environment label
    #[serde(default)]
    pub environment_label: EnvironmentLabel,

    /// Caller-supplied unique suffix for task-scoped identifiers
    ///
    /// Generation is the caller's responsibility; the compiler only derives
    /// names from it.
    pub unique_id: String,

    /// Locality/region token combined with the application name to form the
    /// registered server label
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_agent_version() -> String {
    "latest".to_string()
}

fn default_api_url() -> String {
    "https://agent.vendor.example.com/api".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl WorkloadSpec {
    /// Validates the spec before compilation
    ///
    /// Checks resource positivity, credentials completeness (when the agent
    /// is enabled), and proxy auth completeness. Budget arithmetic is a
    /// separate concern handled by [`crate::budget::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_cpu == 0 {
            return Err(ConfigError::InvalidResource {
                field: "applicationCpu",
            });
        }
        if self.application_memory == 0 {
            return Err(ConfigError::InvalidResource {
                field: "applicationMemory",
            });
        }
        if self.task_cpu == 0 {
            return Err(ConfigError::InvalidResource { field: "taskCpu" });
        }
        if self.task_memory == 0 {
            return Err(ConfigError::InvalidResource { field: "taskMemory" });
        }

        if self.agent_enabled {
            self.credentials.validate()?;
        }

        if let Some(proxy) = &self.proxy_settings {
            proxy.validate()?;
        }

        Ok(())
    }

    /// The init container image: explicit override, or derived from the
    /// agent version so upgrades are a narrow diff
    pub fn init_image(&self) -> String {
        self.init_image
            .clone()
            .unwrap_or_else(|| format!("agent-init:{}", self.agent_version))
    }

    /// Task family identifier: application name scoped by the unique id
    pub fn task_family(&self) -> String {
        format!("{}-{}", self.application_name, self.unique_id)
    }

    /// Registered server label: application name plus the region token
    pub fn server_name(&self) -> String {
        format!("{}-{}", self.application_name, self.region)
    }
}
