//! Environment and proxy projection
//!
//! Maps the agent toggle, credentials, and optional proxy settings into the
//! environment-variable set injected into the init container. Credentials
//! are separate named variables, never concatenated or encoded. Absent proxy
//! settings omit every proxy-prefixed variable - absence, not emptiness, is
//! the contract.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::spec::WorkloadSpec;

/// Project a spec into the init container's environment variables
///
/// Always includes the enabled flag (as the strings "true"/"false"), the
/// vendor API URL, the agent version, and the environment label in its
/// canonical uppercase form.
///
/// # Errors
/// Returns [`ConfigError::IncompleteProxyAuth`] when a proxy username is set
/// without a password.
pub fn project(spec: &WorkloadSpec) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut env = BTreeMap::new();

    env.insert(
        "AGENT_ENABLED".to_string(),
        if spec.agent_enabled { "true" } else { "false" }.to_string(),
    );
    env.insert("AGENT_API_URL".to_string(), spec.api_url.clone());
    env.insert("AGENT_VERSION".to_string(), spec.agent_version.clone());
    env.insert(
        "AGENT_ENVIRONMENT".to_string(),
        spec.environment_label.as_str().to_string(),
    );

    env.insert(
        "AGENT_API_KEY".to_string(),
        spec.credentials.api_key.clone(),
    );
    env.insert(
        "AGENT_SERVICE_KEY".to_string(),
        spec.credentials.service_key.clone(),
    );
    env.insert(
        "AGENT_USER_NAME".to_string(),
        spec.credentials.user_name.clone(),
    );

    if let Some(proxy) = &spec.proxy_settings {
        if proxy.username.is_some() && proxy.password.is_none() {
            return Err(ConfigError::IncompleteProxyAuth);
        }

        env.insert("AGENT_PROXY_HOST".to_string(), proxy.host.clone());
        env.insert("AGENT_PROXY_PORT".to_string(), proxy.port.to_string());
        env.insert("AGENT_PROXY_SSL".to_string(), proxy.ssl.to_string());

        if let (Some(user), Some(pass)) = (&proxy.username, &proxy.password) {
            env.insert("AGENT_PROXY_USER".to_string(), user.clone());
            env.insert("AGENT_PROXY_PASS".to_string(), pass.clone());
        }
    }

    Ok(env)
}
