//! End-to-end compilation properties over the public API
//!
//! These tests exercise the whole pipeline through [`gantry::compiler::compile`]
//! the way a caller would: build a spec, compile, inspect the serialized plan.

use gantry::error::{BudgetError, ConfigError};
use gantry::outputs::keys;
use gantry::plan::{DependencyCondition, DeploymentPlan};
use gantry::spec::{Credentials, EnvironmentLabel, ProxySettings, WorkloadSpec};
use gantry::{compiler, CompileError};

fn base_spec() -> WorkloadSpec {
    WorkloadSpec {
        application_name: "webgoat".to_string(),
        application_image: "webgoat/webgoat:latest".to_string(),
        application_cpu: 1920,
        application_memory: 3968,
        task_cpu: 2048,
        task_memory: 4096,
        agent_enabled: true,
        agent_version: "3.12.1".to_string(),
        init_image: None,
        credentials: Credentials {
            api_key: "test-api-key".to_string(),
            service_key: "test-service-key".to_string(),
            user_name: "agent-user".to_string(),
        },
        api_url: "https://vendor.example.com/api".to_string(),
        proxy_settings: None,
        environment_label: EnvironmentLabel::Qa,
        unique_id: "e2e42".to_string(),
        region: "us-east-1".to_string(),
    }
}

fn compile(spec: &WorkloadSpec) -> DeploymentPlan {
    compiler::compile(spec).expect("compilation should succeed")
}

// =============================================================================
// Story: Idempotence
// =============================================================================

#[test]
fn story_repeated_compilation_is_byte_identical() {
    let spec = base_spec();

    let first = serde_json::to_vec(&compile(&spec)).unwrap();
    for _ in 0..5 {
        let again = serde_json::to_vec(&compile(&spec)).unwrap();
        assert_eq!(first, again);
    }
}

// =============================================================================
// Story: Toggle Symmetry
// =============================================================================

#[test]
fn story_disabling_the_agent_removes_every_trace() {
    let mut spec = base_spec();
    spec.agent_enabled = false;

    let plan = compile(&spec);

    assert_eq!(plan.containers.len(), 1);
    let app = &plan.containers[0];
    assert_eq!(app.name, "webgoat");
    assert!(app.environment.is_empty());
    assert!(app.mount_points.is_empty());
    assert!(app.depends_on.is_empty());
    assert!(plan.volumes.is_empty());

    assert!(!plan.outputs.get_bool(keys::AGENT_ENABLED).unwrap());
    assert!(plan.outputs.get(keys::AGENT_PATH).is_err());
    assert!(plan.outputs.get(keys::LOG_GROUP_AGENT).is_err());
}

#[test]
fn story_toggling_off_matches_a_spec_that_never_enabled() {
    let mut toggled = base_spec();
    toggled.agent_enabled = false;

    let mut never = base_spec();
    never.agent_enabled = false;

    let a = serde_json::to_vec(&compile(&toggled)).unwrap();
    let b = serde_json::to_vec(&compile(&never)).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// Story: Budget Boundary
// =============================================================================

#[test]
fn story_plan_that_leaves_no_room_for_overhead_fails() {
    let mut spec = base_spec();
    spec.task_cpu = 256;
    spec.task_memory = 512;
    spec.application_cpu = 256;
    spec.application_memory = 512;

    match compiler::compile(&spec).unwrap_err() {
        CompileError::Budget(BudgetError::InsufficientCpu { shortfall }) => {
            assert_eq!(shortfall, 128);
        }
        other => panic!("expected budget error, got: {other}"),
    }
}

#[test]
fn story_oversized_application_fails_even_near_the_integer_ceiling() {
    let mut spec = base_spec();
    spec.application_cpu = u32::MAX - 64;

    match compiler::compile(&spec).unwrap_err() {
        CompileError::Budget(BudgetError::InsufficientCpu { shortfall }) => {
            assert_eq!(shortfall, u32::MAX - 64 - 2048 + 128);
        }
        other => panic!("expected budget error, got: {other}"),
    }
}

#[test]
fn story_exact_overhead_fit_compiles() {
    // 2048 - 1920 and 4096 - 3968 both leave exactly the reserved overhead
    let plan = compile(&base_spec());

    let init = plan.container("agent-init").unwrap();
    assert_eq!(init.cpu, 128);
    assert_eq!(init.memory, 128);
}

#[test]
fn story_disabled_agent_frees_the_full_budget() {
    let mut spec = base_spec();
    spec.agent_enabled = false;
    spec.application_cpu = spec.task_cpu;
    spec.application_memory = spec.task_memory;

    let plan = compile(&spec);
    assert_eq!(plan.containers[0].cpu, spec.task_cpu);
}

// =============================================================================
// Story: Dependency Ordering
// =============================================================================

#[test]
fn story_application_starts_only_after_provisioning_completes() {
    let plan = compile(&base_spec());

    let app = plan.container("webgoat").unwrap();
    assert_eq!(app.depends_on.len(), 1);
    assert_eq!(app.depends_on[0].container_name, "agent-init");
    assert_eq!(app.depends_on[0].condition, DependencyCondition::Complete);

    let init = plan.container("agent-init").unwrap();
    assert!(init.depends_on.is_empty());
    assert!(!init.essential);
}

#[test]
fn story_shared_volume_links_provisioner_to_consumer() {
    let plan = compile(&base_spec());

    assert_eq!(plan.volumes.len(), 1);
    assert_eq!(plan.volumes[0].name, "agent-storage");
    assert!(plan.volumes[0].ephemeral);

    let init = plan.container("agent-init").unwrap();
    assert_eq!(init.mount_points[0].volume_name, "agent-storage");
    assert!(!init.mount_points[0].read_only);

    let app = plan.container("webgoat").unwrap();
    assert_eq!(app.mount_points[0].volume_name, "agent-storage");
    assert!(app.mount_points[0].read_only);
    assert_eq!(app.mount_points[0].container_path, "/opt/agent");
}

// =============================================================================
// Story: Proxy Completeness
// =============================================================================

#[test]
fn story_full_proxy_config_projects_all_five_variables() {
    let mut spec = base_spec();
    spec.proxy_settings = Some(ProxySettings {
        host: "proxy.example.com".to_string(),
        port: 3128,
        ssl: true,
        username: Some("proxy-user".to_string()),
        password: Some("proxy-pass".to_string()),
    });

    let plan = compile(&spec);
    let env = &plan.container("agent-init").unwrap().environment;

    assert_eq!(env.get("AGENT_PROXY_HOST").unwrap(), "proxy.example.com");
    assert_eq!(env.get("AGENT_PROXY_PORT").unwrap(), "3128");
    assert_eq!(env.get("AGENT_PROXY_SSL").unwrap(), "true");
    assert_eq!(env.get("AGENT_PROXY_USER").unwrap(), "proxy-user");
    assert_eq!(env.get("AGENT_PROXY_PASS").unwrap(), "proxy-pass");
}

#[test]
fn story_half_configured_proxy_auth_is_rejected() {
    let mut spec = base_spec();
    spec.proxy_settings = Some(ProxySettings {
        host: "proxy.example.com".to_string(),
        port: 3128,
        ssl: false,
        username: Some("proxy-user".to_string()),
        password: None,
    });

    match compiler::compile(&spec).unwrap_err() {
        CompileError::Config(ConfigError::IncompleteProxyAuth) => {}
        other => panic!("expected proxy auth error, got: {other}"),
    }
}

#[test]
fn story_proxyless_spec_carries_no_proxy_variables() {
    let plan = compile(&base_spec());
    let env = &plan.container("agent-init").unwrap().environment;

    assert!(env.keys().all(|k| !k.starts_with("AGENT_PROXY_")));
}

// =============================================================================
// Story: Version Stability
// =============================================================================

/// Upgrading the agent version changes only version-carrying fields: the
/// init container image and the AGENT_VERSION variable. Everything else in
/// the serialized plan is unchanged.
#[test]
fn story_agent_upgrade_produces_a_narrow_diff() {
    let old = compile(&base_spec());

    let mut spec = base_spec();
    spec.agent_version = "3.12.2".to_string();
    let new = compile(&spec);

    let old_init = old.container("agent-init").unwrap();
    let new_init = new.container("agent-init").unwrap();
    assert_eq!(old_init.image, "agent-init:3.12.1");
    assert_eq!(new_init.image, "agent-init:3.12.2");
    assert_eq!(old_init.environment.get("AGENT_VERSION").unwrap(), "3.12.1");
    assert_eq!(new_init.environment.get("AGENT_VERSION").unwrap(), "3.12.2");

    // Structure is untouched by the upgrade
    assert_eq!(old.task_family, new.task_family);
    assert_eq!(old.volumes, new.volumes);
    assert_eq!(old.outputs, new.outputs);
    assert_eq!(
        old.container("webgoat").unwrap(),
        new.container("webgoat").unwrap()
    );

    let mut old_env = old_init.environment.clone();
    let mut new_env = new_init.environment.clone();
    old_env.remove("AGENT_VERSION");
    new_env.remove("AGENT_VERSION");
    assert_eq!(old_env, new_env);
}

// =============================================================================
// Story: Specs Round-Trip From Serialized Form
// =============================================================================

#[test]
fn story_spec_compiles_from_yaml_input() {
    let yaml = r#"
applicationName: webgoat
applicationImage: webgoat/webgoat:latest
applicationCpu: 1920
applicationMemory: 3968
taskCpu: 2048
taskMemory: 4096
agentEnabled: true
agentVersion: "3.12.1"
credentials:
  apiKey: test-api-key
  serviceKey: test-service-key
  userName: agent-user
apiUrl: https://vendor.example.com/api
environmentLabel: QA
uniqueId: e2e42
"#;
    let spec: WorkloadSpec = serde_yaml::from_str(yaml).unwrap();
    let plan = compile(&spec);

    assert_eq!(plan.task_family, "webgoat-e2e42");
    assert_eq!(
        plan.outputs.get_str(keys::SERVER_NAME).unwrap(),
        "webgoat-us-east-1"
    );
    assert_eq!(
        plan.container("agent-init")
            .unwrap()
            .environment
            .get("AGENT_ENVIRONMENT")
            .unwrap(),
        "QA"
    );
}
