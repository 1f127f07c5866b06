//! Gantry - compile declarative workload specs into deployment plans

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gantry::spec::WorkloadSpec;

/// Gantry - deterministic deployment-plan compiler for agent-injected workloads
#[derive(Parser, Debug)]
#[command(name = "gantry", version, about, long_about = None)]
struct Cli {
    /// Path to the workload spec file (YAML or JSON)
    #[arg(short = 'f', long = "config")]
    config_file: std::path::PathBuf,

    /// Output format for the compiled plan
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.config_file).map_err(|e| {
        anyhow::anyhow!("Failed to read spec file {:?}: {}", cli.config_file, e)
    })?;

    // YAML is a superset of JSON, so one parser covers both on-disk formats
    let spec: WorkloadSpec = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse workload spec: {}", e))?;

    let plan = gantry::compiler::compile(&spec)?;

    let rendered = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&plan)
            .map_err(|e| anyhow::anyhow!("Failed to serialize plan: {}", e))?,
        OutputFormat::Yaml => serde_yaml::to_string(&plan)
            .map_err(|e| anyhow::anyhow!("Failed to serialize plan: {}", e))?,
    };
    println!("{rendered}");

    Ok(())
}
