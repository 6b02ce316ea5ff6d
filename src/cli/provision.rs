//! Provisioning commands

use crate::cli::display::{StatusIcon, TableRenderer};
use crate::domain::config::{load_config_file, resolve_project_id, ProvisionConfig, RunSettings};
use crate::domain::provision::{ConfigValidator, GraphNode, Orchestrator, ProvisionGraph};
use crate::infrastructure::constants::{
    DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY, DEFAULT_RETRY_ATTEMPTS, PROJECT_ID_ENV,
};
use crate::infrastructure::provider::{DryRunProvider, RetryPolicy, RetryingProvider};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateCommand {
    /// Path to the provisioning configuration (.yaml, .yml, .json or .toml)
    #[arg(long, short = 'c')]
    pub config: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanCommand {
    /// Path to the provisioning configuration (.yaml, .yml, .json or .toml)
    #[arg(long, short = 'c')]
    pub config: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct ApplyCommand {
    /// Path to the provisioning configuration (.yaml, .yml, .json or .toml)
    #[arg(long, short = 'c')]
    pub config: String,

    /// Target project
    /// If not provided, falls back to the GOOGLE_PROJECT_ID environment variable
    #[arg(long, short = 'p', env = PROJECT_ID_ENV)]
    pub project: Option<String>,

    /// Maximum number of provider calls in flight
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = DEFAULT_CALL_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Retries for transient provider errors
    #[arg(long, default_value_t = DEFAULT_RETRY_ATTEMPTS)]
    pub retries: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write exported outputs to this file as JSON
    #[arg(long)]
    pub outputs_file: Option<String>,
}

fn load(path: &str) -> anyhow::Result<ProvisionConfig> {
    load_config_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration from {}: {}", path, e))
}

impl ValidateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = load(&self.config)?;
        ConfigValidator::new()?
            .validate(&config)
            .map_err(|e| anyhow::anyhow!("{} Invalid configuration: {}", StatusIcon::ERROR, e))?;

        println!(
            "{} Configuration is valid: {} buckets, {} instances, {} clusters, {} node pools",
            StatusIcon::SUCCESS,
            config.buckets.len(),
            config.instances.len(),
            config.clusters.len(),
            config.node_pool_count()
        );
        Ok(())
    }
}

impl PlanCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = load(&self.config)?;
        ConfigValidator::new()?
            .validate(&config)
            .map_err(|e| anyhow::anyhow!("{} Invalid configuration: {}", StatusIcon::ERROR, e))?;

        let graph = ProvisionGraph::from_config(&config)?;
        let order = graph.topological_order()?;

        match self.format {
            OutputFormat::Table => {
                println!("{}", TableRenderer::new().render_plan(&graph, &order));
            }
            OutputFormat::Json => {
                let nodes: Vec<&GraphNode> =
                    order.iter().filter_map(|id| graph.node(*id)).collect();
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            }
        }
        Ok(())
    }
}

impl ApplyCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        // Project must be known before the configuration is read
        let project_id = resolve_project_id(self.project.clone())
            .map_err(|e| anyhow::anyhow!("{} {}", StatusIcon::ERROR, e))?;
        let config = load(&self.config)?;

        let settings = RunSettings::new(&project_id)
            .with_max_concurrency(self.max_concurrency)
            .with_call_timeout(Duration::from_secs(self.timeout_secs));
        let provider = RetryingProvider::new(
            DryRunProvider::new(&project_id),
            RetryPolicy::default().with_max_retries(self.retries),
        );
        let orchestrator = Orchestrator::new(settings, Arc::new(provider))?;

        let cancel = orchestrator.cancel_handle();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, waiting for in-flight calls to finish");
                cancel.cancel();
            }
        });

        let result = orchestrator.run(&config).await;
        interrupt.abort();
        let report = result.map_err(|e| anyhow::anyhow!("Provisioning failed: {}", e))?;

        if let Some(path) = &self.outputs_file {
            let json = serde_json::to_string_pretty(&report.outputs)?;
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write outputs to {}: {}", path, e))?;
            tracing::info!(path = %path, count = report.outputs.len(), "Wrote outputs");
        }

        match self.format {
            OutputFormat::Table => {
                let renderer = TableRenderer::new();
                println!("{}", renderer.render_run_report(&report));
                println!("{}", renderer.render_outputs(&report.outputs));
            }
            OutputFormat::Json => println!("{}", report.to_json()?),
        }

        if report.cancelled {
            anyhow::bail!("Provisioning was cancelled before all resources were created");
        }
        if !report.is_success() {
            anyhow::bail!(
                "{} of {} resources were not created",
                report.failures().count(),
                report.intents.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CliArgs, Commands};

    #[test]
    fn test_apply_defaults() {
        let args = CliArgs::try_parse_from([
            "cloud-provision",
            "apply",
            "-c",
            "infra.yaml",
            "--project",
            "demo",
        ])
        .unwrap();

        match args.command {
            Commands::Apply(cmd) => {
                assert_eq!(cmd.project.as_deref(), Some("demo"));
                assert_eq!(cmd.max_concurrency, DEFAULT_MAX_CONCURRENCY);
                assert_eq!(cmd.timeout_secs, DEFAULT_CALL_TIMEOUT_SECS);
                assert_eq!(cmd.format, OutputFormat::Table);
                assert!(cmd.outputs_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_plan_json_format() {
        let args =
            CliArgs::try_parse_from(["cloud-provision", "plan", "-c", "a.toml", "--format", "json"])
                .unwrap();
        match args.command {
            Commands::Plan(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_is_required() {
        assert!(CliArgs::try_parse_from(["cloud-provision", "validate"]).is_err());
    }
}
