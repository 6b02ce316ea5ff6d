// CLI command definitions

use super::provision::{ApplyCommand, PlanCommand, ValidateCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cloud-provision",
    version,
    about = "Provision buckets, instances and container clusters from a declarative config",
    long_about = "A standalone CLI tool that validates a provisioning configuration, orders the \
                  resulting resources by dependency and creates them through a cloud provider"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Check a configuration file without contacting the provider
    Validate(ValidateCommand),

    /// Show the resources that would be created, in creation order
    Plan(PlanCommand),

    /// Create every resource in the configuration
    Apply(ApplyCommand),
}
