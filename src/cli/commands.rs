// CLI command definitions

use super::render::{LabelsCommand, RenderPageCommand, RenderPdbCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "chart-stencil",
    version,
    about = "Offline renderer for chart resources and layered page templates",
    long_about = "Renders gated PodDisruptionBudget manifests from a values tree and composes HTML pages from layered templates, without contacting a cluster"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render a component's PodDisruptionBudget if every gate holds
    RenderPdb(RenderPdbCommand),

    /// Show the merged labels of a component and where each value came from
    Labels(LabelsCommand),

    /// Compose a page from a template directory
    RenderPage(RenderPageCommand),
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::RenderPdb(cmd) => cmd.execute(),
            Commands::Labels(cmd) => cmd.execute(),
            Commands::RenderPage(cmd) => cmd.execute(),
        }
    }
}
