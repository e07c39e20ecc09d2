use std::path::PathBuf;

use anyhow::Result;
use besu_dist_core::configs::project::ConfigOverrides;
use besu_dist_core::project_manager::{PluginProjectManager, PluginProjectManagerConfig};
use clap::{Parser, Subcommand};

mod commands;
mod logging;

/// besu-dist - Build tooling for Besu plugins
#[derive(Parser)]
#[command(name = "besu-dist")]
#[command(about = "Align a Besu plugin with its host and assemble its distribution")]
#[command(version)]
struct Cli {
    /// Path to the plugin project (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    project: PathBuf,

    /// Besu version to build against (overrides BESU_VERSION and besu-plugin.yml)
    #[arg(long, global = true)]
    besu_version: Option<String>,

    /// Repository serving Besu artifacts (overrides BESU_REPO and besu-plugin.yml)
    #[arg(long, global = true)]
    besu_repo: Option<String>,

    /// Log per-dependency decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dependencies declared for the configured Besu version
    Dependencies {
        /// Print the declaration plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify the runtime classpath and write the plugin artifacts catalog
    Collect {
        /// Resolved runtime graph exported by the build
        #[arg(long)]
        graph: PathBuf,
    },
    /// Lay out the plugin distribution
    Dist {
        /// Resolved runtime graph exported by the build
        #[arg(long)]
        graph: PathBuf,
        /// Plugin jar to include (repeatable)
        #[arg(long = "jar")]
        jars: Vec<PathBuf>,
        /// Copy the distribution into <buildDir>/install/<name>
        #[arg(long)]
        install: bool,
    },
    /// Manage the artifact download cache
    Cache {
        #[command(subcommand)]
        cache_command: CacheCommands,
    },
    /// Print the JSON schema of besu-plugin.yml
    Schema,
}

#[derive(Subcommand)]
enum CacheCommands {
    /// List cached artifacts
    List,
    /// Clear the artifact cache
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let overrides = ConfigOverrides {
        besu_version: cli.besu_version,
        besu_repo: cli.besu_repo,
    }
    .with_env_fallback();

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::Dependencies { json } => {
            let mut manager = project_manager(cli.project, overrides)?;
            commands::dependencies::execute(&mut manager, json).await
        }
        Commands::Collect { graph } => {
            let mut manager = project_manager(cli.project, overrides)?;
            commands::collect::execute(&mut manager, &graph).await
        }
        Commands::Dist {
            graph,
            jars,
            install,
        } => {
            let mut manager = project_manager(cli.project, overrides)?;
            commands::dist::execute(&mut manager, &graph, &jars, install).await
        }
        Commands::Cache { cache_command } => {
            commands::cache::execute(&cli.project, cache_command).await
        }
        Commands::Schema => commands::schema::execute(),
    }
}

fn project_manager(project_dir: PathBuf, overrides: ConfigOverrides) -> Result<PluginProjectManager> {
    PluginProjectManager::new(PluginProjectManagerConfig {
        project_dir,
        overrides,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize plugin project: {}", e))
}
