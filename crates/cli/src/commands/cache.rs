use std::path::Path;

use anyhow::Result;
use besu_dist_core::project_manager::PluginProjectManager;
use colored::*;

use crate::CacheCommands;

pub async fn execute(project_dir: &Path, command: CacheCommands) -> Result<()> {
    let cache = PluginProjectManager::artifact_cache(project_dir)
        .map_err(|e| anyhow::anyhow!("Failed to open artifact cache: {}", e))?;

    match command {
        CacheCommands::List => {
            let cached_artifacts = cache.list_cached_artifacts()?;
            if cached_artifacts.is_empty() {
                println!("No cached artifacts found.");
            } else {
                println!("{}", "Cached artifacts:".bold());
                for (name, path) in cached_artifacts {
                    println!("  {} -> {}", name.cyan(), path.display());
                }
            }
        }
        CacheCommands::Clear => {
            cache.clear_cache().await?;
            println!(
                "{} Artifact cache cleared: {}",
                "✓".green().bold(),
                cache.cache_dir().display()
            );
        }
    }

    Ok(())
}
