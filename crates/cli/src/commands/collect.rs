use std::path::Path;

use anyhow::Result;
use besu_dist_core::graph::ResolvedGraph;
use besu_dist_core::project_manager::PluginProjectManager;
use colored::*;

pub async fn execute(manager: &mut PluginProjectManager, graph: &Path) -> Result<()> {
    let graph = ResolvedGraph::load(graph)
        .map_err(|e| anyhow::anyhow!("Failed to load runtime graph: {}", e))?;

    let result = manager
        .collect(&graph)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to collect runtime artifacts: {}", e))?;

    println!("{}", "Plugin-only runtime artifacts".bold().underline());
    if result.classification.is_empty() {
        println!("  {}", "None, Besu provides the whole runtime classpath".dimmed());
    }
    for (file, artifact) in &result.classification.plugin_only {
        println!(
            "  {} {}",
            artifact.coordinate.to_string().cyan(),
            file.display().to_string().dimmed()
        );
    }

    println!(
        "\n{} {} of {} runtime files, catalog written to {}",
        "✓".green().bold(),
        result.classification.len(),
        result.runtime_files,
        result.catalog_path.display()
    );
    Ok(())
}
