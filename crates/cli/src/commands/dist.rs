use std::path::{Path, PathBuf};

use anyhow::Result;
use besu_dist_core::distribution::EntryKind;
use besu_dist_core::graph::ResolvedGraph;
use besu_dist_core::project_manager::PluginProjectManager;
use colored::*;

pub async fn execute(
    manager: &mut PluginProjectManager,
    graph: &Path,
    jars: &[PathBuf],
    install: bool,
) -> Result<()> {
    let graph = ResolvedGraph::load(graph)
        .map_err(|e| anyhow::anyhow!("Failed to load runtime graph: {}", e))?;

    let result = manager
        .dist(&graph, jars, install)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to assemble distribution: {}", e))?;

    println!(
        "{} {}",
        "Distribution".bold().underline(),
        manager.settings().name.cyan().bold()
    );
    for entry in &result.plan.entries {
        let label = match entry.kind {
            EntryKind::PluginJar => "jar",
            EntryKind::DistFile => "dist",
            EntryKind::RuntimeArtifact => "lib",
            EntryKind::Catalog => "catalog",
        };
        println!(
            "  {} {}",
            format!("{:<7}", label).green(),
            entry.destination.display()
        );
    }

    if !result.plan.excluded.is_empty() {
        println!("\n{}:", "Provided by Besu".bold());
        for excluded in &result.plan.excluded {
            let coordinate = if excluded.normalized_coordinate == excluded.coordinate {
                excluded.coordinate.clone()
            } else {
                format!("{} ({})", excluded.coordinate, excluded.normalized_coordinate)
            };
            println!("  {}", coordinate.dimmed());
        }
    }

    let runtime = result.plan.entries_of(EntryKind::RuntimeArtifact).count();
    match &result.install_dir {
        Some(dir) => println!(
            "\n{} Installed {} files ({} runtime artifacts) into {}",
            "✓".green().bold(),
            result.plan.entries.len(),
            runtime,
            dir.display()
        ),
        None => println!(
            "\n{} {} files ({} runtime artifacts), catalog at {}",
            "✓".green().bold(),
            result.plan.entries.len(),
            runtime,
            result.collect.catalog_path.display()
        ),
    }

    Ok(())
}
