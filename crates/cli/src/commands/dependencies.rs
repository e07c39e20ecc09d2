use anyhow::Result;
use besu_dist_core::project_manager::PluginProjectManager;
use colored::*;

pub async fn execute(manager: &mut PluginProjectManager, json: bool) -> Result<()> {
    let result = manager
        .dependencies()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load Besu dependencies: {}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Dependencies for Besu".bold().underline(),
        result.besu_version.cyan().bold()
    );
    println!(
        "  {}",
        format!(
            "{} from the BOM, {} provided by besu-app, {} after merge",
            result.bom_count,
            result.provided_count,
            result.merged.len()
        )
        .dimmed()
    );

    let mut current: Option<&str> = None;
    for declaration in &result.plan.declarations {
        if current != Some(declaration.configuration.as_str()) {
            println!("\n{}:", declaration.configuration.bold());
            current = Some(declaration.configuration.as_str());
        }
        println!("  {}", declaration.notation);
    }

    if !result.plan.rejections.is_empty() {
        println!("\n{}:", "Rejected".bold());
        for rejection in &result.plan.rejections {
            println!("  {} {}", rejection.module.to_string().yellow(), rejection.reason.dimmed());
        }
    }

    Ok(())
}
