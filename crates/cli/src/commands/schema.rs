use anyhow::Result;
use besu_dist_core::configs::project::config_schema;

pub fn execute() -> Result<()> {
    let schema =
        config_schema().map_err(|e| anyhow::anyhow!("Failed to generate schema: {}", e))?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
