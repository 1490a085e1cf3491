//! The `hskquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use hskquiz_core::config::{load_config_from, validate_config};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let total_entries: usize = config.sets.values().map(Vec::len).sum();
    println!(
        "{}: {} levels, {} sets, {} entries",
        config.title,
        config.levels.len(),
        config.sets.len(),
        total_entries
    );

    let warnings = validate_config(&config);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Configuration valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
