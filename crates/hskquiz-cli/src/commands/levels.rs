//! The `hskquiz levels` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use hskquiz_core::catalog::LevelCatalog;
use hskquiz_core::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = LevelCatalog::from_config(&config);

    let mut table = Table::new();
    table.set_header(vec!["ID", "Level", "Kind", "Set", "Paired", "Rounds"]);
    for level in catalog.iter() {
        table.add_row(vec![
            level.id.to_string(),
            level.name.clone(),
            level.kind.to_string(),
            level.set.clone(),
            catalog
                .paired_level(level.id)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            catalog.questions_for(level).to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
