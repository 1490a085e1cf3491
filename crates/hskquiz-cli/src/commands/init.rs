//! The `hskquiz init` command.

use anyhow::Result;

use hskquiz_core::config::{BUILTIN_CONFIG, DEFAULT_CONFIG_PATH};

pub fn execute() -> Result<()> {
    if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() {
        println!("{DEFAULT_CONFIG_PATH} already exists, skipping.");
    } else {
        std::fs::write(DEFAULT_CONFIG_PATH, BUILTIN_CONFIG)?;
        println!("Created {DEFAULT_CONFIG_PATH}");
    }

    for folder in ["gohoubi_images", "zannen_images"] {
        std::fs::create_dir_all(folder)?;
    }
    println!("Created reward folders gohoubi_images/ and zannen_images/");

    println!("\nNext steps:");
    println!("  1. Drop reward images into gohoubi_images/ and zannen_images/");
    println!("  2. Run: hskquiz validate");
    println!("  3. Run: hskquiz play");

    Ok(())
}
