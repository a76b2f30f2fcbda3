//! The `quizlearn palettes` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizlearn_core::config::load_config_from;
use quizlearn_report::theme::all_palettes;

pub fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let palettes = all_palettes(&config.custom_palette);

    if json {
        println!("{}", serde_json::to_string_pretty(&palettes)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["", "Palette", "Background", "Text", "Card", "Accent"]);
    for p in &palettes {
        let marker = if p.name.eq_ignore_ascii_case(&config.palette) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker,
            p.name.as_str(),
            p.background.as_str(),
            p.text.as_str(),
            p.card.as_str(),
            p.accent.as_str(),
        ]);
    }
    println!("{table}");

    Ok(())
}
