//! Config command implementation

use std::path::Path;

use anyhow::Result;
use ohm_core::config::default_config_path;
use ohm_core::OutputFormat;

use super::core::{print_json, RunContext};

pub fn cmd_config(ctx: &RunContext, explicit: Option<&Path>) -> Result<()> {
    let source = explicit
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .filter(|p| p.exists());

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "source": source.as_ref().map(|p| p.display().to_string()),
            "config": ctx.config,
        })),
        OutputFormat::Text => {
            println!("⚙️  Configuration");
            match &source {
                Some(p) => println!("   Source: {}", p.display()),
                None => println!("   Source: built-in defaults"),
            }
            if let Some(p) = default_config_path() {
                println!("   Override path: {}", p.display());
            }
            println!();
            println!("   Date columns:        {}", ctx.config.import.date_columns.join(", "));
            println!(
                "   Consumption columns: {}",
                ctx.config.import.consumption_columns.join(", ")
            );
            println!("   Output format:       {}", ctx.config.output.format);
            Ok(())
        }
    }
}
