use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use upload_hook::config::{ENV_ESP32_SCRIPT, ENV_ESP8266_SCRIPT, ENV_SHELL};
use upload_hook::{Family, UploadConfig};

pub fn run(config: Option<&Path>) -> Result<()> {
    let resolved = UploadConfig::load(config).context("Failed to load upload config")?;

    println!();
    println!("{}", "Upload configuration".cyan().bold());
    match config {
        Some(path) => println!("   {}", format!("file: {}", path.display()).dimmed()),
        None => println!("   {}", "file: (none, built-in defaults)".dimmed()),
    }
    println!();

    for line in describe(&resolved) {
        println!("  {line}");
    }

    println!();
    println!(
        "   {}",
        format!("Override with {ENV_SHELL}, {ENV_ESP8266_SCRIPT} or {ENV_ESP32_SCRIPT}").dimmed()
    );
    println!();

    Ok(())
}

/// One line per family: `<family> → <full command>`.
fn describe(config: &UploadConfig) -> Vec<String> {
    Family::ALL
        .into_iter()
        .map(|family| format!("{:<8} → {}", family.name(), config.invocation_for(family)))
        .collect()
}
