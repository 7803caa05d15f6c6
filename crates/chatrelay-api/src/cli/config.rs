//! `chatrelay config`: print the effective configuration.
//!
//! The provider key itself never appears; only whether its variable is set.

use std::path::Path;

use anyhow::Result;
use console::style;

use chatrelay_infra::llm::api_key_from_env;
use chatrelay_types::config::RelayConfig;

pub fn print_config(config: &RelayConfig, data_dir: &Path, json: bool) -> Result<()> {
    let key_present = api_key_from_env(&config.provider).is_some();

    if json {
        let value = serde_json::json!({
            "data_dir": data_dir.display().to_string(),
            "api_key_set": key_present,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let key_status = if key_present {
        style("set").green().to_string()
    } else {
        style("missing").red().to_string()
    };

    println!();
    println!("  {} {}", style("Data dir:").bold(), data_dir.display());
    println!(
        "  {} {}",
        style("Config:").bold(),
        data_dir.join("config.toml").display()
    );
    println!(
        "  {} {} ({})",
        style("API key:").bold(),
        config.provider.api_key_env,
        key_status
    );
    println!();
    println!("{}", render_toml(config)?);
    Ok(())
}

fn render_toml(config: &RelayConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
