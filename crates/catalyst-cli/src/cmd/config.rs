use crate::output::print_json;
use anyhow::Context;
use catalyst_core::config::{Config, StorageBackend, WarnLevel};
use catalyst_core::paths;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration (defaults filled in)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    match subcmd {
        ConfigSubcommand::Show => show(root, &config, json),
        ConfigSubcommand::Validate => validate(&config, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }

    let source = if Config::exists(root) {
        paths::config_path(root).display().to_string()
    } else {
        "(defaults; no config file)".to_string()
    };
    println!("Config:   {source}");

    match &config.storage {
        StorageBackend::Local => {
            println!("Storage:  local ({})", paths::cycle_path(root).display());
        }
        StorageBackend::Remote {
            base_url,
            collection,
            user,
            token_env,
        } => {
            println!("Storage:  remote {base_url}/{collection}/{user}");
            if let Some(env) = token_env {
                println!("          token from ${env}");
            }
        }
    }

    let backend = &config.coach.backend;
    println!(
        "Coach:    {} model={} (key from ${})",
        backend.kind(),
        backend.model(),
        backend.api_key_env()
    );
    println!(
        "          timeout={}s temperature={}",
        config.coach.timeout_secs, config.coach.temperature
    );
    println!("Sync:     debounce {}ms", config.sync.debounce_ms);
    println!(
        "Calendar: {} blocks at {:02}:00 UTC",
        config.calendar.block, config.calendar.start_hour
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
