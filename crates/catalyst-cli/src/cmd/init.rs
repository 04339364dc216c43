use super::short_id;
use crate::output::print_json;
use anyhow::Context;
use catalyst_core::{config::Config, io, paths, repository};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let dir = paths::catalyst_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_created = !Config::exists(root);
    if config_created {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
    }
    let config = Config::load(root).context("failed to load config")?;

    let repo = repository::open(root, &config.storage)?;
    let (cycle, cycle_created) = repository::load_or_init(repo.as_ref(), config.storage.user_key())
        .with_context(|| format!("failed to initialize cycle in {}", repo.describe()))?;

    if json {
        return print_json(&serde_json::json!({
            "root": root,
            "configCreated": config_created,
            "cycleCreated": cycle_created,
            "cycleId": cycle.id,
            "startDate": cycle.start_date,
        }));
    }

    println!("Initializing Catalyst in: {}", root.display());
    let mark = |created: bool| if created { "created:" } else { "exists: " };
    println!("  {} {}", mark(config_created), paths::CONFIG_FILE);
    println!("  {} cycle in {}", mark(cycle_created), repo.describe());
    println!(
        "\nCycle {} started {}. Next: `catalyst vision set \"...\"`",
        short_id(&cycle.id),
        cycle.start_date.format("%Y-%m-%d")
    );
    Ok(())
}
