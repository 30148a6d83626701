//! Unleveler - rule-based unleveling patcher for Skyrim game data
//!
//! Main entry point for the command-line patcher.
//!
//! # Usage
//!
//! ```text
//! unleveler [--debug] <snapshot.yaml> [output.yaml] [config-dir]
//! ```
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/unleveler.<date>
//! 2. Load `settings.yaml` and every rule document from the config directory
//!    (default `Unleveler Data/`); any error aborts before records are touched
//! 3. Load the record snapshot (load order + per-plugin record versions)
//! 4. Run the enabled stages: items → leveled lists → outfits → zones → NPCs
//! 5. Log the run summary and write the patch (default `unleveler-patch.yaml`)
//!
//! # Configuration Files
//!
//! Expected in the config directory:
//! - `settings.yaml`: thresholds and feature flags (optional; `UNLEVELER__*`
//!   environment variables override any key)
//! - `artifact_keys.yaml`, `custom_followers.yaml`, `excluded_npcs.yaml`,
//!   `excluded_perks.yaml`, `npcs_by_edid.yaml`, `npcs_by_faction.yaml`,
//!   `race_level_modifiers.yaml`, `zones_by_edid.yaml`, `zones_by_keyword.yaml`
//!   and their `_alt` zone variants

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use unleveler::{APP_NAME, ConfigManager, MemoryStore, Metrics, Patcher, VERSION};

#[derive(Parser)]
#[command(name = "unleveler")]
#[command(version, about = "Rule-based unleveling patcher for Skyrim game data", long_about = None)]
struct Cli {
    /// Record snapshot to patch
    snapshot: Utf8PathBuf,

    /// Where the patch is written
    #[arg(default_value = "unleveler-patch.yaml")]
    output: Utf8PathBuf,

    /// Directory holding settings.yaml and the rule documents
    #[arg(default_value = "Unleveler Data")]
    config_dir: Utf8PathBuf,

    /// Log at debug level
    #[arg(short, long, env = "UNLEVELER_DEBUG")]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _guard = unleveler::logging::setup_logging_with_console("logs", "unleveler", args.debug, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let settings = config_manager.load_settings()?;
    let rules = config_manager
        .load_rules(&settings)
        .with_context(|| format!("Failed to load rules from {}", args.config_dir))?;

    let store = MemoryStore::load(&args.snapshot)?;
    tracing::info!(
        "Loaded {} records from {} plugins",
        store.len(),
        store.load_order().len()
    );

    let metrics = Metrics::new();
    let changeset = Patcher::new(&settings, &rules)
        .run(&store, &metrics)
        .context("Patch run failed")?;

    changeset.save(&args.output)?;
    tracing::info!("Run complete in {:.2?}", metrics.elapsed());
    Ok(())
}
