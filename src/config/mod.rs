mod validate;

pub use validate::{validate_rules, validate_settings};

use crate::models::{
    FactionLevelRule, KeyRule, NpcLevelRule, RaceModifierRule, RuleSet, Settings, ZoneRule,
};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use std::fs;
use thiserror::Error;

/// Settings bundle file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Prefix of environment overrides, e.g. `UNLEVELER__NPCS__UNIQUE_LEVEL_CAP=90`.
pub const ENV_PREFIX: &str = "UNLEVELER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Rule document not found: {0}")]
    MissingDocument(Utf8PathBuf),

    #[error("Failed to parse {path}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Failed to load settings")]
    Settings(#[from] config::ConfigError),

    #[error("Invalid {document}: {message}")]
    Invalid { document: String, message: String },
}

impl ConfigError {
    pub fn invalid(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            document: document.into(),
            message: message.into(),
        }
    }
}

/// Configuration manager for the settings bundle and the rule documents.
///
/// Everything lives in one directory (`Unleveler Data` by default):
/// - `settings.yaml`: numeric thresholds and feature flags, optional
/// - one YAML list per rule document, all required
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for `config_dir`, creating the directory
    /// if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load `settings.yaml` with environment overrides applied on top.
    ///
    /// A missing file yields the defaults (plus overrides).
    pub fn load_settings(&self) -> Result<Settings> {
        self.load_settings_with_env(None)
    }

    /// Like [`load_settings`](Self::load_settings), reading overrides from
    /// `env` instead of the process environment when given.
    pub fn load_settings_with_env(&self, env: Option<config::Map<String, String>>) -> Result<Settings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let settings: Settings = config::Config::builder()
            .add_source(
                config::File::from(self.settings_path.as_std_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?;

        validate_settings(&settings)?;
        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save a settings bundle.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Load and validate every rule document.
    ///
    /// With `use_alternate_balance` the zone documents are read from their
    /// `_alt` variants.
    pub fn load_rules(&self, settings: &Settings) -> Result<RuleSet> {
        let (zones_by_edid, zones_by_keyword) = if settings.zones.use_alternate_balance {
            tracing::info!("Using alternate zone balance");
            ("zones_by_edid_alt.yaml", "zones_by_keyword_alt.yaml")
        } else {
            ("zones_by_edid.yaml", "zones_by_keyword.yaml")
        };

        let rules = RuleSet {
            artifact_keys: self.load_document::<KeyRule>("artifact_keys.yaml")?,
            followers: self.load_document::<KeyRule>("custom_followers.yaml")?,
            excluded_npcs: self.load_document::<KeyRule>("excluded_npcs.yaml")?,
            excluded_perks: self.load_document::<KeyRule>("excluded_perks.yaml")?,
            npcs_by_edid: self.load_document::<NpcLevelRule>("npcs_by_edid.yaml")?,
            npcs_by_faction: self.load_document::<FactionLevelRule>("npcs_by_faction.yaml")?,
            race_modifiers: self.load_document::<RaceModifierRule>("race_level_modifiers.yaml")?,
            zones_by_edid: self.load_document::<ZoneRule>(zones_by_edid)?,
            zones_by_keyword: self.load_document::<ZoneRule>(zones_by_keyword)?,
        };

        validate_rules(&rules)?;
        tracing::info!(
            "Loaded rules: {} artifact, {} follower, {} excluded NPC, {} excluded perk, {} NPC, {} faction, {} race, {} zone",
            rules.artifact_keys.len(),
            rules.followers.len(),
            rules.excluded_npcs.len(),
            rules.excluded_perks.len(),
            rules.npcs_by_edid.len(),
            rules.npcs_by_faction.len(),
            rules.race_modifiers.len(),
            rules.zones_by_edid.len() + rules.zones_by_keyword.len(),
        );
        Ok(rules)
    }

    /// Read one rule document. A blank file is an empty list.
    fn load_document<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, ConfigError> {
        let path = self.config_dir.join(name);
        if !path.exists() {
            return Err(ConfigError::MissingDocument(path));
        }

        let file_contents = fs::read_to_string(&path).map_err(|err| {
            ConfigError::invalid(name, format!("unreadable: {}", err))
        })?;
        if file_contents.trim().is_empty() {
            tracing::debug!("Rule document {} is empty", path);
            return Ok(Vec::new());
        }

        let document: Vec<T> = serde_yaml_ng::from_str(&file_contents)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        tracing::debug!("Loaded {} rules from {}", document.len(), path);
        Ok(document)
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RULE_DOCUMENTS: [&str; 11] = [
        "artifact_keys.yaml",
        "custom_followers.yaml",
        "excluded_npcs.yaml",
        "excluded_perks.yaml",
        "npcs_by_edid.yaml",
        "npcs_by_faction.yaml",
        "race_level_modifiers.yaml",
        "zones_by_edid.yaml",
        "zones_by_keyword.yaml",
        "zones_by_edid_alt.yaml",
        "zones_by_keyword_alt.yaml",
    ];

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        for name in RULE_DOCUMENTS {
            fs::write(config_path.join(name), "[]\n").unwrap();
        }
        (manager, temp_dir)
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.load_settings_with_env(Some(config::Map::new())).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_save_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut settings = Settings::default();
        settings.general.seed = 42;
        settings.npcs.unique_level_cap = 90;
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings_with_env(Some(config::Map::new())).unwrap();
        assert_eq!(loaded.general.seed, 42);
        assert_eq!(loaded.npcs.unique_level_cap, 90);
    }

    #[test]
    fn test_env_overrides_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.config_dir().join(SETTINGS_FILE), "npcs:\n  generic_level_cap: 60\n").unwrap();

        let env = config::Map::from([
            ("UNLEVELER__NPCS__GENERIC_LEVEL_CAP".to_string(), "70".to_string()),
            ("UNLEVELER__ZONES__STATIC_ZONE_LEVELS".to_string(), "true".to_string()),
        ]);
        let settings = manager.load_settings_with_env(Some(env)).unwrap();
        assert_eq!(settings.npcs.generic_level_cap, 70);
        assert!(settings.zones.static_zone_levels);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.config_dir().join(SETTINGS_FILE), "leveled_lists:\n  split_ratio: 1.5\n").unwrap();

        let err = manager.load_settings_with_env(Some(config::Map::new())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_missing_rule_document() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::remove_file(manager.config_dir().join("npcs_by_faction.yaml")).unwrap();

        let err = manager.load_rules(&Settings::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingDocument(_))
        ));
    }

    #[test]
    fn test_alternate_zone_documents() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(
            manager.config_dir().join("zones_by_edid_alt.yaml"),
            "- keys: [Dwemer]\n  min_level: 20\n  max_level: 40\n  range: 10\n",
        )
        .unwrap();

        let mut settings = Settings::default();
        assert!(manager.load_rules(&settings).unwrap().zones_by_edid.is_empty());

        settings.zones.use_alternate_balance = true;
        let rules = manager.load_rules(&settings).unwrap();
        assert_eq!(rules.zones_by_edid.len(), 1);
        assert_eq!(rules.zones_by_edid[0].range, Some(10));
        assert_eq!(rules.zones_by_edid[0].rule.keys, vec!["Dwemer".to_string()]);
    }

    #[test]
    fn test_blank_document_is_empty() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.config_dir().join("excluded_perks.yaml"), "\n").unwrap();
        assert!(manager.load_rules(&Settings::default()).unwrap().excluded_perks.is_empty());
    }
}
