use serde::{Deserialize, Serialize};

/// Numeric settings bundle from `settings.yaml`.
///
/// Every field has a default so a partial file is valid. Any key can be
/// overridden through `UNLEVELER__<SECTION>__<KEY>` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub leveled_lists: LeveledListSettings,
    pub items: ItemSettings,
    pub npcs: NpcSettings,
    pub zones: ZoneSettings,
    pub outfits: OutfitSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Seed for every random level roll; equal seeds give equal patches.
    pub seed: u64,
    /// Plugin that owns records created during the run.
    pub patch_plugin: String,
    /// Progress is logged every this many records per collection.
    pub progress_interval: u64,
    /// Plugins whose perks count as base-game perks.
    pub base_game_plugins: Vec<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            patch_plugin: "Unleveled.esp".to_string(),
            progress_interval: 100,
            base_game_plugins: vanilla_masters(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeveledListSettings {
    pub unlevel_item_lists: bool,
    /// Entries above this level are purged. Zero disables the upper limit.
    pub max_item_level: i16,
    /// Entries below this level are purged.
    pub min_item_level: i16,
    pub unlevel_artifacts: bool,
    pub split_ratio: f32,
    pub allow_empty_lists: bool,
    pub weak_suffix: String,
    pub strong_suffix: String,
}

impl Default for LeveledListSettings {
    fn default() -> Self {
        Self {
            unlevel_item_lists: true,
            max_item_level: 27,
            min_item_level: 0,
            unlevel_artifacts: true,
            split_ratio: 0.4,
            allow_empty_lists: false,
            weak_suffix: "_UNL_Weak".to_string(),
            strong_suffix: "_UNL_Strong".to_string(),
        }
    }
}

impl LeveledListSettings {
    pub fn suffix(&self, tier: Tier) -> &str {
        match tier {
            Tier::Weak => &self.weak_suffix,
            Tier::Strong => &self.strong_suffix,
        }
    }
}

/// Which half of a split list or outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Weak,
    Strong,
}

impl Tier {
    pub const BOTH: [Tier; 2] = [Tier::Weak, Tier::Strong];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemSettings {
    pub rescale_items: bool,
    /// Leave items tagged `DaedricArtifact` alone.
    pub skip_artifacts: bool,
    /// Leave items tagged `MagicDisallowEnchanting` alone.
    pub skip_uniques: bool,
    pub tempering_debuff: bool,
    /// Plugins the reference items are read from.
    pub base_stat_plugins: Vec<String>,
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            rescale_items: true,
            skip_artifacts: false,
            skip_uniques: false,
            tempering_debuff: true,
            base_stat_plugins: vanilla_masters(),
        }
    }
}

/// Replacement level for NPCs that scaled with the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFormula {
    /// `round((min + max) / 2 * mult)`
    #[default]
    Midpoint,
    /// `round((min + max) / 2) + min * mult`
    MidpointPlusMinimum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcSettings {
    pub unlevel_npcs: bool,
    pub level_formula: LevelFormula,
    /// Upper level for unique player-scaling NPCs without a maximum.
    pub unique_level_cap: i16,
    /// Upper level for other player-scaling NPCs without a maximum.
    pub generic_level_cap: i16,
    pub allow_mid_tier: bool,
    /// With mid tier allowed, NPCs below this level get weak equipment.
    pub weak_tier_below: i16,
    /// NPCs above this level get strong equipment.
    pub strong_tier_above: i16,
    pub skills_per_level: f32,
    pub max_skill_level: u8,
    pub perks_per_level: f32,
    pub remove_base_game_perks: bool,
    /// NPC keywords that keep an NPC's perks untouched.
    pub perk_distribution_filter: Vec<String>,
    pub rebuild_classes: bool,
    pub disable_extra_damage_perks: bool,
    pub scaling_followers: bool,
    /// Faction editor IDs that mark an NPC as a follower.
    pub follower_factions: Vec<String>,
}

impl Default for NpcSettings {
    fn default() -> Self {
        Self {
            unlevel_npcs: true,
            level_formula: LevelFormula::Midpoint,
            unique_level_cap: 100,
            generic_level_cap: 80,
            allow_mid_tier: false,
            weak_tier_below: 13,
            strong_tier_above: 27,
            skills_per_level: 1.5,
            max_skill_level: 100,
            perks_per_level: 0.5,
            remove_base_game_perks: false,
            perk_distribution_filter: Vec::new(),
            rebuild_classes: true,
            disable_extra_damage_perks: true,
            scaling_followers: true,
            follower_factions: vec![
                "PotentialFollowerFaction".to_string(),
                "PotentialHireling".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    pub unlevel_zones: bool,
    /// Roll one level and use it as both zone minimum and maximum.
    pub static_zone_levels: bool,
    /// Read `zones_by_*_alt.yaml` instead of the regular zone documents.
    pub use_alternate_balance: bool,
    /// Zones defined or overridden by these plugins are never touched.
    pub excluded_plugins: Vec<String>,
    pub spawn_level_mults: Option<SpawnLevelMults>,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            unlevel_zones: true,
            static_zone_levels: false,
            use_alternate_balance: false,
            excluded_plugins: Vec::new(),
            spawn_level_mults: Some(SpawnLevelMults::default()),
        }
    }
}

/// Values written to the `fLeveledActorMult*` game settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnLevelMults {
    pub easy: f32,
    pub medium: f32,
    pub hard: f32,
    pub very_hard: f32,
}

impl Default for SpawnLevelMults {
    fn default() -> Self {
        Self {
            easy: 1.0,
            medium: 1.0,
            hard: 1.0,
            very_hard: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutfitSettings {
    pub split_outfits: bool,
    /// Keep weak/strong outfit copies even when nothing in them changed.
    pub keep_unchanged_variants: bool,
}

impl Default for OutfitSettings {
    fn default() -> Self {
        Self {
            split_outfits: true,
            keep_unchanged_variants: false,
        }
    }
}

fn vanilla_masters() -> Vec<String> {
    ["Skyrim.esm", "Dawnguard.esm", "Dragonborn.esm"]
        .into_iter()
        .map(String::from)
        .collect()
}
