//! Data models for the unleveler.
//!
//! - [`FormKey`]: stable record identity (`012EB7:Skyrim.esm`)
//! - [`Record`]: sum type over every record kind the patcher reads or writes
//! - [`Settings`]: numeric thresholds and feature flags from `settings.yaml`
//! - [`RuleSet`]: the ordered rule documents (`keys` / `forbidden_keys` + effect fields)
//! - [`Skill`]: the eighteen skills used by classes, perk trees and NPC skill values
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: records and settings derive `Serialize`/`Deserialize` for YAML snapshots and patches
//! - **Owned**: records are plain values; the engine mutates clones and never the snapshot copy

pub mod form_key;
pub mod records;
pub mod rules;
pub mod settings;
pub mod skills;

pub use form_key::{FormKey, FormKeyParseError, MAX_LOCAL_ID};
pub use records::{
    Armor, ArmorClass, Class, CompareOp, ContainerEntry, EncounterZone, Faction, GameSetting,
    LeveledEntry, LeveledList, Location, MagicEffect, Npc, NpcLevel, Outfit, Perk, PerkCondition,
    PerkPlacement, Race, Record, RecordKind, SkillTree, Spell, SpellType, StatWeights,
    TemplateFlags, Weapon,
};
pub use rules::{
    FactionLevelRule, KeyRule, LevelModifier, NpcLevelRule, RaceModifierRule, Rule, RuleSet,
    ZoneRule,
};
pub use settings::{
    GeneralSettings, ItemSettings, LevelFormula, LeveledListSettings, NpcSettings,
    OutfitSettings, Settings, SpawnLevelMults, Tier, ZoneSettings,
};
pub use skills::Skill;
