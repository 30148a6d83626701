use super::{FormKey, Skill};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every record kind the engine reads or writes.
///
/// Records reference each other only through [`FormKey`]s. Keyword sets are
/// stored as keyword editor IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Record {
    Weapon(Weapon),
    Armor(Armor),
    LeveledItem(LeveledList),
    LeveledNpc(LeveledList),
    LeveledSpell(LeveledList),
    Spell(Spell),
    MagicEffect(MagicEffect),
    Npc(Npc),
    Class(Class),
    Perk(Perk),
    SkillTree(SkillTree),
    Race(Race),
    Faction(Faction),
    Location(Location),
    EncounterZone(EncounterZone),
    Outfit(Outfit),
    GameSetting(GameSetting),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Weapon,
    Armor,
    LeveledItem,
    LeveledNpc,
    LeveledSpell,
    Spell,
    MagicEffect,
    Npc,
    Class,
    Perk,
    SkillTree,
    Race,
    Faction,
    Location,
    EncounterZone,
    Outfit,
    GameSetting,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Weapon(_) => RecordKind::Weapon,
            Record::Armor(_) => RecordKind::Armor,
            Record::LeveledItem(_) => RecordKind::LeveledItem,
            Record::LeveledNpc(_) => RecordKind::LeveledNpc,
            Record::LeveledSpell(_) => RecordKind::LeveledSpell,
            Record::Spell(_) => RecordKind::Spell,
            Record::MagicEffect(_) => RecordKind::MagicEffect,
            Record::Npc(_) => RecordKind::Npc,
            Record::Class(_) => RecordKind::Class,
            Record::Perk(_) => RecordKind::Perk,
            Record::SkillTree(_) => RecordKind::SkillTree,
            Record::Race(_) => RecordKind::Race,
            Record::Faction(_) => RecordKind::Faction,
            Record::Location(_) => RecordKind::Location,
            Record::EncounterZone(_) => RecordKind::EncounterZone,
            Record::Outfit(_) => RecordKind::Outfit,
            Record::GameSetting(_) => RecordKind::GameSetting,
        }
    }

    pub fn editor_id(&self) -> Option<&str> {
        match self {
            Record::Weapon(r) => r.editor_id.as_deref(),
            Record::Armor(r) => r.editor_id.as_deref(),
            Record::LeveledItem(r) | Record::LeveledNpc(r) | Record::LeveledSpell(r) => {
                r.editor_id.as_deref()
            }
            Record::Spell(r) => r.editor_id.as_deref(),
            Record::MagicEffect(r) => r.editor_id.as_deref(),
            Record::Npc(r) => r.editor_id.as_deref(),
            Record::Class(r) => r.editor_id.as_deref(),
            Record::Perk(r) => r.editor_id.as_deref(),
            Record::SkillTree(r) => r.editor_id.as_deref(),
            Record::Race(r) => r.editor_id.as_deref(),
            Record::Faction(r) => r.editor_id.as_deref(),
            Record::Location(r) => r.editor_id.as_deref(),
            Record::EncounterZone(r) => r.editor_id.as_deref(),
            Record::Outfit(r) => r.editor_id.as_deref(),
            Record::GameSetting(r) => r.editor_id.as_deref(),
        }
    }

    /// In-game display name, for the kinds that carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Record::Weapon(r) => r.name.as_deref(),
            Record::Armor(r) => r.name.as_deref(),
            Record::Spell(r) => r.name.as_deref(),
            Record::MagicEffect(r) => r.name.as_deref(),
            Record::Npc(r) => r.name.as_deref(),
            Record::Class(r) => r.name.as_deref(),
            Record::Perk(r) => r.name.as_deref(),
            Record::Race(r) => r.name.as_deref(),
            Record::Faction(r) => r.name.as_deref(),
            Record::Location(r) => r.name.as_deref(),
            Record::LeveledItem(_)
            | Record::LeveledNpc(_)
            | Record::LeveledSpell(_)
            | Record::SkillTree(_)
            | Record::EncounterZone(_)
            | Record::Outfit(_)
            | Record::GameSetting(_) => None,
        }
    }

    pub fn keywords(&self) -> &[String] {
        match self {
            Record::Weapon(r) => &r.keywords,
            Record::Armor(r) => &r.keywords,
            Record::Npc(r) => &r.keywords,
            Record::Race(r) => &r.keywords,
            Record::Location(r) => &r.keywords,
            Record::LeveledItem(_)
            | Record::LeveledNpc(_)
            | Record::LeveledSpell(_)
            | Record::Spell(_)
            | Record::MagicEffect(_)
            | Record::Class(_)
            | Record::Perk(_)
            | Record::SkillTree(_)
            | Record::Faction(_)
            | Record::EncounterZone(_)
            | Record::Outfit(_)
            | Record::GameSetting(_) => &[],
        }
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords().iter().any(|k| k == keyword)
    }

    /// Entries of any of the three leveled list kinds.
    pub fn leveled_list(&self) -> Option<&LeveledList> {
        match self {
            Record::LeveledItem(list) | Record::LeveledNpc(list) | Record::LeveledSpell(list) => {
                Some(list)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weapon {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub keywords: Vec<String>,
    pub skill: Option<Skill>,
    pub damage: u16,
    pub weight: f32,
    pub value: u32,
    pub speed: f32,
    pub crit_damage: u16,
    pub crit_mult: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArmorClass {
    Heavy,
    Light,
    #[default]
    Clothing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Armor {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub keywords: Vec<String>,
    pub armor_class: ArmorClass,
    pub armor_rating: f32,
    pub weight: f32,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveledEntry {
    pub level: i16,
    pub reference: FormKey,
    #[serde(default = "default_count")]
    pub count: u16,
}

fn default_count() -> u16 {
    1
}

impl LeveledEntry {
    pub fn new(level: i16, reference: FormKey) -> Self {
        Self {
            level,
            reference,
            count: 1,
        }
    }
}

/// Shared shape of leveled item, NPC and spell lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeveledList {
    pub editor_id: Option<String>,
    pub entries: Vec<LeveledEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellType {
    #[default]
    Spell,
    Disease,
    Power,
    LesserPower,
    Ability,
    Poison,
    Addiction,
    Voice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spell {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub spell_type: SpellType,
    /// Magic effects, in the order the spell applies them.
    pub effects: Vec<FormKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicEffect {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub magic_skill: Option<Skill>,
}

/// How an NPC's level is determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum NpcLevel {
    Static { level: i16 },
    PcMultiplier { mult: f32 },
}

impl Default for NpcLevel {
    fn default() -> Self {
        NpcLevel::Static { level: 1 }
    }
}

/// Which parts of an NPC come from its template instead of itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateFlags {
    pub stats: bool,
    pub spell_list: bool,
    pub inventory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub item: FormKey,
    #[serde(default = "default_count")]
    pub count: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerkPlacement {
    pub perk: FormKey,
    #[serde(default = "default_rank")]
    pub rank: u8,
}

fn default_rank() -> u8 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Npc {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub keywords: Vec<String>,
    pub race: Option<FormKey>,
    pub class: Option<FormKey>,
    pub factions: Vec<FormKey>,
    pub level: NpcLevel,
    pub calc_min_level: i16,
    pub calc_max_level: i16,
    pub unique: bool,
    pub is_chargen_face_preset: bool,
    pub template: Option<FormKey>,
    pub template_flags: TemplateFlags,
    pub items: Vec<ContainerEntry>,
    pub default_outfit: Option<FormKey>,
    pub skills: Option<BTreeMap<Skill, u8>>,
    pub perks: Vec<PerkPlacement>,
    /// Spells and leveled spell lists.
    pub spells: Vec<FormKey>,
}

impl Npc {
    pub fn static_level(&self) -> Option<i16> {
        match self.level {
            NpcLevel::Static { level } => Some(level),
            NpcLevel::PcMultiplier { .. } => None,
        }
    }

    pub fn inherits_stats(&self) -> bool {
        self.template.is_some() && self.template_flags.stats
    }

    pub fn inherits_spell_list(&self) -> bool {
        self.template.is_some() && self.template_flags.spell_list
    }

    pub fn inherits_inventory(&self) -> bool {
        self.template.is_some() && self.template_flags.inventory
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn has_perk(&self, perk: &FormKey) -> bool {
        self.perks.iter().any(|p| &p.perk == perk)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatWeights {
    pub health: u8,
    pub magicka: u8,
    pub stamina: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Class {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub skill_weights: BTreeMap<Skill, u8>,
    pub stat_weights: StatWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl CompareOp {
    pub fn evaluate(self, lhs: f32, rhs: f32) -> bool {
        match self {
            CompareOp::EqualTo => lhs == rhs,
            CompareOp::NotEqualTo => lhs != rhs,
            CompareOp::GreaterThan => lhs > rhs,
            CompareOp::GreaterThanOrEqualTo => lhs >= rhs,
            CompareOp::LessThan => lhs < rhs,
            CompareOp::LessThanOrEqualTo => lhs <= rhs,
        }
    }
}

/// Prerequisite attached to a perk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PerkCondition {
    SkillValue {
        skill: Skill,
        op: CompareOp,
        value: f32,
    },
    HasPerk {
        perk: FormKey,
        op: CompareOp,
        value: f32,
    },
    /// Any condition function the distributor cannot evaluate.
    Other {
        #[serde(default)]
        function: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perk {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub conditions: Vec<PerkCondition>,
    pub next_perk: Option<FormKey>,
    pub effects: Vec<String>,
}

/// Ordered perk nodes of one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTree {
    #[serde(default)]
    pub editor_id: Option<String>,
    pub skill: Skill,
    #[serde(default)]
    pub perks: Vec<FormKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Race {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faction {
    pub editor_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterZone {
    pub editor_id: Option<String>,
    pub location: Option<FormKey>,
    pub min_level: i16,
    /// Zero means no upper bound.
    pub max_level: i16,
    pub match_pc_below_minimum: bool,
    pub combat_boundary_disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outfit {
    pub editor_id: Option<String>,
    pub items: Vec<FormKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSetting {
    pub editor_id: Option<String>,
    pub value: f32,
}
