use serde::{Deserialize, Serialize};

/// Match/forbid key sets shared by every rule document.
///
/// A candidate name matches when it satisfies at least one key and none of
/// the forbidden keys. See [`crate::services::matching`] for the comparison
/// modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRule {
    pub keys: Vec<String>,
    pub forbidden_keys: Vec<String>,
}

impl KeyRule {
    pub fn new<K, F>(keys: K, forbidden_keys: F) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            forbidden_keys: forbidden_keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Anything carrying a [`KeyRule`], so one matcher serves every document.
pub trait Rule {
    fn key_rule(&self) -> &KeyRule;
}

impl Rule for KeyRule {
    fn key_rule(&self) -> &KeyRule {
        self
    }
}

/// `npcs_by_edid.yaml`: fixed level for NPCs whose editor ID matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcLevelRule {
    #[serde(flatten)]
    pub rule: KeyRule,
    pub level: i16,
}

/// `npcs_by_faction.yaml`: fixed level or level band for faction members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionLevelRule {
    #[serde(flatten)]
    pub rule: KeyRule,
    pub level: Option<i16>,
    pub min_level: Option<i16>,
    pub max_level: Option<i16>,
}

/// `race_level_modifiers.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceModifierRule {
    #[serde(flatten)]
    pub rule: KeyRule,
    pub level_modifier_add: Option<i16>,
    pub level_modifier_mult: Option<f32>,
}

impl RaceModifierRule {
    pub fn modifier(&self) -> LevelModifier {
        LevelModifier {
            add: self.level_modifier_add.unwrap_or(0),
            mult: self.level_modifier_mult.unwrap_or(1.0),
        }
    }
}

/// Additive and multiplicative adjustment applied to assigned NPC levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelModifier {
    pub add: i16,
    pub mult: f32,
}

impl Default for LevelModifier {
    fn default() -> Self {
        Self { add: 0, mult: 1.0 }
    }
}

impl LevelModifier {
    /// `level * mult + add`, truncated, never below 1.
    pub fn apply(self, level: i16) -> i16 {
        let scaled = (level as f32 * self.mult + self.add as f32).max(1.0);
        scaled as i16
    }
}

/// Level band for encounter zones, from `zones_by_edid.yaml` and
/// `zones_by_keyword.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRule {
    #[serde(flatten)]
    pub rule: KeyRule,
    pub min_level: i16,
    pub max_level: i16,
    /// Width of the rolled band. `None` leaves the zone without an upper bound.
    pub range: Option<i16>,
    pub enable_combat_boundary: Option<bool>,
}

macro_rules! impl_rule {
    ($($ty:ty),*) => {
        $(impl Rule for $ty {
            fn key_rule(&self) -> &KeyRule {
                &self.rule
            }
        })*
    };
}

impl_rule!(NpcLevelRule, FactionLevelRule, RaceModifierRule, ZoneRule);

/// Every rule document, loaded once before any record is processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub artifact_keys: Vec<KeyRule>,
    pub followers: Vec<KeyRule>,
    pub excluded_npcs: Vec<KeyRule>,
    pub excluded_perks: Vec<KeyRule>,
    pub npcs_by_edid: Vec<NpcLevelRule>,
    pub npcs_by_faction: Vec<FactionLevelRule>,
    pub race_modifiers: Vec<RaceModifierRule>,
    pub zones_by_edid: Vec<ZoneRule>,
    pub zones_by_keyword: Vec<ZoneRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_rule_yaml() {
        let yaml = r#"
- keys: [Bandit]
  forbidden_keys: [BanditChief]
  level: 12
- keys: [Draugr]
  level: 20
"#;
        let rules: Vec<NpcLevelRule> = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule.forbidden_keys, vec!["BanditChief"]);
        assert_eq!(rules[1].level, 20);
        assert!(rules[1].rule.forbidden_keys.is_empty());
    }

    #[test]
    fn test_race_modifier_defaults() {
        let yaml = "- keys: [Orc]\n  level_modifier_mult: 1.2\n";
        let rules: Vec<RaceModifierRule> = serde_yaml_ng::from_str(yaml).unwrap();
        let modifier = rules[0].modifier();
        assert_eq!(modifier.add, 0);
        assert_eq!(modifier.mult, 1.2);
    }

    #[test]
    fn test_level_modifier_apply() {
        assert_eq!(LevelModifier::default().apply(10), 10);
        assert_eq!(LevelModifier { add: 5, mult: 1.5 }.apply(10), 20);
        assert_eq!(LevelModifier { add: -20, mult: 1.0 }.apply(10), 1);
        assert_eq!(LevelModifier { add: 0, mult: 0.75 }.apply(7), 5);
    }
}
