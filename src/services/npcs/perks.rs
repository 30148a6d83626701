//! Perk distribution along skill perk trees.
//!
//! The perk budget is split over the class skills by weight. For each skill
//! the tree is walked in order, granting every grantable node and following
//! its `next_perk` chain, until the skill's share is spent or a full walk
//! grants nothing. Unspent points carry over to the next skill.

use super::StepResult;
use crate::models::{
    CompareOp, FormKey, KeyRule, Npc, NpcSettings, Perk, PerkCondition, PerkPlacement, Record,
    RecordKind, Skill,
};
use crate::services::matching::{MatchMode, any_match};
use crate::store::{Changeset, RecordStore, Resolver};
use std::collections::BTreeMap;

/// Skill boost perks every actor needs; never stripped.
pub const PROTECTED_PERKS: [&str; 2] = ["AlchemySkillBoosts", "PerkSkillBoosts"];

/// Race keywords of actors whose perks are redistributed.
const PERK_RACE_KEYWORDS: [&str; 2] = ["ActorTypeNPC", "ActorTypeUndead"];

const EXTRA_DAMAGE_MARKER: &str = "crextradamage";

pub struct PerkDistributor<'a> {
    settings: &'a NpcSettings,
    excluded_perks: &'a [KeyRule],
    base_game_plugins: &'a [String],
}

impl<'a> PerkDistributor<'a> {
    pub fn new(settings: &'a NpcSettings, excluded_perks: &'a [KeyRule], base_game_plugins: &'a [String]) -> Self {
        Self {
            settings,
            excluded_perks,
            base_game_plugins,
        }
    }

    /// Rebuild the NPC's perk list. `resolver` sees the patch so far; the
    /// store answers base-game and perk-tree questions.
    pub fn distribute<S, R>(&self, store: &S, resolver: &R, npc: &mut Npc) -> StepResult
    where
        S: RecordStore + ?Sized,
        R: Resolver + ?Sized,
    {
        if self.settings.perks_per_level <= 0.0 || !self.should_modify(resolver, npc) {
            return StepResult::Unchanged;
        }
        let Some(class) = npc.class.as_ref().and_then(|key| resolver.resolve_class(key)) else {
            return StepResult::Unchanged;
        };
        let Some(skills) = npc.skills.clone() else {
            return StepResult::Unchanged;
        };

        let before = npc.perks.clone();
        if self.settings.remove_base_game_perks {
            self.remove_base_game_perks(store, resolver, npc);
        }

        let weight_sum: u32 = class.skill_weights.values().map(|w| u32::from(*w)).sum();
        if weight_sum == 0 {
            tracing::warn!(
                "Class of {} has no skill weights, skipping perk distribution",
                npc.editor_id.as_deref().unwrap_or("<npc>")
            );
            npc.perks = before;
            return StepResult::Skipped;
        }

        let budget = match npc.static_level() {
            Some(level) => self.settings.perks_per_level * level as f32,
            None => self.settings.perks_per_level,
        };

        let mut overflow = 0u32;
        for (skill, weight) in &class.skill_weights {
            if *weight == 0 {
                continue;
            }
            let share = overflow as f32 + budget * (f32::from(*weight) / weight_sum as f32);
            let mut to_spend = share.round().max(0.0) as u32;
            if to_spend == 0 {
                continue;
            }
            let Some(tree) = store.skill_tree(*skill) else {
                continue;
            };

            while to_spend > 0 {
                let mut added = false;
                for node in &tree.perks {
                    if to_spend == 0 {
                        break;
                    }
                    let Some(mut perk) = resolver.resolve_perk(node) else {
                        continue;
                    };
                    if perk.editor_id.as_deref().is_none_or(|id| self.is_excluded(id)) {
                        continue;
                    }
                    if self.is_grantable(resolver, npc, &skills, node, perk) {
                        grant(npc, node);
                        to_spend -= 1;
                        added = true;
                    }

                    // A held node still lets its chain progress.
                    while to_spend > 0 {
                        let Some(next_key) = perk.next_perk.as_ref() else {
                            break;
                        };
                        let Some(next) = resolver.resolve_perk(next_key) else {
                            break;
                        };
                        if !self.is_grantable(resolver, npc, &skills, next_key, next) {
                            break;
                        }
                        grant(npc, next_key);
                        to_spend -= 1;
                        added = true;
                        perk = next;
                    }
                }

                if added {
                    overflow = 0;
                } else {
                    overflow = to_spend;
                    break;
                }
            }
        }

        StepResult::from(npc.perks != before)
    }

    /// Keyword and race filters.
    pub fn should_modify<R: Resolver + ?Sized>(&self, resolver: &R, npc: &Npc) -> bool {
        if npc.inherits_spell_list() {
            return false;
        }
        if self
            .settings
            .perk_distribution_filter
            .iter()
            .any(|keyword| npc.has_keyword(keyword))
        {
            return false;
        }
        npc.race
            .as_ref()
            .and_then(|key| resolver.resolve_race(key))
            .is_some_and(|race| {
                race.keywords
                    .iter()
                    .any(|keyword| PERK_RACE_KEYWORDS.contains(&keyword.as_str()))
            })
    }

    /// Not held, not excluded, and every condition holds.
    pub fn is_grantable<R: Resolver + ?Sized>(
        &self,
        resolver: &R,
        npc: &Npc,
        skills: &BTreeMap<Skill, u8>,
        key: &FormKey,
        perk: &Perk,
    ) -> bool {
        let Some(editor_id) = perk.editor_id.as_deref() else {
            return false;
        };
        if npc.has_perk(key) || self.is_excluded(editor_id) {
            return false;
        }

        perk.conditions.iter().all(|condition| match condition {
            PerkCondition::SkillValue { skill, op, value } => {
                let current = skills.get(skill).copied().unwrap_or(0);
                op.evaluate(f32::from(current), *value)
            }
            PerkCondition::HasPerk { perk, op, value } => {
                resolver.resolve_perk(perk).is_some() && has_perk_holds(npc.has_perk(perk), *op, *value)
            }
            PerkCondition::Other { .. } => false,
        })
    }

    fn is_excluded(&self, editor_id: &str) -> bool {
        any_match(self.excluded_perks, editor_id, MatchMode::ContainsIgnoreCase)
    }

    fn remove_base_game_perks<S, R>(&self, store: &S, resolver: &R, npc: &mut Npc)
    where
        S: RecordStore + ?Sized,
        R: Resolver + ?Sized,
    {
        npc.perks.retain(|placement| {
            let protected = resolver
                .editor_id_of(&placement.perk)
                .is_some_and(|id| PROTECTED_PERKS.contains(&id));
            protected
                || store
                    .resolve_in(&placement.perk, self.base_game_plugins)
                    .is_none()
        });
    }
}

fn grant(npc: &mut Npc, perk: &FormKey) {
    npc.perks.push(PerkPlacement {
        perk: perk.clone(),
        rank: 1,
    });
}

fn has_perk_holds(has: bool, op: CompareOp, value: f32) -> bool {
    op.evaluate(if has { 1.0 } else { 0.0 }, value)
}

/// Clear the effects of every `crExtraDamage` perk. Returns the number of
/// perks overridden.
pub fn disable_extra_damage_perks<S: RecordStore + ?Sized>(store: &S, changeset: &mut Changeset) -> usize {
    let mut disabled = 0;
    for (key, record) in store.winning(RecordKind::Perk) {
        let Record::Perk(perk) = record else {
            continue;
        };
        let is_extra_damage = perk
            .editor_id
            .as_deref()
            .is_some_and(|id| id.to_lowercase().contains(EXTRA_DAMAGE_MARKER));
        if !is_extra_damage || perk.effects.is_empty() {
            continue;
        }

        let mut copy = perk.clone();
        copy.effects.clear();
        changeset.set(key.clone(), Record::Perk(copy));
        disabled += 1;
    }
    disabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Class, NpcLevel, Race, SkillTree};
    use crate::store::MemoryStore;

    const MASTER: &str = "Skyrim.esm";
    const MOD: &str = "Perks.esp";

    fn key(id: u32) -> FormKey {
        FormKey::new(id, MASTER)
    }

    fn perk(editor_id: &str, conditions: Vec<PerkCondition>, next: Option<FormKey>) -> Record {
        Record::Perk(Perk {
            editor_id: Some(editor_id.into()),
            conditions,
            next_perk: next,
            ..Default::default()
        })
    }

    fn skill_at_least(skill: Skill, value: f32) -> PerkCondition {
        PerkCondition::SkillValue {
            skill,
            op: CompareOp::GreaterThanOrEqualTo,
            value,
        }
    }

    /// Destruction tree: Novice (0) -> Augmented Flames 1 -> 2 chain,
    /// Apprentice (25) requires Novice, Expert (75).
    fn store() -> MemoryStore {
        let mut store = MemoryStore::new([MASTER, MOD]);
        let records = [
            (key(0x10), perk("NoviceDestruction", vec![], None)),
            (
                key(0x11),
                perk(
                    "AugmentedFlames10",
                    vec![skill_at_least(Skill::Destruction, 30.0)],
                    Some(key(0x12)),
                ),
            ),
            (
                key(0x12),
                perk("AugmentedFlames20", vec![skill_at_least(Skill::Destruction, 60.0)], None),
            ),
            (
                key(0x13),
                perk(
                    "ApprenticeDestruction",
                    vec![
                        skill_at_least(Skill::Destruction, 25.0),
                        PerkCondition::HasPerk {
                            perk: key(0x10),
                            op: CompareOp::EqualTo,
                            value: 1.0,
                        },
                    ],
                    None,
                ),
            ),
            (
                key(0x14),
                perk("ExpertDestruction", vec![skill_at_least(Skill::Destruction, 75.0)], None),
            ),
            (
                key(0x20),
                Record::SkillTree(SkillTree {
                    editor_id: Some("AVDestruction".into()),
                    skill: Skill::Destruction,
                    perks: vec![key(0x10), key(0x11), key(0x13), key(0x14)],
                }),
            ),
            (
                key(0x30),
                Record::Class(Class {
                    skill_weights: BTreeMap::from([(Skill::Destruction, 2), (Skill::Block, 0)]),
                    ..Default::default()
                }),
            ),
            (
                key(0x40),
                Record::Race(Race {
                    editor_id: Some("NordRace".into()),
                    keywords: vec!["ActorTypeNPC".into()],
                    ..Default::default()
                }),
            ),
            (
                key(0x41),
                Record::Race(Race {
                    editor_id: Some("WolfRace".into()),
                    keywords: vec!["ActorTypeAnimal".into()],
                    ..Default::default()
                }),
            ),
            (key(0x50), perk("AlchemySkillBoosts", vec![], None)),
            (key(0x51), perk("crExtraDamageDragon", vec![], None)),
        ];
        for (key, record) in records {
            store.insert(MASTER, key, record).unwrap();
        }
        store
            .insert(
                MOD,
                FormKey::new(0x900, MOD),
                perk("ModdedPerk", vec![], None),
            )
            .unwrap();
        store
    }

    fn mage(level: i16, destruction: u8) -> Npc {
        Npc {
            editor_id: Some("EncWarlock01".into()),
            race: Some(key(0x40)),
            class: Some(key(0x30)),
            level: NpcLevel::Static { level },
            skills: Some(BTreeMap::from([(Skill::Destruction, destruction)])),
            ..Default::default()
        }
    }

    fn granted(npc: &Npc) -> Vec<u32> {
        npc.perks.iter().map(|p| p.perk.id).collect()
    }

    #[test]
    fn test_tree_walk_follows_chains_and_prerequisites() {
        let store = store();
        let settings = NpcSettings::default();
        let distributor = PerkDistributor::new(&settings, &[], &[]);

        // 0.5 perks per level at level 10: five perks, only four reachable at 65.
        let mut npc = mage(10, 65);
        assert_eq!(distributor.distribute(&store, &store, &mut npc), StepResult::Changed);
        assert_eq!(granted(&npc), vec![0x10, 0x11, 0x12, 0x13]);
    }

    #[test]
    fn test_budget_limits_grants() {
        let store = store();
        let settings = NpcSettings::default();
        let distributor = PerkDistributor::new(&settings, &[], &[]);

        let mut npc = mage(4, 100);
        distributor.distribute(&store, &store, &mut npc);
        assert_eq!(granted(&npc), vec![0x10, 0x11]);
    }

    #[test]
    fn test_excluded_perks_are_skipped() {
        let store = store();
        let settings = NpcSettings::default();
        let excluded = vec![KeyRule::new(["augmented"], Vec::<String>::new())];
        let distributor = PerkDistributor::new(&settings, &excluded, &[]);

        let mut npc = mage(10, 100);
        distributor.distribute(&store, &store, &mut npc);
        assert_eq!(granted(&npc), vec![0x10, 0x13, 0x14]);
    }

    #[test]
    fn test_filters_keep_perks_untouched() {
        let store = store();
        let settings = NpcSettings {
            perk_distribution_filter: vec!["ActorTypeDwarven".into()],
            ..Default::default()
        };
        let distributor = PerkDistributor::new(&settings, &[], &[]);

        let mut wolf = Npc {
            race: Some(key(0x41)),
            ..mage(10, 65)
        };
        assert_eq!(distributor.distribute(&store, &store, &mut wolf), StepResult::Unchanged);
        assert!(wolf.perks.is_empty());

        let mut centurion = Npc {
            keywords: vec!["ActorTypeDwarven".into()],
            ..mage(10, 65)
        };
        assert_eq!(distributor.distribute(&store, &store, &mut centurion), StepResult::Unchanged);
    }

    #[test]
    fn test_base_game_perks_removed_except_protected() {
        let store = store();
        let settings = NpcSettings {
            remove_base_game_perks: true,
            perks_per_level: 0.1,
            ..Default::default()
        };
        let base = vec![MASTER.to_string()];
        let distributor = PerkDistributor::new(&settings, &[], &base);

        let mut npc = mage(10, 0);
        npc.perks = vec![
            PerkPlacement { perk: key(0x14), rank: 1 },
            PerkPlacement { perk: key(0x50), rank: 1 },
            PerkPlacement {
                perk: FormKey::new(0x900, MOD),
                rank: 1,
            },
        ];
        distributor.distribute(&store, &store, &mut npc);
        assert_eq!(granted(&npc), vec![0x50, 0x900, 0x10]);
    }

    #[test]
    fn test_zero_weight_class_is_skipped() {
        let mut store = store();
        store
            .insert(MOD, key(0x30), Record::Class(Class::default()))
            .unwrap();
        let settings = NpcSettings::default();
        let distributor = PerkDistributor::new(&settings, &[], &[]);

        let mut npc = mage(10, 65);
        assert_eq!(distributor.distribute(&store, &store, &mut npc), StepResult::Skipped);
        assert!(npc.perks.is_empty());
    }

    #[test]
    fn test_disable_extra_damage_perks() {
        let mut store = store();
        store
            .insert(
                MOD,
                key(0x51),
                Record::Perk(Perk {
                    editor_id: Some("crExtraDamageDragon".into()),
                    effects: vec!["DamageMult".into()],
                    ..Default::default()
                }),
            )
            .unwrap();
        let mut changeset = Changeset::new("Unleveled.esp");

        assert_eq!(disable_extra_damage_perks(&store, &mut changeset), 1);
        let Some(Record::Perk(perk)) = changeset.get(&key(0x51)) else {
            panic!("perk was not overridden");
        };
        assert!(perk.effects.is_empty());
    }
}
