//! NPC leveling pipeline.
//!
//! Every winning NPC that is not skipped outright goes through, in order:
//!
//! 1. [`levels`]: fixed level from rules or the player-scaling band
//! 2. [`classes`]: class rebuilt from what the NPC actually uses
//! 3. [`equipment`]: weak/strong leveled lists and outfit by level
//! 4. [`skills`]: skill values from class weights and level
//! 5. [`perks`]: perk trees walked with a level-based budget
//! 6. [`followers`]: followers switched back to player scaling
//!
//! Steps that change nothing leave the NPC out of the patch.

pub mod classes;
pub mod equipment;
pub mod followers;
pub mod levels;
pub mod perks;
pub mod skills;

use crate::metrics::{CollectionProgress, Metrics};
use crate::models::{LeveledListSettings, Npc, NpcSettings, Record, RecordKind, RuleSet, Settings};
use crate::services::matching::{MatchMode, any_match};
use crate::services::roller::LevelRoller;
use crate::store::{Changeset, PatchError, PatchView, RecordStore, Resolver};
use levels::LevelAssigner;
use perks::PerkDistributor;

/// Keyword carried by the player record.
pub const PLAYER_KEYWORD: &str = "PlayerKeyword";

/// Outcome of one pipeline step on one NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Unchanged,
    Changed,
    /// The step could not run for this NPC (e.g. its class has no weights).
    Skipped,
}

impl StepResult {
    pub fn changed(self) -> bool {
        self == StepResult::Changed
    }
}

impl From<bool> for StepResult {
    fn from(changed: bool) -> Self {
        if changed {
            StepResult::Changed
        } else {
            StepResult::Unchanged
        }
    }
}

pub struct NpcLeveler<'a> {
    settings: &'a NpcSettings,
    suffixes: &'a LeveledListSettings,
    rules: &'a RuleSet,
    levels: LevelAssigner<'a>,
    perks: PerkDistributor<'a>,
}

impl<'a> NpcLeveler<'a> {
    pub fn new(settings: &'a Settings, rules: &'a RuleSet) -> Self {
        Self {
            settings: &settings.npcs,
            suffixes: &settings.leveled_lists,
            rules,
            levels: LevelAssigner::new(&settings.npcs, rules),
            perks: PerkDistributor::new(&settings.npcs, &rules.excluded_perks, &settings.general.base_game_plugins),
        }
    }

    pub fn run<S, R>(
        &self,
        store: &S,
        changeset: &mut Changeset,
        roller: &mut R,
        metrics: &Metrics,
        progress_interval: u64,
    ) -> Result<(), PatchError>
    where
        S: RecordStore + ?Sized,
        R: LevelRoller + ?Sized,
    {
        let mut progress = CollectionProgress::new("npcs", progress_interval);

        for (key, record) in store.winning(RecordKind::Npc) {
            let Record::Npc(npc) = record else {
                continue;
            };
            if self.is_skipped(npc) {
                progress.record(false);
                continue;
            }

            let mut copy = npc.clone();
            let changed = self.relevel(store, changeset, &mut copy, roller, metrics)?;
            if changed {
                changeset.set(key.clone(), Record::Npc(copy));
            }
            progress.record(changed);
        }
        progress.finish(metrics);

        if self.settings.disable_extra_damage_perks {
            let disabled = perks::disable_extra_damage_perks(store, changeset);
            tracing::info!("Disabled {} extra damage perks", disabled);
        }
        Ok(())
    }

    /// Players, preset faces, NPCs without an editor ID and excluded NPCs.
    pub fn is_skipped(&self, npc: &Npc) -> bool {
        let Some(editor_id) = npc.editor_id.as_deref() else {
            return true;
        };
        npc.is_chargen_face_preset
            || npc.has_keyword(PLAYER_KEYWORD)
            || any_match(&self.rules.excluded_npcs, editor_id, MatchMode::ContainsIgnoreCase)
    }

    /// Run every step on `npc`. Returns whether the NPC changed.
    pub fn relevel<S, R>(
        &self,
        store: &S,
        changeset: &mut Changeset,
        npc: &mut Npc,
        roller: &mut R,
        metrics: &Metrics,
    ) -> Result<bool, PatchError>
    where
        S: RecordStore + ?Sized,
        R: LevelRoller + ?Sized,
    {
        let mut changed = self.levels.assign(store, npc, roller);

        if self.settings.rebuild_classes {
            let rebuilt = classes::rebuild_class(&PatchView::new(store, changeset), npc);
            if let Some(class) = rebuilt {
                let class_key = changeset.add_new(Record::Class(class))?;
                metrics.record_created();
                npc.class = Some(class_key);
                changed = true;
            }
        }

        let steps = {
            let view = PatchView::new(store, changeset);
            [
                self.swap_equipment(&view, changeset, npc),
                skills::relevel_skills(&view, npc, self.settings),
                self.perks.distribute(store, &view, npc),
            ]
        };
        for step in steps {
            if step == StepResult::Skipped {
                metrics.record_step_skipped();
            }
            changed |= step.changed();
        }

        if self.settings.scaling_followers
            && followers::is_follower(store, npc, self.settings, &self.rules.followers)
        {
            changed |= followers::scale_follower(npc);
        }
        Ok(changed)
    }

    fn swap_equipment<R: Resolver + ?Sized>(&self, resolver: &R, changeset: &Changeset, npc: &mut Npc) -> StepResult {
        let tier = npc
            .static_level()
            .and_then(|level| equipment::equipment_tier(level, self.settings));
        match tier {
            Some(tier) => StepResult::from(equipment::swap_equipment(resolver, changeset, npc, tier, self.suffixes)),
            None => StepResult::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Class, ContainerEntry, FormKey, KeyRule, LeveledList, NpcLevel, Perk, Race, Skill, Weapon,
    };
    use crate::services::roller::MockLevelRoller;
    use crate::store::MemoryStore;
    use std::collections::BTreeMap;

    const MASTER: &str = "Skyrim.esm";

    fn key(id: u32) -> FormKey {
        FormKey::new(id, MASTER)
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new([MASTER]);
        let records = [
            (
                key(0x1),
                Record::Class(Class {
                    editor_id: Some("CombatWarrior1H".into()),
                    skill_weights: BTreeMap::from([(Skill::OneHanded, 2)]),
                    ..Default::default()
                }),
            ),
            (
                key(0x2),
                Record::Race(Race {
                    editor_id: Some("NordRace".into()),
                    keywords: vec!["ActorTypeNPC".into()],
                    ..Default::default()
                }),
            ),
            (
                key(0x10),
                Record::Weapon(Weapon {
                    skill: Some(Skill::OneHanded),
                    ..Default::default()
                }),
            ),
            (
                key(0x20),
                Record::LeveledItem(LeveledList {
                    editor_id: Some("LItemBanditWeapon".into()),
                    entries: Vec::new(),
                }),
            ),
            (
                key(0x30),
                Record::Perk(Perk {
                    editor_id: Some("crExtraDamageRaceVampire".into()),
                    effects: vec!["Damage".into()],
                    ..Default::default()
                }),
            ),
        ];
        for (key, record) in records {
            store.insert(MASTER, key, record).unwrap();
        }
        store
    }

    fn bandit() -> Npc {
        Npc {
            editor_id: Some("EncBandit01Melee1HNordM".into()),
            race: Some(key(0x2)),
            class: Some(key(0x1)),
            level: NpcLevel::Static { level: 10 },
            items: vec![
                ContainerEntry { item: key(0x10), count: 1 },
                ContainerEntry { item: key(0x20), count: 1 },
            ],
            skills: Some(BTreeMap::new()),
            ..Default::default()
        }
    }

    #[test]
    fn test_step_result_from_bool() {
        assert_eq!(StepResult::from(true), StepResult::Changed);
        assert_eq!(StepResult::from(false), StepResult::Unchanged);
        assert!(!StepResult::Skipped.changed());
    }

    #[test]
    fn test_skipped_npcs() {
        let settings = Settings::default();
        let rules = RuleSet {
            excluded_npcs: vec![KeyRule::new(["dummy"], Vec::<String>::new())],
            ..Default::default()
        };
        let leveler = NpcLeveler::new(&settings, &rules);

        assert!(!leveler.is_skipped(&bandit()));
        assert!(leveler.is_skipped(&Npc { editor_id: None, ..bandit() }));
        assert!(leveler.is_skipped(&Npc {
            is_chargen_face_preset: true,
            ..bandit()
        }));
        assert!(leveler.is_skipped(&Npc {
            keywords: vec![PLAYER_KEYWORD.into()],
            ..bandit()
        }));
        assert!(leveler.is_skipped(&Npc {
            editor_id: Some("CombatDummy".into()),
            ..bandit()
        }));
    }

    #[test]
    fn test_pipeline_rebuilds_class_swaps_and_distributes() {
        let store = store();
        let settings = Settings::default();
        let rules = RuleSet::default();
        let leveler = NpcLeveler::new(&settings, &rules);
        let metrics = Metrics::new();
        let mut roller = MockLevelRoller::new();
        roller.expect_roll().never();

        let mut changeset = Changeset::new("Unleveled.esp");
        let weak_list = changeset
            .add_new(Record::LeveledItem(LeveledList {
                editor_id: Some("LItemBanditWeapon_UNL_Weak".into()),
                entries: Vec::new(),
            }))
            .unwrap();

        let mut npc = bandit();
        assert!(leveler.relevel(&store, &mut changeset, &mut npc, &mut roller, &metrics).unwrap());

        let class_key = npc.class.clone().unwrap();
        assert_eq!(class_key.plugin, "Unleveled.esp");
        let Some(Record::Class(class)) = changeset.get(&class_key) else {
            panic!("rebuilt class missing");
        };
        assert_eq!(class.editor_id.as_deref(), Some("UNLClassEncBandit01Melee1HNordM"));
        assert_eq!(class.skill_weights[&Skill::Block], 1);

        assert_eq!(npc.items[1].item, weak_list);
        let skills = npc.skills.as_ref().unwrap();
        assert_eq!(skills[&Skill::OneHanded], 22);
        assert_eq!(skills[&Skill::Block], 22);
    }

    #[test]
    fn test_run_writes_changed_npcs_and_disables_extra_damage() {
        let mut store = store();
        store.insert(MASTER, key(0x100), Record::Npc(bandit())).unwrap();
        store
            .insert(
                MASTER,
                key(0x101),
                Record::Npc(Npc {
                    editor_id: Some("Player".into()),
                    keywords: vec![PLAYER_KEYWORD.into()],
                    ..Default::default()
                }),
            )
            .unwrap();

        let settings = Settings::default();
        let rules = RuleSet::default();
        let metrics = Metrics::new();
        let mut roller = MockLevelRoller::new();
        let mut changeset = Changeset::new("Unleveled.esp");
        NpcLeveler::new(&settings, &rules)
            .run(&store, &mut changeset, &mut roller, &metrics, 100)
            .unwrap();

        assert!(changeset.contains(&key(0x100)));
        assert!(!changeset.contains(&key(0x101)));
        let Some(Record::Perk(perk)) = changeset.get(&key(0x30)) else {
            panic!("extra damage perk not overridden");
        };
        assert!(perk.effects.is_empty());
    }
}
