//! Per-NPC class rebuilding from observed equipment and spells.
//!
//! Skills are tallied from everything the NPC carries (inventory, leveled
//! lists, outfit) and every spell it knows (including leveled spell lists).
//! Inventory and spell lists inherited through templates are followed into
//! leveled NPC lists, where each entry counts `1 / entry count`.
//!
//! Tallies become dense rank tiers (lowest distinct tally is 1, the next is
//! 2, ...). Hybrid combat/magic classes have their tiers scaled by the share
//! of the class's health/magicka/stamina weights behind each side.

use crate::models::{Armor, ArmorClass, Class, FormKey, Npc, Record, Skill, SpellType};
use crate::store::Resolver;
use std::collections::BTreeMap;

/// Editor ID prefix of generated classes.
pub const CLASS_PREFIX: &str = "UNLClass";

/// Class name fragments of merchants and crafters; unique NPCs with these
/// classes keep them.
pub const SERVICE_CLASS_WORDS: [&str; 5] = ["smith", "alchem", "enchant", "vendor", "apothec"];

const SHIELD_KEYWORD: &str = "ArmorShield";

pub type SkillTally = BTreeMap<Skill, f32>;

/// New class for `npc`, or `None` when it keeps its current one.
pub fn rebuild_class<R: Resolver + ?Sized>(resolver: &R, npc: &Npc) -> Option<Class> {
    if npc.inherits_stats() {
        return None;
    }
    let editor_id = npc.editor_id.as_deref()?;
    let class = npc.class.as_ref().and_then(|key| resolver.resolve_class(key))?;
    if npc.unique && is_service_class(class) {
        tracing::debug!("Keeping the service class of {}", editor_id);
        return None;
    }

    let mut tally: SkillTally = class.skill_weights.keys().map(|skill| (*skill, 0.0)).collect();
    tally_inventory(resolver, npc, &mut tally);
    tally_spells(resolver, npc, &mut tally);
    tally_outfit(resolver, npc, &mut tally);
    for value in tally.values_mut() {
        *value = value.ceil();
    }
    if tally.values().all(|value| *value == 0.0) {
        return None;
    }

    let weights = rank_weights(&tally, class);
    let mut rebuilt = class.clone();
    rebuilt.editor_id = Some(format!("{}{}", CLASS_PREFIX, editor_id));
    for weight in rebuilt.skill_weights.values_mut() {
        *weight = 0;
    }
    rebuilt.skill_weights.extend(weights);
    Some(rebuilt)
}

fn is_service_class(class: &Class) -> bool {
    [class.editor_id.as_deref(), class.name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .any(|name| SERVICE_CLASS_WORDS.iter().any(|word| name.contains(word)))
}

/// Dense rank tiers of the nonzero tallies, with the hybrid correction and
/// the melee block fallback applied.
pub fn rank_weights(tally: &SkillTally, class: &Class) -> BTreeMap<Skill, u8> {
    let mut distinct: Vec<f32> = tally.values().copied().filter(|v| *v > 0.0).collect();
    distinct.sort_by(f32::total_cmp);
    distinct.dedup();

    let mut weights: BTreeMap<Skill, f32> = tally
        .iter()
        .filter(|(_, value)| **value > 0.0)
        .map(|(skill, value)| {
            let rank = distinct.iter().position(|d| d == value).unwrap_or(0) + 1;
            (*skill, rank as f32)
        })
        .collect();

    let side_sum = |combat: bool| -> f32 {
        weights
            .iter()
            .filter(|(skill, _)| if combat { skill.is_combat() } else { skill.is_magic_school() })
            .map(|(_, weight)| weight)
            .sum()
    };
    let hybrid = side_sum(true) > 0.0 && side_sum(false) > 0.0;

    if hybrid {
        match hybrid_ratios(class) {
            Some((combat_ratio, magic_ratio)) => {
                for (skill, weight) in weights.iter_mut() {
                    if skill.is_combat() {
                        *weight = (*weight * combat_ratio).round();
                    } else if skill.is_magic_school() {
                        *weight = (*weight * magic_ratio).round();
                    }
                }
            }
            None => tracing::warn!("Class has no stat weights, skipping the hybrid correction"),
        }
    }

    let mut weights: BTreeMap<Skill, u8> = tally
        .keys()
        .map(|skill| (*skill, weights.get(skill).map_or(0, |w| *w as u8)))
        .collect();

    let melee = [Skill::OneHanded, Skill::TwoHanded]
        .iter()
        .any(|skill| weights.get(skill).is_some_and(|w| *w > 0));
    if !hybrid && melee && weights.get(&Skill::Block).copied().unwrap_or(0) == 0 {
        weights.insert(Skill::Block, 1);
    }
    weights
}

/// `(combat, magic)` shares of the class stat weights. Stamina counts
/// towards whichever of health and magicka is larger.
fn hybrid_ratios(class: &Class) -> Option<(f32, f32)> {
    let health = f32::from(class.stat_weights.health);
    let magicka = f32::from(class.stat_weights.magicka);
    let stamina = f32::from(class.stat_weights.stamina);

    let combat = if health > magicka { health + stamina } else { health };
    let magic = if magicka > health { magicka + stamina } else { magicka };
    let mut total = health + magicka + stamina;
    if health == magicka {
        total -= stamina;
    }
    (total > 0.0).then(|| (combat / total, magic / total))
}

/// Visit the NPC and every spawn it inherits `part` from, with the divisor
/// each contributes under. Leveled NPC lists spread over their entries.
fn walk_spawns<R, I, V>(resolver: &R, npc: &Npc, inherits: I, mut visit: V)
where
    R: Resolver + ?Sized,
    I: Fn(&Npc) -> bool,
    V: FnMut(&Npc, f32),
{
    let mut stack: Vec<(FormKey, f32, Vec<FormKey>)> = Vec::new();

    match (&npc.template, inherits(npc)) {
        (Some(template), true) => stack.push((template.clone(), 1.0, Vec::new())),
        _ => visit(npc, 1.0),
    }

    while let Some((key, divisor, ancestors)) = stack.pop() {
        if ancestors.contains(&key) {
            continue;
        }
        match resolver.resolve(&key) {
            Some(Record::LeveledNpc(list)) => {
                let divisor = list.entries.len() as f32;
                let path = descend(&ancestors, &key);
                stack.extend(list.entries.iter().map(|e| (e.reference.clone(), divisor, path.clone())));
            }
            Some(Record::Npc(spawn)) => match (&spawn.template, inherits(spawn)) {
                (Some(template), true) => stack.push((template.clone(), 1.0, descend(&ancestors, &key))),
                _ => visit(spawn, divisor),
            },
            _ => {}
        }
    }
}

/// Ancestor path for the children of `key`. A node already on its own path
/// closes a reference cycle; repeated siblings are still walked.
fn descend(ancestors: &[FormKey], key: &FormKey) -> Vec<FormKey> {
    let mut path = ancestors.to_vec();
    path.push(key.clone());
    path
}

/// Weapons and armor the NPC carries, directly or through leveled lists.
pub fn tally_inventory<R: Resolver + ?Sized>(resolver: &R, npc: &Npc, tally: &mut SkillTally) {
    walk_spawns(resolver, npc, Npc::inherits_inventory, |spawn, divisor| {
        for entry in &spawn.items {
            tally_item_tree(resolver, &entry.item, divisor, tally);
        }
    });
}

/// Combat spells the NPC knows, directly or through leveled spell lists.
pub fn tally_spells<R: Resolver + ?Sized>(resolver: &R, npc: &Npc, tally: &mut SkillTally) {
    walk_spawns(resolver, npc, Npc::inherits_spell_list, |spawn, divisor| {
        for spell in &spawn.spells {
            tally_spell_tree(resolver, spell, divisor, tally);
        }
    });
}

/// Armor and leveled lists in the NPC's default outfit.
pub fn tally_outfit<R: Resolver + ?Sized>(resolver: &R, npc: &Npc, tally: &mut SkillTally) {
    let Some(outfit) = npc.default_outfit.as_ref().and_then(|key| resolver.resolve_outfit(key)) else {
        return;
    };
    for item in &outfit.items {
        match resolver.resolve(item) {
            Some(Record::LeveledItem(_)) => tally_item_tree(resolver, item, 1.0, tally),
            Some(Record::Armor(armor)) => tally_armor(armor, 1.0, tally),
            _ => {}
        }
    }
}

fn tally_item_tree<R: Resolver + ?Sized>(resolver: &R, root: &FormKey, divisor: f32, tally: &mut SkillTally) {
    let mut stack = vec![(root.clone(), Vec::new())];
    while let Some((key, ancestors)) = stack.pop() {
        if ancestors.contains(&key) {
            continue;
        }
        match resolver.resolve(&key) {
            Some(Record::LeveledItem(list)) => {
                let path = descend(&ancestors, &key);
                stack.extend(list.entries.iter().map(|e| (e.reference.clone(), path.clone())));
            }
            Some(Record::Weapon(weapon)) => {
                if let Some(skill) = weapon.skill {
                    *tally.entry(skill).or_default() += 1.0 / divisor;
                }
            }
            Some(Record::Armor(armor)) => tally_armor(armor, divisor, tally),
            _ => {}
        }
    }
}

fn tally_armor(armor: &Armor, divisor: f32, tally: &mut SkillTally) {
    if armor.keywords.iter().any(|k| k == SHIELD_KEYWORD) {
        *tally.entry(Skill::Block).or_default() += 1.0 / divisor;
    }
    match armor.armor_class {
        ArmorClass::Heavy => *tally.entry(Skill::HeavyArmor).or_default() += 1.0 / divisor,
        ArmorClass::Light => *tally.entry(Skill::LightArmor).or_default() += 1.0 / divisor,
        ArmorClass::Clothing => {}
    }
}

fn tally_spell_tree<R: Resolver + ?Sized>(resolver: &R, root: &FormKey, divisor: f32, tally: &mut SkillTally) {
    let mut stack = vec![(root.clone(), Vec::new())];
    while let Some((key, ancestors)) = stack.pop() {
        if ancestors.contains(&key) {
            continue;
        }
        match resolver.resolve(&key) {
            Some(Record::LeveledSpell(list)) => {
                let path = descend(&ancestors, &key);
                stack.extend(list.entries.iter().map(|e| (e.reference.clone(), path.clone())));
            }
            Some(Record::Spell(spell)) if spell.spell_type == SpellType::Spell => {
                let school = spell
                    .effects
                    .iter()
                    .filter_map(|effect| resolver.resolve_magic_effect(effect))
                    .find_map(|effect| effect.magic_skill.filter(|skill| skill.is_magic_school()));
                if let Some(school) = school {
                    *tally.entry(school).or_default() += 1.0 / divisor;
                }
            }
            _ => {}
        }
    }
}
