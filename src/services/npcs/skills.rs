//! Skill point distribution.
//!
//! Every class skill starts at [`SKILL_FLOOR`]. The budget is shared out in
//! proportion to the class weights; a skill pushed past the maximum is
//! clamped and dropped, and its excess is shared out again among the skills
//! still in play. This repeats until nothing overflows or no weight is left.

use super::StepResult;
use crate::models::{Npc, NpcSettings, Skill};
use crate::store::Resolver;
use std::collections::BTreeMap;

pub const SKILL_FLOOR: u8 = 15;

/// Distribute `budget` points over `weights`, writing the results into
/// `values`. Returns `None` when the weights sum to zero.
pub fn distribute_skills(
    weights: &BTreeMap<Skill, u8>,
    values: &mut BTreeMap<Skill, u8>,
    budget: u32,
    max_skill: u8,
) -> Option<()> {
    let mut remaining: Vec<(Skill, u64)> = weights
        .iter()
        .map(|(skill, weight)| (*skill, u64::from(*weight)))
        .collect();
    if remaining.iter().all(|(_, weight)| *weight == 0) {
        return None;
    }

    let max_skill = u64::from(max_skill);
    let mut totals: BTreeMap<Skill, u64> = remaining
        .iter()
        .map(|(skill, _)| (*skill, u64::from(SKILL_FLOOR).min(max_skill)))
        .collect();

    let mut points = u64::from(budget);
    loop {
        let weight_sum: u64 = remaining.iter().map(|(_, weight)| weight).sum();
        if points == 0 || weight_sum == 0 {
            break;
        }

        let mut overflow = 0;
        remaining.retain(|(skill, weight)| {
            let total = totals.entry(*skill).or_default();
            *total += points * weight / weight_sum;
            if *total > max_skill {
                overflow += *total - max_skill;
                *total = max_skill;
                false
            } else {
                true
            }
        });
        points = overflow;
    }

    for (skill, total) in totals {
        values.insert(skill, total as u8);
    }
    Some(())
}

/// Redistribute the NPC's skills from its class weights and level.
///
/// NPCs that inherit stats, have no skill block or still scale with the
/// player are left alone.
pub fn relevel_skills<R: Resolver + ?Sized>(resolver: &R, npc: &mut Npc, settings: &NpcSettings) -> StepResult {
    if settings.skills_per_level <= 0.0 || npc.inherits_stats() {
        return StepResult::Unchanged;
    }
    let Some(level) = npc.static_level() else {
        return StepResult::Unchanged;
    };
    let Some(class) = npc.class.as_ref().and_then(|key| resolver.resolve_class(key)) else {
        return StepResult::Unchanged;
    };
    let Some(skills) = npc.skills.as_mut() else {
        return StepResult::Unchanged;
    };

    let budget = (settings.skills_per_level * level as f32).round().max(0.0) as u32;
    let before = skills.clone();
    match distribute_skills(&class.skill_weights, skills, budget, settings.max_skill_level) {
        Some(()) => StepResult::from(*skills != before),
        None => {
            tracing::warn!(
                "Class of {} has no skill weights, skipping skill distribution",
                npc.editor_id.as_deref().unwrap_or("<npc>")
            );
            StepResult::Skipped
        }
    }
}
