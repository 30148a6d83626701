//! Static level assignment.
//!
//! Priority: editor-ID rule, then faction rule, then the replacement level of
//! a player-scaling NPC, and finally the race modifier applied to an already
//! fixed level.

use crate::models::{LevelFormula, LevelModifier, Npc, NpcLevel, NpcSettings, RuleSet};
use crate::services::matching::{MatchMode, first_match, first_match_any};
use crate::services::roller::LevelRoller;
use crate::store::Resolver;

pub struct LevelAssigner<'a> {
    settings: &'a NpcSettings,
    rules: &'a RuleSet,
}

impl<'a> LevelAssigner<'a> {
    pub fn new(settings: &'a NpcSettings, rules: &'a RuleSet) -> Self {
        Self { settings, rules }
    }

    /// Race modifier of the NPC, `(0, 1.0)` when its race is unknown or
    /// unmatched.
    pub fn level_modifier<R: Resolver + ?Sized>(&self, resolver: &R, npc: &Npc) -> LevelModifier {
        npc.race
            .as_ref()
            .and_then(|race| resolver.editor_id_of(race))
            .and_then(|race| first_match(&self.rules.race_modifiers, race, MatchMode::Contains))
            .map(|rule| rule.modifier())
            .unwrap_or_default()
    }

    /// Give the NPC a fixed level. Returns whether the level changed.
    pub fn assign<R, L>(&self, resolver: &R, npc: &mut Npc, roller: &mut L) -> bool
    where
        R: Resolver + ?Sized,
        L: LevelRoller + ?Sized,
    {
        let modifier = self.level_modifier(resolver, npc);
        let before = npc.level;

        let level = match self.rule_level(resolver, npc, roller) {
            Some(level) => level,
            None => match npc.level {
                NpcLevel::PcMultiplier { mult } => self.replacement_level(npc, mult),
                NpcLevel::Static { level } => level,
            },
        };

        npc.level = NpcLevel::Static {
            level: modifier.apply(level),
        };
        npc.level != before
    }

    /// Unmodified level from the editor-ID or faction documents.
    fn rule_level<R, L>(&self, resolver: &R, npc: &Npc, roller: &mut L) -> Option<i16>
    where
        R: Resolver + ?Sized,
        L: LevelRoller + ?Sized,
    {
        if let Some(rule) = npc
            .editor_id
            .as_deref()
            .and_then(|id| first_match(&self.rules.npcs_by_edid, id, MatchMode::ContainsIgnoreCase))
        {
            return Some(rule.level);
        }

        let factions = npc
            .factions
            .iter()
            .filter_map(|faction| resolver.editor_id_of(faction));
        let rule = first_match_any(&self.rules.npcs_by_faction, factions, MatchMode::ContainsIgnoreCase)?;
        Some(match rule.level {
            Some(level) => level,
            None => {
                let min = rule.min_level.unwrap_or(1);
                let max = rule.max_level.unwrap_or(min);
                roller.roll(min as i32, max as i32) as i16
            }
        })
    }

    /// Fixed level replacing player scaling, before the race modifier.
    pub fn replacement_level(&self, npc: &Npc, mult: f32) -> i16 {
        let mult = if mult <= 0.0 { 1.0 } else { mult };
        let min = npc.calc_min_level.max(1) as f32;
        let max = if npc.calc_max_level <= 0 {
            if npc.unique {
                self.settings.unique_level_cap
            } else {
                self.settings.generic_level_cap
            }
        } else {
            npc.calc_max_level
        } as f32;

        let midpoint = (min + max) / 2.0;
        let level = match self.settings.level_formula {
            LevelFormula::Midpoint => (midpoint * mult).round(),
            LevelFormula::MidpointPlusMinimum => midpoint.round() + min * mult,
        };
        level as i16
    }
}
