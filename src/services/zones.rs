//! Encounter zone leveling.
//!
//! A zone is matched against the editor-ID rules first and then against the
//! keywords of its location; the first matching rule across both documents
//! decides the zone's new level band.

use crate::metrics::{CollectionProgress, Metrics};
use crate::models::{EncounterZone, FormKey, Record, RecordKind, RuleSet, ZoneRule, ZoneSettings};
use crate::services::game_settings;
use crate::services::matching::{MatchMode, first_match, first_match_any};
use crate::services::roller::LevelRoller;
use crate::store::{Changeset, PatchError, RecordStore, Resolver};

const SPAWN_LEVEL_SETTINGS: [&str; 4] = [
    "fLeveledActorMultEasy",
    "fLeveledActorMultMedium",
    "fLeveledActorMultHard",
    "fLeveledActorMultVeryHard",
];

pub struct ZoneLeveler<'a> {
    settings: &'a ZoneSettings,
    by_editor_id: &'a [ZoneRule],
    by_keyword: &'a [ZoneRule],
}

impl<'a> ZoneLeveler<'a> {
    pub fn new(settings: &'a ZoneSettings, rules: &'a RuleSet) -> Self {
        Self {
            settings,
            by_editor_id: &rules.zones_by_edid,
            by_keyword: &rules.zones_by_keyword,
        }
    }

    /// Relevel every winning encounter zone, then write the spawn level
    /// multipliers.
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
        let mut progress = CollectionProgress::new("encounter zones", progress_interval);

        for (key, record) in store.winning(RecordKind::EncounterZone) {
            let Record::EncounterZone(zone) = record else {
                continue;
            };
            if self.is_excluded(store, key) {
                tracing::debug!("Skipping zone {} from an excluded plugin", key);
                progress.record(false);
                continue;
            }

            let mut copy = zone.clone();
            let changed = match self.match_rule(store, zone) {
                Some(rule) => self.apply(&mut copy, rule, roller),
                None => false,
            };
            if changed {
                changeset.set(key.clone(), Record::EncounterZone(copy));
            }
            progress.record(changed);
        }
        progress.finish(metrics);

        if let Some(mults) = self.settings.spawn_level_mults {
            let values = [mults.easy, mults.medium, mults.hard, mults.very_hard];
            for (editor_id, value) in SPAWN_LEVEL_SETTINGS.into_iter().zip(values) {
                game_settings::set_float(store, changeset, editor_id, value)?;
            }
        }
        Ok(())
    }

    /// First editor-ID rule, else first rule matching a location keyword.
    pub fn match_rule<R: Resolver + ?Sized>(&self, resolver: &R, zone: &EncounterZone) -> Option<&'a ZoneRule> {
        let by_id = zone
            .editor_id
            .as_deref()
            .and_then(|id| first_match(self.by_editor_id, id, MatchMode::Contains));

        by_id.or_else(|| {
            let location = zone
                .location
                .as_ref()
                .and_then(|key| resolver.resolve_location(key))?;
            first_match_any(
                self.by_keyword,
                location.keywords.iter().map(String::as_str),
                MatchMode::Contains,
            )
        })
    }

    /// Apply `rule` to `zone`. Returns whether anything changed.
    pub fn apply<R: LevelRoller + ?Sized>(&self, zone: &mut EncounterZone, rule: &ZoneRule, roller: &mut R) -> bool {
        let before = zone.clone();

        zone.match_pc_below_minimum = false;
        if let Some(enable) = rule.enable_combat_boundary {
            zone.combat_boundary_disabled = !enable;
        }

        let (min, max) = (rule.min_level as i32, rule.max_level as i32);
        if self.settings.static_zone_levels {
            let level = roller.roll(min, max) as i16;
            zone.min_level = level;
            zone.max_level = level;
        } else {
            match rule.range {
                Some(range) => {
                    zone.min_level = roller.roll(min, max - range as i32) as i16;
                    zone.max_level = zone.min_level + range;
                }
                None => {
                    zone.min_level = roller.roll(min, max) as i16;
                    zone.max_level = 0;
                }
            }
        }

        *zone != before
    }

    fn is_excluded<S: RecordStore + ?Sized>(&self, store: &S, key: &FormKey) -> bool {
        if self.settings.excluded_plugins.is_empty() {
            return false;
        }
        store.defining_plugins(key).iter().any(|plugin| {
            self.settings
                .excluded_plugins
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(plugin))
        })
    }
}
