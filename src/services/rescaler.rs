//! Baseline-relative weapon and armor rescaling.
//!
//! An item's stat is expressed as a ratio of the vanilla reference item of
//! the same material and type, and that ratio is reapplied to the target
//! stats: `new = target * value / baseline`. Relative differences between
//! items of one tier survive while the tier as a whole moves.
//!
//! Rounding: damage and critical damage round to the nearest integer; weights
//! and armor ratings round up to the next half (`ceil(2v) / 2`); prices are
//! truncated; speed and critical multiplier stay precise.

use crate::metrics::{CollectionProgress, Metrics};
use crate::models::{Armor, ItemSettings, Record, RecordKind, Weapon};
use crate::services::baseline::BaselineTable;
use crate::services::game_settings;
use crate::store::{Changeset, PatchError, RecordStore};

pub const ARTIFACT_KEYWORD: &str = "DaedricArtifact";
pub const UNIQUE_KEYWORD: &str = "MagicDisallowEnchanting";

const TEMPERING_SETTINGS: [&str; 2] = ["fSmithingArmorMax", "fSmithingWeaponMax"];
const TEMPERING_CAP: f32 = 6.0;

pub struct StatRescaler<'a> {
    table: &'a BaselineTable,
    settings: &'a ItemSettings,
}

impl<'a> StatRescaler<'a> {
    pub fn new(table: &'a BaselineTable, settings: &'a ItemSettings) -> Self {
        Self { table, settings }
    }

    /// Rescale every winning armor and weapon, then apply the tempering cap.
    pub fn run<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        changeset: &mut Changeset,
        metrics: &Metrics,
        progress_interval: u64,
    ) -> Result<(), PatchError> {
        for (kind, collection) in [(RecordKind::Armor, "armors"), (RecordKind::Weapon, "weapons")] {
            let mut progress = CollectionProgress::new(collection, progress_interval);
            for (key, record) in store.winning(kind) {
                let mut copy = record.clone();
                let changed = self.rescale(&mut copy);
                if changed {
                    changeset.set(key.clone(), copy);
                }
                progress.record(changed);
            }
            progress.finish(metrics);
        }

        if self.settings.tempering_debuff {
            for editor_id in TEMPERING_SETTINGS {
                game_settings::set_float(store, changeset, editor_id, TEMPERING_CAP)?;
            }
        }
        Ok(())
    }

    /// Rescale a weapon or armor in place. Other record kinds are ignored.
    pub fn rescale(&self, record: &mut Record) -> bool {
        match record {
            Record::Weapon(weapon) => self.rescale_weapon(weapon),
            Record::Armor(armor) => self.rescale_armor(armor),
            _ => false,
        }
    }

    pub fn rescale_weapon(&self, weapon: &mut Weapon) -> bool {
        if self.is_protected(&weapon.keywords) {
            return false;
        }
        let Some(pair) = self.table.for_weapon(&weapon.keywords) else {
            return false;
        };
        if pair.baseline.has_zero() {
            tracing::warn!(
                "Zero baseline stat for {}, leaving it unscaled",
                weapon.editor_id.as_deref().unwrap_or("<weapon>")
            );
            return false;
        }

        let (base, target) = (&pair.baseline, &pair.target);
        let before = weapon.clone();
        weapon.damage = scale(target.damage, weapon.damage as f64, base.damage).round() as u16;
        weapon.weight = round_to_half(scale(target.weight, weapon.weight as f64, base.weight)) as f32;
        weapon.value = scale(target.price, weapon.value as f64, base.price) as u32;
        weapon.speed = scale(target.speed, weapon.speed as f64, base.speed) as f32;
        weapon.crit_damage =
            scale(target.crit_damage, weapon.crit_damage as f64, base.crit_damage).round() as u16;
        weapon.crit_mult = scale(target.crit_mult, weapon.crit_mult as f64, base.crit_mult) as f32;

        *weapon != before
    }

    pub fn rescale_armor(&self, armor: &mut Armor) -> bool {
        if self.is_protected(&armor.keywords) {
            return false;
        }
        let Some(pair) = self.table.for_armor(&armor.keywords, armor.armor_class) else {
            return false;
        };
        if pair.baseline.has_zero() {
            tracing::warn!(
                "Zero baseline stat for {}, leaving it unscaled",
                armor.editor_id.as_deref().unwrap_or("<armor>")
            );
            return false;
        }

        let (base, target) = (&pair.baseline, &pair.target);
        let before = armor.clone();
        armor.armor_rating =
            round_to_half(scale(target.rating, armor.armor_rating as f64, base.rating)) as f32;
        armor.weight = round_to_half(scale(target.weight, armor.weight as f64, base.weight)) as f32;
        armor.value = scale(target.price, armor.value as f64, base.price) as u32;

        *armor != before
    }

    fn is_protected(&self, keywords: &[String]) -> bool {
        let has = |keyword: &str| keywords.iter().any(|k| k == keyword);
        (self.settings.skip_artifacts && has(ARTIFACT_KEYWORD))
            || (self.settings.skip_uniques && has(UNIQUE_KEYWORD))
    }
}

fn scale(target: f64, value: f64, baseline: f64) -> f64 {
    target * value / baseline
}

/// Round up to the next multiple of one half.
pub fn round_to_half(value: f64) -> f64 {
    (2.0 * value).ceil() / 2.0
}
