//! Property tests for the list, distribution, rescaling and zone algorithms.

use proptest::prelude::*;
use std::collections::BTreeMap;
use unleveler::models::{
    EncounterZone, FormKey, ItemSettings, KeyRule, LeveledEntry, LevelModifier, Skill, Weapon,
    ZoneRule, ZoneSettings,
};
use unleveler::services::baseline::{StatPair, WeaponStats};
use unleveler::services::leveled_lists::{cull_to_max_level, split_entries, split_threshold, unlevel};
use unleveler::services::npcs::skills::{SKILL_FLOOR, distribute_skills};
use unleveler::services::{BaselineTable, SeededRoller, StatRescaler, ZoneLeveler};
use unleveler::RuleSet;

fn entries(levels: Vec<i16>) -> Vec<LeveledEntry> {
    levels
        .into_iter()
        .enumerate()
        .map(|(id, level)| LeveledEntry::new(level, FormKey::new(id as u32 + 0x800, "Skyrim.esm")))
        .collect()
}

proptest! {
    #[test]
    fn property_unleveling_is_idempotent(levels in prop::collection::vec(1_i16..=81, 0..20)) {
        let mut list = entries(levels);
        unlevel(&mut list);
        prop_assert!(list.iter().all(|entry| entry.level == 1));

        let snapshot = list.clone();
        prop_assert!(!unlevel(&mut list));
        prop_assert_eq!(list, snapshot);
    }

    #[test]
    fn property_artifact_culling_keeps_only_top_level(levels in prop::collection::vec(1_i16..=81, 1..20)) {
        let top = *levels.iter().max().unwrap();
        let expected = levels.iter().filter(|level| **level == top).count();

        let mut list = entries(levels);
        cull_to_max_level(&mut list);
        prop_assert_eq!(list.len(), expected);
        prop_assert!(list.iter().all(|entry| entry.level == top));
    }

    #[test]
    fn property_split_is_a_partition(
        levels in prop::collection::vec(1_i16..=81, 1..20),
        ratio in 0.05_f32..0.95,
    ) {
        let min = *levels.iter().min().unwrap();
        let max = *levels.iter().max().unwrap();
        let mid = split_threshold(min, max, ratio);

        let list = entries(levels);
        let (weak, strong) = split_entries(&list, mid);
        prop_assert_eq!(weak.len() + strong.len(), list.len());
        prop_assert!(weak.iter().all(|entry| entry.level <= mid));
        prop_assert!(strong.iter().all(|entry| entry.level > mid));
    }

    #[test]
    fn property_skill_budget_never_exceeded(
        raw_weights in prop::collection::vec(0_u8..=5, 18),
        budget in 0_u32..600,
        max_skill in SKILL_FLOOR..=100,
    ) {
        prop_assume!(raw_weights.iter().any(|w| *w > 0));
        let weights: BTreeMap<Skill, u8> = Skill::ALL.iter().copied().zip(raw_weights).collect();

        let mut values = BTreeMap::new();
        prop_assert!(distribute_skills(&weights, &mut values, budget, max_skill).is_some());

        let spent: u32 = values.values().map(|value| u32::from(*value - SKILL_FLOOR)).sum();
        prop_assert!(spent <= budget);
        prop_assert!(values.values().all(|value| *value <= max_skill && *value >= SKILL_FLOOR));
    }

    #[test]
    fn property_rescale_identity(
        damage in 1_u16..200,
        half_weights in 1_u32..80,
        value in 1_u32..5000,
        quarter_speed in 1_u32..8,
    ) {
        let reference = WeaponStats::from_array([12.0, 14.0, 90.0, 1.0, 6.0, 1.0]);
        let mut table = BaselineTable::new();
        table.insert_weapon(
            "WeapMaterialSteel",
            "WeapTypeSword",
            StatPair { baseline: reference, target: reference },
        );
        let settings = ItemSettings::default();
        let rescaler = StatRescaler::new(&table, &settings);

        let mut weapon = Weapon {
            keywords: vec!["WeapMaterialSteel".into(), "WeapTypeSword".into()],
            damage,
            weight: half_weights as f32 / 2.0,
            value,
            speed: quarter_speed as f32 / 4.0,
            crit_damage: damage / 2,
            crit_mult: 1.0,
            ..Default::default()
        };
        let before = weapon.clone();
        prop_assert!(!rescaler.rescale_weapon(&mut weapon));
        prop_assert_eq!(weapon, before);
    }

    #[test]
    fn property_zone_band_respects_range(
        seed in any::<u64>(),
        min in 1_i16..40,
        width in 0_i16..40,
        range_share in 0.0_f32..=1.0,
    ) {
        let range = (width as f32 * range_share) as i16;
        let rule = ZoneRule {
            rule: KeyRule::new(["Zone"], Vec::<String>::new()),
            min_level: min,
            max_level: min + width,
            range: Some(range),
            enable_combat_boundary: None,
        };
        let settings = ZoneSettings::default();
        let rules = RuleSet::default();
        let leveler = ZoneLeveler::new(&settings, &rules);

        let mut zone = EncounterZone::default();
        leveler.apply(&mut zone, &rule, &mut SeededRoller::new(seed));
        prop_assert!(zone.min_level >= min);
        prop_assert!(zone.max_level <= min + width);
        prop_assert_eq!(zone.max_level - zone.min_level, range);
    }

    #[test]
    fn property_level_modifier_never_below_one(
        level in 1_i16..100,
        add in -50_i16..50,
        mult in 0.0_f32..3.0,
    ) {
        let modifier = LevelModifier { add, mult };
        prop_assert!(modifier.apply(level) >= 1);
    }
}
