//! Stat baseline table for item rescaling.
//!
//! A cell is keyed by material and weapon type, or by material, armor class
//! and slot. It pairs the stats the vanilla reference item has (`baseline`)
//! with the stats it should have (`target`). The table is seeded from
//! [`defaults`], refreshed once from the reference items found in the
//! configured plugins, and read-only afterwards.

pub mod defaults;

use crate::models::{Armor, ArmorClass, Record, RecordKind, Weapon};
use crate::store::RecordStore;
use defaults::{
    ARMOR_DERIVATIONS, ARMOR_SEEDS, ARMOR_SLOTS, REFERENCE_ARMORS, REFERENCE_WEAPONS,
    WEAPON_SEEDS,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub damage: f64,
    pub weight: f64,
    pub price: f64,
    pub speed: f64,
    pub crit_damage: f64,
    pub crit_mult: f64,
}

impl WeaponStats {
    /// `[damage, weight, price, speed, crit damage, crit mult]`
    pub const fn from_array(v: [f64; 6]) -> Self {
        Self {
            damage: v[0],
            weight: v[1],
            price: v[2],
            speed: v[3],
            crit_damage: v[4],
            crit_mult: v[5],
        }
    }

    pub fn of(weapon: &Weapon) -> Self {
        Self {
            damage: weapon.damage as f64,
            weight: weapon.weight as f64,
            price: weapon.value as f64,
            speed: weapon.speed as f64,
            crit_damage: weapon.crit_damage as f64,
            crit_mult: weapon.crit_mult as f64,
        }
    }

    pub fn has_zero(&self) -> bool {
        [
            self.damage,
            self.weight,
            self.price,
            self.speed,
            self.crit_damage,
            self.crit_mult,
        ]
        .contains(&0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmorStats {
    pub rating: f64,
    pub weight: f64,
    pub price: f64,
}

impl ArmorStats {
    /// `[rating, weight, price]`
    pub const fn from_array(v: [f64; 3]) -> Self {
        Self {
            rating: v[0],
            weight: v[1],
            price: v[2],
        }
    }

    pub fn of(armor: &Armor) -> Self {
        Self {
            rating: armor.armor_rating as f64,
            weight: armor.weight as f64,
            price: armor.value as f64,
        }
    }

    pub fn has_zero(&self) -> bool {
        self.rating == 0.0 || self.weight == 0.0 || self.price == 0.0
    }

    fn offset_by(self, delta: ArmorStats) -> Self {
        Self {
            rating: self.rating + delta.rating,
            weight: self.weight + delta.weight,
            price: self.price + delta.price,
        }
    }
}

/// Reference stats and the stats they should be moved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatPair<T> {
    pub baseline: T,
    pub target: T,
}

type WeaponCells = HashMap<String, StatPair<WeaponStats>>;
type ArmorCells = HashMap<(ArmorClass, String), StatPair<ArmorStats>>;

#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    weapons: HashMap<String, WeaponCells>,
    armors: HashMap<String, ArmorCells>,
}

impl BaselineTable {
    /// Empty table; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding only the built-in constants.
    pub fn seeded() -> Self {
        let mut table = Self::new();
        for (material, seeds) in WEAPON_SEEDS {
            for seed in seeds {
                table.insert_weapon(
                    material,
                    seed.weapon_type,
                    StatPair {
                        baseline: seed.baseline,
                        target: seed.target,
                    },
                );
            }
        }
        for (material, class, seeds) in ARMOR_SEEDS {
            for (slot, seed) in ARMOR_SLOTS.iter().zip(seeds) {
                table.insert_armor(
                    material,
                    class,
                    slot,
                    StatPair {
                        baseline: seed.baseline,
                        target: seed.target,
                    },
                );
            }
        }
        table
    }

    /// Seeded table with baselines replaced by the reference items as they
    /// appear in `plugins`.
    pub fn from_reference_items<S: RecordStore + ?Sized>(store: &S, plugins: &[String]) -> Self {
        let mut table = Self::seeded();
        let mut read = 0usize;

        for editor_id in REFERENCE_WEAPONS {
            let weapon = store
                .find_by_editor_id(RecordKind::Weapon, editor_id)
                .and_then(|(key, _)| store.resolve_in(key, plugins));
            match weapon {
                Some(Record::Weapon(weapon)) if table.read_reference_weapon(weapon) => read += 1,
                Some(_) => tracing::debug!("Reference weapon {} has no usable keywords", editor_id),
                None => tracing::debug!("Reference weapon {} not found in base plugins", editor_id),
            }
        }

        for editor_id in REFERENCE_ARMORS {
            let armor = store
                .find_by_editor_id(RecordKind::Armor, editor_id)
                .and_then(|(key, _)| store.resolve_in(key, plugins));
            match armor {
                Some(Record::Armor(armor)) if table.read_reference_armor(armor) => read += 1,
                Some(_) => tracing::debug!("Reference armor {} has no usable keywords", editor_id),
                None => tracing::debug!("Reference armor {} not found in base plugins", editor_id),
            }
        }

        tracing::info!(
            "Read baseline stats from {} of {} reference items",
            read,
            REFERENCE_WEAPONS.len() + REFERENCE_ARMORS.len()
        );
        table
    }

    pub fn insert_weapon(&mut self, material: &str, weapon_type: &str, pair: StatPair<WeaponStats>) {
        self.weapons
            .entry(material.to_string())
            .or_default()
            .insert(weapon_type.to_string(), pair);
    }

    pub fn insert_armor(
        &mut self,
        material: &str,
        class: ArmorClass,
        slot: &str,
        pair: StatPair<ArmorStats>,
    ) {
        self.armors
            .entry(material.to_string())
            .or_default()
            .insert((class, slot.to_string()), pair);
    }

    pub fn weapon(&self, material: &str, weapon_type: &str) -> Option<&StatPair<WeaponStats>> {
        self.weapons.get(material)?.get(weapon_type)
    }

    pub fn armor(&self, material: &str, class: ArmorClass, slot: &str) -> Option<&StatPair<ArmorStats>> {
        self.armors.get(material)?.get(&(class, slot.to_string()))
    }

    /// Cell for the first material keyword that has a type keyword match.
    pub fn for_weapon(&self, keywords: &[String]) -> Option<&StatPair<WeaponStats>> {
        keywords
            .iter()
            .filter_map(|material| self.weapons.get(material))
            .find_map(|cells| keywords.iter().find_map(|ty| cells.get(ty)))
    }

    /// Cell for the first material keyword that has a slot keyword match for
    /// `class`. Clothing never matches.
    pub fn for_armor(&self, keywords: &[String], class: ArmorClass) -> Option<&StatPair<ArmorStats>> {
        if class == ArmorClass::Clothing {
            return None;
        }
        keywords
            .iter()
            .filter_map(|material| self.armors.get(material))
            .find_map(|cells| {
                keywords
                    .iter()
                    .find_map(|slot| cells.get(&(class, slot.clone())))
            })
    }

    fn read_reference_weapon(&mut self, weapon: &Weapon) -> bool {
        let Some((material, weapon_type)) = weapon
            .keywords
            .iter()
            .find(|k| self.weapons.contains_key(*k))
            .and_then(|material| {
                let cells = self.weapons.get(material)?;
                let ty = weapon.keywords.iter().find(|k| cells.contains_key(*k))?;
                Some((material.clone(), ty.clone()))
            })
        else {
            return false;
        };

        let Some(cell) = self
            .weapons
            .get_mut(&material)
            .and_then(|cells| cells.get_mut(&weapon_type))
        else {
            return false;
        };
        cell.baseline = WeaponStats::of(weapon);
        true
    }

    fn read_reference_armor(&mut self, armor: &Armor) -> bool {
        if armor.armor_class == ArmorClass::Clothing {
            return false;
        }
        let Some(material) = armor
            .keywords
            .iter()
            .find(|k| self.armors.contains_key(*k))
            .cloned()
        else {
            return false;
        };
        let Some((slot_index, slot)) = ARMOR_SLOTS
            .iter()
            .enumerate()
            .find(|(_, slot)| armor.keywords.iter().any(|k| k == *slot))
        else {
            return false;
        };

        let stats = ArmorStats::of(armor);
        self.set_armor_baseline(&material, armor.armor_class, slot, stats);
        for derivation in ARMOR_DERIVATIONS.iter().filter(|d| d.source == material) {
            self.set_armor_baseline(
                derivation.target,
                derivation.class,
                slot,
                stats.offset_by(derivation.offsets[slot_index]),
            );
        }
        true
    }

    fn set_armor_baseline(&mut self, material: &str, class: ArmorClass, slot: &str, stats: ArmorStats) {
        if let Some(cell) = self
            .armors
            .get_mut(material)
            .and_then(|cells| cells.get_mut(&(class, slot.to_string())))
        {
            cell.baseline = stats;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormKey;
    use crate::store::MemoryStore;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_seeded_table_covers_every_combination() {
        let table = BaselineTable::seeded();
        for material in defaults::WEAPON_MATERIALS {
            for ty in defaults::WEAPON_TYPES {
                assert!(table.weapon(material, ty).is_some(), "{material} {ty}");
            }
        }
        for material in defaults::ARMOR_MATERIALS {
            for class in [ArmorClass::Heavy, ArmorClass::Light] {
                for slot in ARMOR_SLOTS {
                    assert!(table.armor(material, class, slot).is_some(), "{material} {slot}");
                }
            }
        }

        let glass = table
            .armor("ArmorMaterialGlass", ArmorClass::Light, "ArmorCuirass")
            .unwrap();
        assert_eq!(glass.baseline, ArmorStats::from_array([38.0, 7.0, 900.0]));
        assert_eq!(glass.target, ArmorStats::from_array([45.0, 9.0, 1800.0]));
    }

    #[test]
    fn test_lookup_uses_first_material_with_a_type_match() {
        let table = BaselineTable::seeded();
        let kws = keywords(&["VendorItemWeapon", "WeapMaterialEbony", "WeapTypeSword"]);
        let cell = table.for_weapon(&kws).unwrap();
        assert_eq!(cell.baseline.damage, 13.0);

        assert!(table.for_weapon(&keywords(&["WeapMaterialIron", "WeapTypeSword"])).is_none());
        assert!(
            table
                .for_armor(&keywords(&["ArmorMaterialGlass", "ArmorCuirass"]), ArmorClass::Clothing)
                .is_none()
        );
    }

    #[test]
    fn test_reference_items_replace_baselines_and_derive_siblings() {
        let mut store = MemoryStore::new(["Skyrim.esm", "Mod.esp"]);
        store
            .insert(
                "Skyrim.esm",
                FormKey::new(0x10, "Skyrim.esm"),
                Record::Armor(Armor {
                    editor_id: Some("ArmorEbonyCuirass".into()),
                    keywords: keywords(&["ArmorMaterialEbony", "ArmorCuirass"]),
                    armor_class: ArmorClass::Heavy,
                    armor_rating: 44.0,
                    weight: 38.0,
                    value: 1500,
                    ..Default::default()
                }),
            )
            .unwrap();
        store
            .insert(
                "Mod.esp",
                FormKey::new(0x10, "Skyrim.esm"),
                Record::Armor(Armor {
                    editor_id: Some("ArmorEbonyCuirass".into()),
                    keywords: keywords(&["ArmorMaterialEbony", "ArmorCuirass"]),
                    armor_class: ArmorClass::Heavy,
                    armor_rating: 99.0,
                    weight: 1.0,
                    value: 1,
                    ..Default::default()
                }),
            )
            .unwrap();

        let table = BaselineTable::from_reference_items(&store, &["Skyrim.esm".to_string()]);
        let ebony = table
            .armor("ArmorMaterialEbony", ArmorClass::Heavy, "ArmorCuirass")
            .unwrap();
        assert_eq!(ebony.baseline, ArmorStats::from_array([44.0, 38.0, 1500.0]));

        let glass = table
            .armor("ArmorMaterialGlass", ArmorClass::Heavy, "ArmorCuirass")
            .unwrap();
        assert_eq!(glass.baseline, ArmorStats::from_array([42.0, 28.0, 1500.0]));
        assert_eq!(glass.target, ArmorStats::from_array([49.0, 31.0, 2750.0]));
    }

    #[test]
    fn test_reference_weapon_read() {
        let mut store = MemoryStore::new(["Skyrim.esm"]);
        store
            .insert(
                "Skyrim.esm",
                FormKey::new(0x20, "Skyrim.esm"),
                Record::Weapon(Weapon {
                    editor_id: Some("GlassSword".into()),
                    keywords: keywords(&["WeapTypeSword", "WeapMaterialGlass"]),
                    damage: 12,
                    weight: 14.0,
                    value: 410,
                    speed: 1.0,
                    crit_damage: 6,
                    crit_mult: 1.0,
                    ..Default::default()
                }),
            )
            .unwrap();

        let table = BaselineTable::from_reference_items(&store, &["Skyrim.esm".to_string()]);
        let cell = table.weapon("WeapMaterialGlass", "WeapTypeSword").unwrap();
        assert_eq!(cell.baseline.damage, 12.0);
        assert_eq!(cell.baseline.price, 410.0);
    }
}
