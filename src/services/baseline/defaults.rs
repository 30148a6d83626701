//! Seed values for the stat baseline table.
//!
//! Every cell holds the stats of the vanilla reference item (`baseline`) and
//! the rebalanced stats that item should end up with (`target`). Baselines are
//! refreshed from the reference items at startup; targets are fixed.

use super::{ArmorStats, WeaponStats};
use crate::models::ArmorClass;

pub const WEAPON_MATERIALS: [&str; 5] = [
    "DLC1WeapMaterialDragonbone",
    "WeapMaterialDaedric",
    "WeapMaterialEbony",
    "DLC2WeaponMaterialStalhrim",
    "WeapMaterialGlass",
];

pub const WEAPON_TYPES: [&str; 8] = [
    "WeapTypeBattleaxe",
    "WeapTypeBow",
    "WeapTypeDagger",
    "WeapTypeGreatsword",
    "WeapTypeMace",
    "WeapTypeSword",
    "WeapTypeWarAxe",
    "WeapTypeWarhammer",
];

pub const ARMOR_MATERIALS: [&str; 8] = [
    "ArmorMaterialDaedric",
    "ArmorMaterialDragonplate",
    "ArmorMaterialDragonscale",
    "ArmorMaterialEbony",
    "ArmorMaterialGlass",
    "ArmorNightingale",
    "DLC2ArmorMaterialStalhrimHeavy",
    "DLC2ArmorMaterialStalhrimLight",
];

/// Armor slot keywords. Per-slot arrays below follow this order.
pub const ARMOR_SLOTS: [&str; 5] = [
    "ArmorBoots",
    "ArmorCuirass",
    "ArmorGauntlets",
    "ArmorHelmet",
    "ArmorShield",
];

/// Weapons whose stats replace the seeded baselines.
pub const REFERENCE_WEAPONS: [&str; 40] = [
    "GlassBattleaxe",
    "GlassBow",
    "GlassDagger",
    "GlassGreatsword",
    "GlassMace",
    "GlassSword",
    "GlassWarAxe",
    "GlassWarhammer",
    "EbonyBattleaxe",
    "EbonyBow",
    "EbonyDagger",
    "EbonyGreatsword",
    "EbonyMace",
    "EbonySword",
    "EbonyWarAxe",
    "EbonyWarhammer",
    "DaedricBattleaxe",
    "DaedricBow",
    "DaedricDagger",
    "DaedricGreatsword",
    "DaedricMace",
    "DaedricSword",
    "DaedricWarAxe",
    "DaedricWarhammer",
    "DLC1DragonboneBattleaxe",
    "DLC1DragonboneBow",
    "DLC1DragonboneDagger",
    "DLC1DragonboneGreatsword",
    "DLC1DragonboneMace",
    "DLC1DragonboneSword",
    "DLC1DragonboneWarAxe",
    "DLC1DragonboneWarhammer",
    "DLC2StalhrimBattleaxe",
    "DLC2StalhrimBow",
    "DLC2StalhrimDagger",
    "DLC2StalhrimGreatsword",
    "DLC2StalhrimMace",
    "DLC2StalhrimSword",
    "DLC2StalhrimWarAxe",
    "DLC2StalhrimWarhammer",
];

/// Armors whose stats replace the seeded baselines.
pub const REFERENCE_ARMORS: [&str; 38] = [
    "ArmorDaedricBoots",
    "ArmorDaedricCuirass",
    "ArmorDaedricGauntlets",
    "ArmorDaedricHelmet",
    "ArmorDaedricShield",
    "ArmorDragonplateBoots",
    "ArmorDragonplateCuirass",
    "ArmorDragonplateGauntlets",
    "ArmorDragonplateHelmet",
    "ArmorDragonplateShield",
    "ArmorDragonscaleBoots",
    "ArmorDragonscaleCuirass",
    "ArmorDragonscaleGauntlets",
    "ArmorDragonscaleHelmet",
    "ArmorDragonscaleShield",
    "ArmorEbonyBoots",
    "ArmorEbonyCuirass",
    "ArmorEbonyGauntlets",
    "ArmorEbonyHelmet",
    "ArmorEbonyShield",
    "ArmorGlassBoots",
    "ArmorGlassCuirass",
    "ArmorGlassGauntlets",
    "ArmorGlassHelmet",
    "ArmorGlassShield",
    "ArmorNightingaleBootsPlayer03",
    "ArmorNightingaleCuirassPlayer03",
    "ArmorNightingaleGauntletsPlayer03",
    "ArmorNightingaleHelmetPlayer03",
    "DLC2ArmorStalhrimHeavyBoots",
    "DLC2ArmorStalhrimHeavyCuirass",
    "DLC2ArmorStalhrimHeavyGauntlets",
    "DLC2ArmorStalhrimHeavyHelmet",
    "DLC2ArmorStalhrimLightBoots",
    "DLC2ArmorStalhrimLightCuirass",
    "DLC2ArmorStalhrimLightGauntlets",
    "DLC2ArmorStalhrimLightHelmet",
    "DLC2ArmorStalhrimShield",
];

#[derive(Debug, Clone, Copy)]
pub struct WeaponSeed {
    pub weapon_type: &'static str,
    pub baseline: WeaponStats,
    pub target: WeaponStats,
}

#[derive(Debug, Clone, Copy)]
pub struct ArmorSeed {
    pub baseline: ArmorStats,
    pub target: ArmorStats,
}

/// Fills a sibling cell from a freshly read reference armor.
#[derive(Debug, Clone, Copy)]
pub struct ArmorDerivation {
    pub source: &'static str,
    pub target: &'static str,
    pub class: ArmorClass,
    /// Added to the reference stats, in [`ARMOR_SLOTS`] order.
    pub offsets: [ArmorStats; 5],
}

const fn weapon(weapon_type: &'static str, baseline: [f64; 6], target: [f64; 6]) -> WeaponSeed {
    WeaponSeed {
        weapon_type,
        baseline: WeaponStats::from_array(baseline),
        target: WeaponStats::from_array(target),
    }
}

const fn armor(baseline: [f64; 3], target: [f64; 3]) -> ArmorSeed {
    ArmorSeed {
        baseline: ArmorStats::from_array(baseline),
        target: ArmorStats::from_array(target),
    }
}

const fn offset(rating: f64, weight: f64, price: f64) -> ArmorStats {
    ArmorStats::from_array([rating, weight, price])
}

// damage, weight, price, speed, crit damage, crit mult
pub const WEAPON_SEEDS: [(&str, [WeaponSeed; 8]); 5] = [
    (
        "WeapMaterialDaedric",
        [
            weapon("WeapTypeBattleaxe", [25.0, 27.0, 2750.0, 0.7, 12.0, 1.0], [32.0, 26.0, 4320.0, 0.7, 16.0, 1.0]),
            weapon("WeapTypeBow", [19.0, 18.0, 2500.0, 0.5, 9.0, 1.0], [25.0, 16.0, 3150.0, 0.5625, 13.0, 1.0]),
            weapon("WeapTypeDagger", [11.0, 6.0, 500.0, 1.3, 5.0, 1.0], [16.0, 5.0, 1650.0, 1.43, 8.0, 1.0]),
            weapon("WeapTypeGreatsword", [24.0, 23.0, 2500.0, 0.75, 12.0, 1.0], [31.0, 22.0, 3600.0, 0.8, 15.0, 1.0]),
            weapon("WeapTypeMace", [16.0, 20.0, 1750.0, 0.8, 8.0, 1.0], [22.0, 19.0, 3450.0, 0.8, 11.0, 1.0]),
            weapon("WeapTypeSword", [14.0, 16.0, 1250.0, 1.0, 7.0, 1.0], [20.0, 15.0, 2460.0, 1.0, 10.0, 1.0]),
            weapon("WeapTypeWarAxe", [15.0, 18.0, 1500.0, 0.9, 7.0, 1.0], [21.0, 17.0, 2940.0, 0.9, 11.0, 1.0]),
            weapon("WeapTypeWarhammer", [27.0, 31.0, 4000.0, 0.6, 13.0, 1.0], [34.0, 30.0, 5190.0, 0.6, 17.0, 1.0]),
        ],
    ),
    (
        "WeapMaterialEbony",
        [
            weapon("WeapTypeBattleaxe", [23.0, 26.0, 1585.0, 0.7, 11.0, 1.0], [30.0, 27.0, 2880.0, 0.7, 15.0, 1.0]),
            weapon("WeapTypeBow", [17.0, 16.0, 1440.0, 0.5625, 8.0, 1.0], [23.0, 16.0, 2100.0, 0.5625, 12.0, 1.0]),
            weapon("WeapTypeDagger", [10.0, 5.0, 290.0, 1.3, 5.0, 1.0], [15.0, 5.0, 1100.0, 1.3, 7.0, 1.0]),
            weapon("WeapTypeGreatsword", [22.0, 22.0, 1440.0, 0.75, 11.0, 1.0], [29.0, 22.0, 2400.0, 0.8, 14.0, 1.0]),
            weapon("WeapTypeMace", [15.0, 19.0, 1000.0, 0.8, 8.0, 1.0], [20.0, 19.0, 2300.0, 0.8, 10.0, 1.0]),
            weapon("WeapTypeSword", [13.0, 15.0, 720.0, 1.0, 6.0, 1.0], [18.0, 15.0, 1640.0, 1.0, 9.0, 1.0]),
            weapon("WeapTypeWarAxe", [14.0, 17.0, 865.0, 0.9, 7.0, 1.0], [19.0, 17.0, 1960.0, 0.9, 10.0, 1.0]),
            weapon("WeapTypeWarhammer", [25.0, 30.0, 1725.0, 0.6, 12.0, 1.0], [32.0, 32.0, 3460.0, 0.6, 16.0, 1.0]),
        ],
    ),
    (
        "WeapMaterialGlass",
        [
            weapon("WeapTypeBattleaxe", [22.0, 25.0, 900.0, 0.7, 11.0, 1.0], [27.0, 18.0, 1440.0, 0.77, 14.0, 1.0]),
            weapon("WeapTypeBow", [15.0, 14.0, 820.0, 0.625, 7.0, 1.0], [19.0, 8.5, 1050.0, 0.87505, 10.0, 1.0]),
            weapon("WeapTypeDagger", [9.0, 4.5, 165.0, 1.3, 4.0, 1.0], [13.0, 1.7, 550.0, 1.43, 7.0, 1.0]),
            weapon("WeapTypeGreatsword", [21.0, 22.0, 820.0, 0.75, 10.0, 1.0], [26.0, 14.0, 1200.0, 0.88, 13.0, 1.0]),
            weapon("WeapTypeMace", [14.0, 18.0, 575.0, 0.8, 7.0, 1.0], [18.0, 12.0, 1150.0, 0.88, 9.0, 1.0]),
            weapon("WeapTypeSword", [12.0, 14.0, 410.0, 1.0, 6.0, 1.0], [16.0, 7.5, 820.0, 1.1, 8.0, 1.0]),
            weapon("WeapTypeWarAxe", [13.0, 16.0, 490.0, 0.9, 6.0, 1.0], [17.0, 9.5, 980.0, 0.99, 9.0, 1.0]),
            weapon("WeapTypeWarhammer", [24.0, 29.0, 985.0, 0.6, 12.0, 1.0], [29.0, 22.0, 1730.0, 0.77, 14.0, 1.0]),
        ],
    ),
    (
        "DLC1WeapMaterialDragonbone",
        [
            weapon("WeapTypeBattleaxe", [26.0, 30.0, 3000.0, 0.7, 13.0, 1.0], [32.0, 30.0, 3600.0, 0.63, 16.0, 1.0]),
            weapon("WeapTypeBow", [20.0, 20.0, 2725.0, 0.75, 10.0, 1.0], [25.0, 20.0, 2625.0, 0.48, 13.0, 1.0]),
            weapon("WeapTypeDagger", [12.0, 6.5, 600.0, 1.3, 6.0, 1.0], [16.0, 6.5, 1375.0, 1.17, 8.0, 1.0]),
            weapon("WeapTypeGreatsword", [25.0, 27.0, 2725.0, 0.75, 12.0, 1.0], [31.0, 27.0, 3000.0, 0.72, 15.0, 1.0]),
            weapon("WeapTypeMace", [17.0, 22.0, 2000.0, 0.8, 8.0, 1.0], [22.0, 22.0, 2875.0, 0.72, 11.0, 1.0]),
            weapon("WeapTypeSword", [15.0, 19.0, 1500.0, 1.0, 7.0, 1.0], [20.0, 19.0, 2050.0, 0.9, 10.0, 1.0]),
            weapon("WeapTypeWarAxe", [16.0, 21.0, 1700.0, 0.9, 8.0, 1.0], [21.0, 21.0, 2450.0, 0.81, 11.0, 1.0]),
            weapon("WeapTypeWarhammer", [28.0, 33.0, 4275.0, 0.6, 14.0, 1.0], [34.0, 33.0, 4325.0, 0.54, 17.0, 1.0]),
        ],
    ),
    (
        "DLC2WeaponMaterialStalhrim",
        [
            weapon("WeapTypeBattleaxe", [24.0, 25.0, 2150.0, 0.7, 12.0, 1.0], [29.0, 20.0, 2520.0, 0.77, 15.0, 1.0]),
            weapon("WeapTypeBow", [17.0, 15.0, 1800.0, 0.5625, 8.0, 1.0], [22.0, 12.0, 1850.0, 0.87505, 11.0, 1.0]),
            weapon("WeapTypeDagger", [10.0, 4.5, 395.0, 1.3, 5.0, 1.0], [14.0, 2.5, 965.0, 1.43, 7.0, 1.0]),
            weapon("WeapTypeGreatsword", [23.0, 21.0, 1970.0, 0.75, 11.0, 1.0], [28.0, 17.0, 2100.0, 0.88, 14.0, 1.0]),
            weapon("WeapTypeMace", [16.0, 18.0, 1375.0, 0.8, 8.0, 1.0], [19.0, 13.0, 2015.0, 0.88, 9.0, 1.0]),
            weapon("WeapTypeSword", [13.0, 14.0, 985.0, 1.0, 6.0, 1.0], [17.0, 7.5, 1435.0, 1.1, 8.0, 1.0]),
            weapon("WeapTypeWarAxe", [15.0, 16.0, 1180.0, 0.9, 7.0, 1.0], [18.0, 9.0, 1715.0, 0.99, 9.0, 1.0]),
            weapon("WeapTypeWarhammer", [26.0, 29.0, 2850.0, 0.6, 13.0, 1.0], [31.0, 22.0, 3030.0, 0.77, 15.0, 1.0]),
        ],
    ),
];

// rating, weight, price; slots in ARMOR_SLOTS order
const DAEDRIC_HEAVY: [ArmorSeed; 5] = [
    armor([18.0, 10.0, 625.0], [23.0, 9.0, 1250.0]),
    armor([49.0, 50.0, 3200.0], [57.0, 41.0, 4500.0]),
    armor([18.0, 6.0, 625.0], [23.0, 7.0, 1250.0]),
    armor([23.0, 15.0, 1600.0], [28.0, 10.0, 1800.0]),
    armor([36.0, 15.0, 1600.0], [39.0, 13.0, 1875.0]),
];

const DAEDRIC_LIGHT: [ArmorSeed; 5] = [
    armor([13.0, 3.0, 450.0], [16.0, 5.0, 1850.0]),
    armor([44.0, 8.0, 1800.0], [50.0, 12.0, 3100.0]),
    armor([13.0, 2.0, 450.0], [16.0, 4.0, 1550.0]),
    armor([18.0, 4.0, 950.0], [21.0, 4.5, 1350.0]),
    armor([31.0, 6.0, 950.0], [32.0, 6.5, 1950.0]),
];

const DRAGON_HEAVY: [ArmorSeed; 5] = [
    armor([17.0, 8.0, 425.0], [22.0, 11.0, 990.0]),
    armor([46.0, 40.0, 2125.0], [55.0, 45.0, 3600.0]),
    armor([17.0, 8.0, 425.0], [22.0, 8.0, 990.0]),
    armor([22.0, 8.0, 1050.0], [27.0, 12.0, 1450.0]),
    armor([34.0, 15.0, 1050.0], [38.0, 15.0, 1500.0]),
];

const DRAGON_LIGHT: [ArmorSeed; 5] = [
    armor([12.0, 3.0, 300.0], [15.0, 6.0, 1350.0]),
    armor([41.0, 10.0, 1500.0], [48.0, 15.0, 2700.0]),
    armor([12.0, 3.0, 300.0], [15.0, 5.0, 1050.0]),
    armor([17.0, 4.0, 750.0], [20.0, 5.5, 1050.0]),
    armor([29.0, 6.0, 750.0], [31.0, 7.5, 1650.0]),
];

const EBONY_HEAVY: [ArmorSeed; 5] = [
    armor([16.0, 7.0, 275.0], [20.0, 9.0, 825.0]),
    armor([43.0, 38.0, 1500.0], [51.0, 41.0, 3000.0]),
    armor([16.0, 7.0, 275.0], [20.0, 7.0, 825.0]),
    armor([21.0, 10.0, 750.0], [25.0, 10.0, 1200.0]),
    armor([32.0, 14.0, 750.0], [36.0, 13.0, 1250.0]),
];

const EBONY_LIGHT: [ArmorSeed; 5] = [
    armor([12.0, 3.0, 190.0], [14.0, 5.5, 1000.0]),
    armor([40.0, 9.0, 900.0], [45.0, 12.0, 2000.0]),
    armor([12.0, 3.0, 190.0], [14.0, 4.5, 850.0]),
    armor([17.0, 4.0, 450.0], [19.0, 4.5, 850.0]),
    armor([28.0, 6.0, 450.0], [28.0, 7.0, 1350.0]),
];

const GLASS_HEAVY: [ArmorSeed; 5] = [
    armor([15.0, 6.0, 275.0], [19.0, 8.0, 800.0]),
    armor([41.0, 28.0, 1500.0], [49.0, 31.0, 2750.0]),
    armor([15.0, 5.0, 275.0], [24.0, 5.0, 800.0]),
    armor([20.0, 9.0, 750.0], [29.0, 9.0, 1050.0]),
    armor([31.0, 12.0, 750.0], [40.0, 11.0, 1050.0]),
];

const GLASS_LIGHT: [ArmorSeed; 5] = [
    armor([11.0, 2.0, 190.0], [14.0, 4.5, 900.0]),
    armor([38.0, 7.0, 900.0], [45.0, 9.0, 1800.0]),
    armor([11.0, 2.0, 190.0], [14.0, 3.5, 700.0]),
    armor([16.0, 2.0, 450.0], [19.0, 3.5, 700.0]),
    armor([27.0, 6.0, 450.0], [28.0, 5.5, 1100.0]),
];

const NIGHTINGALE_HEAVY: [ArmorSeed; 5] = [
    armor([14.0, 8.0, 305.0], [17.5, 8.0, 835.0]),
    armor([38.0, 36.0, 1525.0], [44.0, 28.0, 2040.0]),
    armor([14.0, 7.0, 305.0], [17.5, 7.0, 795.0]),
    armor([19.0, 9.0, 750.0], [20.0, 9.0, 960.0]),
    armor([29.0, 13.0, 750.0], [30.0, 11.0, 960.0]),
];

const NIGHTINGALE_LIGHT: [ArmorSeed; 5] = [
    armor([10.0, 2.0, 190.0], [13.5, 2.0, 335.0]),
    armor([34.0, 12.0, 900.0], [41.0, 6.0, 1040.0]),
    armor([10.0, 2.0, 190.0], [13.5, 1.0, 295.0]),
    armor([15.0, 2.0, 450.0], [16.0, 2.0, 560.0]),
    armor([25.0, 4.0, 450.0], [26.0, 4.0, 560.0]),
];

const STALHRIM_HEAVY: [ArmorSeed; 5] = [
    armor([17.0, 7.0, 450.0], [19.5, 8.0, 860.0]),
    armor([46.0, 38.0, 2200.0], [50.0, 38.0, 2700.0]),
    armor([17.0, 7.0, 450.0], [19.5, 6.5, 750.0]),
    armor([22.0, 7.0, 1135.0], [24.0, 9.0, 1080.0]),
    armor([32.0, 10.0, 1135.0], [35.0, 12.0, 1080.0]),
];

const STALHRIM_LIGHT: [ArmorSeed; 5] = [
    armor([11.5, 2.0, 215.0], [14.0, 5.5, 945.0]),
    armor([39.0, 7.0, 925.0], [45.0, 13.0, 1890.0]),
    armor([11.5, 2.0, 215.0], [14.0, 4.5, 735.0]),
    armor([16.5, 2.0, 465.0], [19.0, 5.0, 735.0]),
    armor([29.5, 10.0, 600.0], [28.0, 5.5, 1100.0]),
];

pub const ARMOR_SEEDS: [(&str, ArmorClass, [ArmorSeed; 5]); 16] = [
    ("ArmorMaterialDaedric", ArmorClass::Heavy, DAEDRIC_HEAVY),
    ("ArmorMaterialDaedric", ArmorClass::Light, DAEDRIC_LIGHT),
    ("ArmorMaterialDragonplate", ArmorClass::Heavy, DRAGON_HEAVY),
    ("ArmorMaterialDragonplate", ArmorClass::Light, DRAGON_LIGHT),
    ("ArmorMaterialDragonscale", ArmorClass::Heavy, DRAGON_HEAVY),
    ("ArmorMaterialDragonscale", ArmorClass::Light, DRAGON_LIGHT),
    ("ArmorMaterialEbony", ArmorClass::Heavy, EBONY_HEAVY),
    ("ArmorMaterialEbony", ArmorClass::Light, EBONY_LIGHT),
    ("ArmorMaterialGlass", ArmorClass::Heavy, GLASS_HEAVY),
    ("ArmorMaterialGlass", ArmorClass::Light, GLASS_LIGHT),
    ("ArmorNightingale", ArmorClass::Heavy, NIGHTINGALE_HEAVY),
    ("ArmorNightingale", ArmorClass::Light, NIGHTINGALE_LIGHT),
    ("DLC2ArmorMaterialStalhrimHeavy", ArmorClass::Heavy, STALHRIM_HEAVY),
    ("DLC2ArmorMaterialStalhrimHeavy", ArmorClass::Light, STALHRIM_LIGHT),
    ("DLC2ArmorMaterialStalhrimLight", ArmorClass::Heavy, STALHRIM_HEAVY),
    ("DLC2ArmorMaterialStalhrimLight", ArmorClass::Light, STALHRIM_LIGHT),
];

const COPY: [ArmorStats; 5] = [offset(0.0, 0.0, 0.0); 5];

pub const ARMOR_DERIVATIONS: [ArmorDerivation; 7] = [
    ArmorDerivation {
        source: "ArmorMaterialDragonplate",
        target: "ArmorMaterialDragonscale",
        class: ArmorClass::Heavy,
        offsets: COPY,
    },
    ArmorDerivation {
        source: "DLC2ArmorMaterialStalhrimHeavy",
        target: "DLC2ArmorMaterialStalhrimLight",
        class: ArmorClass::Heavy,
        offsets: COPY,
    },
    ArmorDerivation {
        source: "DLC2ArmorMaterialStalhrimLight",
        target: "DLC2ArmorMaterialStalhrimHeavy",
        class: ArmorClass::Light,
        offsets: COPY,
    },
    ArmorDerivation {
        source: "ArmorMaterialDragonscale",
        target: "ArmorMaterialDragonplate",
        class: ArmorClass::Light,
        offsets: COPY,
    },
    ArmorDerivation {
        source: "ArmorMaterialDragonscale",
        target: "ArmorMaterialDaedric",
        class: ArmorClass::Light,
        offsets: [
            offset(1.0, 0.0, 150.0),
            offset(3.0, -2.0, 300.0),
            offset(1.0, -1.0, 150.0),
            offset(1.0, 0.0, 200.0),
            offset(2.0, 0.0, 200.0),
        ],
    },
    ArmorDerivation {
        source: "ArmorMaterialEbony",
        target: "ArmorMaterialGlass",
        class: ArmorClass::Heavy,
        offsets: [
            offset(-1.0, -1.0, 0.0),
            offset(-2.0, -10.0, 0.0),
            offset(-1.0, -2.0, 0.0),
            offset(-1.0, -1.0, 0.0),
            offset(-1.0, -2.0, 0.0),
        ],
    },
    ArmorDerivation {
        source: "ArmorMaterialGlass",
        target: "ArmorMaterialEbony",
        class: ArmorClass::Light,
        offsets: [
            offset(1.0, 1.0, 0.0),
            offset(2.0, 2.0, 0.0),
            offset(1.0, 1.0, 0.0),
            offset(1.0, 2.0, 0.0),
            offset(1.0, 0.0, 0.0),
        ],
    },
];
