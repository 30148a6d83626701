use serde::{Deserialize, Serialize};
use std::fmt;

/// The eighteen player skills, in the order the game stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    OneHanded,
    TwoHanded,
    Archery,
    Block,
    Smithing,
    HeavyArmor,
    LightArmor,
    Pickpocket,
    Lockpicking,
    Sneak,
    Alchemy,
    Speech,
    Alteration,
    Conjuration,
    Destruction,
    Illusion,
    Restoration,
    Enchanting,
}

impl Skill {
    pub const ALL: [Skill; 18] = [
        Skill::OneHanded,
        Skill::TwoHanded,
        Skill::Archery,
        Skill::Block,
        Skill::Smithing,
        Skill::HeavyArmor,
        Skill::LightArmor,
        Skill::Pickpocket,
        Skill::Lockpicking,
        Skill::Sneak,
        Skill::Alchemy,
        Skill::Speech,
        Skill::Alteration,
        Skill::Conjuration,
        Skill::Destruction,
        Skill::Illusion,
        Skill::Restoration,
        Skill::Enchanting,
    ];

    /// Schools of magic. Only spells whose effect trains one of these count
    /// towards a rebuilt class.
    pub fn is_magic_school(self) -> bool {
        matches!(
            self,
            Skill::Alteration
                | Skill::Conjuration
                | Skill::Destruction
                | Skill::Illusion
                | Skill::Restoration
        )
    }

    /// Skills scaled by the combat ratio of a hybrid class.
    pub fn is_combat(self) -> bool {
        matches!(
            self,
            Skill::Block
                | Skill::OneHanded
                | Skill::TwoHanded
                | Skill::LightArmor
                | Skill::HeavyArmor
        )
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
