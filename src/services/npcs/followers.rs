//! Followers scale with the player instead of keeping a fixed level.

use crate::models::{KeyRule, Npc, NpcLevel, NpcSettings};
use crate::services::matching::MatchMode;
use crate::store::Resolver;

/// Level assumed for a follower that had no fixed level.
pub const DEFAULT_FOLLOWER_LEVEL: i16 = 40;

/// True for NPCs in a follower faction or named by a follower rule, unless
/// any follower rule forbids them. Name keys ignore case; forbidden keys
/// are case-sensitive.
pub fn is_follower<R: Resolver + ?Sized>(
    resolver: &R,
    npc: &Npc,
    settings: &NpcSettings,
    rules: &[KeyRule],
) -> bool {
    let Some(editor_id) = npc.editor_id.as_deref() else {
        return false;
    };
    let in_faction = npc
        .factions
        .iter()
        .filter_map(|faction| resolver.editor_id_of(faction))
        .any(|faction| settings.follower_factions.iter().any(|f| f == faction));
    let by_rule = rules
        .iter()
        .flat_map(|rule| &rule.keys)
        .any(|key| editor_id.to_lowercase().contains(&key.to_lowercase()));
    let forbidden = rules
        .iter()
        .any(|rule| rule.is_forbidden(editor_id, MatchMode::Contains));

    (in_faction || by_rule) && !forbidden
}

/// Switch a follower to player scaling with a level band that still covers
/// its previous level. Returns whether anything changed.
pub fn scale_follower(npc: &mut Npc) -> bool {
    let previous = npc.static_level().unwrap_or(DEFAULT_FOLLOWER_LEVEL);
    let before = (npc.level, npc.calc_min_level, npc.calc_max_level);

    npc.level = NpcLevel::PcMultiplier { mult: 1.0 };
    npc.calc_min_level = npc.calc_min_level.max(1);
    npc.calc_max_level = npc.calc_max_level.max(previous);

    (npc.level, npc.calc_min_level, npc.calc_max_level) != before
}
