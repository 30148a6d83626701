//! Level-based swaps to weak or strong equipment.

use crate::models::{LeveledListSettings, Npc, NpcSettings, RecordKind, Tier};
use crate::store::{Changeset, Resolver};

/// Equipment tier for an NPC of `level`, or `None` for the mid band.
pub fn equipment_tier(level: i16, settings: &NpcSettings) -> Option<Tier> {
    if settings.allow_mid_tier {
        if level < settings.weak_tier_below {
            Some(Tier::Weak)
        } else if level > settings.strong_tier_above {
            Some(Tier::Strong)
        } else {
            None
        }
    } else if level <= settings.strong_tier_above {
        Some(Tier::Weak)
    } else {
        Some(Tier::Strong)
    }
}

/// Point inventory leveled lists and the default outfit at their `tier`
/// siblings. Entries without a sibling are left alone.
pub fn swap_equipment<R: Resolver + ?Sized>(
    resolver: &R,
    changeset: &Changeset,
    npc: &mut Npc,
    tier: Tier,
    suffixes: &LeveledListSettings,
) -> bool {
    let suffix = suffixes.suffix(tier);
    let sibling = |kind: RecordKind, editor_id: &str| {
        changeset
            .find_by_editor_id(kind, &format!("{}{}", editor_id, suffix))
            .cloned()
    };

    let mut changed = false;
    for entry in &mut npc.items {
        let Some(target) = resolver
            .resolve_leveled_item(&entry.item)
            .and_then(|list| list.editor_id.as_deref())
            .and_then(|id| sibling(RecordKind::LeveledItem, id))
        else {
            continue;
        };
        if target != entry.item {
            entry.item = target;
            changed = true;
        }
    }

    let outfit = npc
        .default_outfit
        .as_ref()
        .and_then(|key| resolver.resolve_outfit(key))
        .and_then(|outfit| outfit.editor_id.as_deref())
        .and_then(|id| sibling(RecordKind::Outfit, id));
    if let Some(outfit) = outfit {
        if npc.default_outfit.as_ref() != Some(&outfit) {
            npc.default_outfit = Some(outfit);
            changed = true;
        }
    }

    changed
}
