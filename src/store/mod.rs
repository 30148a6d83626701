//! Record store abstraction.
//!
//! The engine never owns canonical records. It reads precedence-resolved
//! ("winning") records from a [`RecordStore`], mutates clones, and commits the
//! results to a [`Changeset`]. [`PatchView`] layers the changeset over the store
//! so later stages see records created earlier in the same run.
//!
//! # Components
//!
//! - [`RecordStore`]: winning-record iteration, link resolution, per-plugin lookups
//! - [`Resolver`]: link resolution plus typed helpers, shared by stores and views
//! - [`MemoryStore`]: arena keyed by [`FormKey`], loaded from a YAML snapshot
//! - [`Changeset`]: ordered, append-only patch output

pub mod changeset;
pub mod memory;

pub use changeset::{Changeset, PatchDocument, PatchEntry, PatchError};
pub use memory::{MemoryStore, Snapshot, SnapshotEntry, StoreError};

use crate::models::{
    Armor, Class, Faction, FormKey, LeveledList, Location, MagicEffect, Npc, Outfit, Perk, Race,
    Record, RecordKind, Skill, SkillTree, Spell, Weapon,
};

macro_rules! typed_resolver {
    ($($fn_name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            fn $fn_name(&self, key: &FormKey) -> Option<&$ty> {
                match self.resolve(key)? {
                    Record::$variant(record) => Some(record),
                    _ => None,
                }
            }
        )*
    };
}

/// Resolution of a [`FormKey`] to the record it currently names.
///
/// The typed helpers return `None` both for missing records and for records
/// of another kind; callers treat either as "not matching".
pub trait Resolver {
    fn resolve(&self, key: &FormKey) -> Option<&Record>;

    typed_resolver! {
        resolve_weapon => Weapon(Weapon),
        resolve_armor => Armor(Armor),
        resolve_spell => Spell(Spell),
        resolve_magic_effect => MagicEffect(MagicEffect),
        resolve_npc => Npc(Npc),
        resolve_class => Class(Class),
        resolve_perk => Perk(Perk),
        resolve_race => Race(Race),
        resolve_faction => Faction(Faction),
        resolve_location => Location(Location),
        resolve_outfit => Outfit(Outfit),
    }

    fn resolve_leveled_item(&self, key: &FormKey) -> Option<&LeveledList> {
        match self.resolve(key)? {
            Record::LeveledItem(list) => Some(list),
            _ => None,
        }
    }

    fn editor_id_of(&self, key: &FormKey) -> Option<&str> {
        self.resolve(key)?.editor_id()
    }
}

/// Collaborator interface over the loaded game data.
pub trait RecordStore: Resolver {
    /// Winning version of every record of `kind`, in a stable order.
    fn winning(&self, kind: RecordKind) -> Box<dyn Iterator<Item = (&FormKey, &Record)> + '_>;

    /// Winning version of `key` considering only the given plugins.
    fn resolve_in(&self, key: &FormKey, plugins: &[String]) -> Option<&Record>;

    /// Every plugin that defines or overrides `key`, in load order.
    fn defining_plugins(&self, key: &FormKey) -> Vec<&str>;

    /// Winning record of `kind` with exactly this editor ID.
    fn find_by_editor_id(
        &self,
        kind: RecordKind,
        editor_id: &str,
    ) -> Option<(&FormKey, &Record)>;

    /// Perk tree of `skill`.
    fn skill_tree(&self, skill: Skill) -> Option<&SkillTree> {
        self.winning(RecordKind::SkillTree)
            .find_map(|(_, record)| match record {
                Record::SkillTree(tree) if tree.skill == skill => Some(tree),
                _ => None,
            })
    }
}

/// Changeset-first resolution over a store.
pub struct PatchView<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    changeset: &'a Changeset,
}

impl<'a, S: RecordStore + ?Sized> PatchView<'a, S> {
    pub fn new(store: &'a S, changeset: &'a Changeset) -> Self {
        Self { store, changeset }
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn changeset(&self) -> &'a Changeset {
        self.changeset
    }
}

impl<S: RecordStore + ?Sized> Resolver for PatchView<'_, S> {
    fn resolve(&self, key: &FormKey) -> Option<&Record> {
        self.changeset
            .get(key)
            .or_else(|| self.store.resolve(key))
    }
}
