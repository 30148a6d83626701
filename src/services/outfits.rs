//! Weak and strong outfit variants.
//!
//! For each outfit a copy per tier is built in which every leveled list is
//! replaced by its same-tier sibling from the splitter. NPC equipment swaps
//! later find these copies as `<outfit editor id><suffix>`.

use crate::metrics::{CollectionProgress, Metrics};
use crate::models::{LeveledListSettings, Outfit, OutfitSettings, Record, RecordKind, Tier};
use crate::store::{Changeset, PatchError, PatchView, RecordStore, Resolver};

pub struct OutfitRewriter<'a> {
    settings: &'a OutfitSettings,
    suffixes: &'a LeveledListSettings,
}

impl<'a> OutfitRewriter<'a> {
    pub fn new(settings: &'a OutfitSettings, suffixes: &'a LeveledListSettings) -> Self {
        Self { settings, suffixes }
    }

    pub fn run<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        changeset: &mut Changeset,
        metrics: &Metrics,
        progress_interval: u64,
    ) -> Result<(), PatchError> {
        let mut progress = CollectionProgress::new("outfits", progress_interval);

        for (_, record) in store.winning(RecordKind::Outfit) {
            let Record::Outfit(outfit) = record else {
                continue;
            };

            let variants: Vec<Outfit> = {
                let view = PatchView::new(store, changeset);
                Tier::BOTH
                    .into_iter()
                    .filter_map(|tier| self.variant(&view, changeset, outfit, tier))
                    .collect()
            };

            progress.record(!variants.is_empty());
            for variant in variants {
                changeset.add_new(Record::Outfit(variant))?;
                metrics.record_created();
            }
        }

        progress.finish(metrics);
        Ok(())
    }

    /// Copy of `outfit` for `tier`, or `None` when the copy would not differ
    /// from the source and unchanged variants are not kept.
    pub fn variant<R: Resolver + ?Sized>(
        &self,
        resolver: &R,
        changeset: &Changeset,
        outfit: &Outfit,
        tier: Tier,
    ) -> Option<Outfit> {
        let editor_id = outfit.editor_id.as_deref()?;
        let suffix = self.suffixes.suffix(tier);

        let mut substituted = 0;
        let items = outfit
            .items
            .iter()
            .map(|item| {
                let sibling = resolver
                    .resolve_leveled_item(item)
                    .and_then(|list| list.editor_id.as_deref())
                    .and_then(|id| {
                        changeset.find_by_editor_id(RecordKind::LeveledItem, &format!("{}{}", id, suffix))
                    });
                match sibling {
                    Some(sibling) if sibling != item => {
                        substituted += 1;
                        sibling.clone()
                    }
                    _ => item.clone(),
                }
            })
            .collect();

        if substituted == 0 && !self.settings.keep_unchanged_variants {
            return None;
        }

        tracing::debug!(
            "Outfit {}{}: {} leveled lists substituted",
            editor_id,
            suffix,
            substituted
        );
        Some(Outfit {
            editor_id: Some(format!("{}{}", editor_id, suffix)),
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Armor, FormKey, LeveledEntry, LeveledList};
    use crate::store::MemoryStore;

    const MASTER: &str = "Skyrim.esm";

    struct Fixture {
        store: MemoryStore,
        changeset: Changeset,
        outfit: FormKey,
        helmet: FormKey,
        list: FormKey,
        weak: FormKey,
    }

    fn fixture() -> Fixture {
        let helmet = FormKey::new(0x10, MASTER);
        let list = FormKey::new(0x20, MASTER);
        let outfit = FormKey::new(0x30, MASTER);

        let mut store = MemoryStore::new([MASTER]);
        store
            .insert(MASTER, helmet.clone(), Record::Armor(Armor::default()))
            .unwrap();
        store
            .insert(
                MASTER,
                list.clone(),
                Record::LeveledItem(LeveledList {
                    editor_id: Some("LItemBanditWeapon".into()),
                    entries: vec![LeveledEntry::new(1, helmet.clone())],
                }),
            )
            .unwrap();
        store
            .insert(
                MASTER,
                outfit.clone(),
                Record::Outfit(Outfit {
                    editor_id: Some("BanditOutfit".into()),
                    items: vec![helmet.clone(), list.clone()],
                }),
            )
            .unwrap();

        let mut changeset = Changeset::new("Unleveled.esp");
        let weak = changeset
            .add_new(Record::LeveledItem(LeveledList {
                editor_id: Some("LItemBanditWeapon_UNL_Weak".into()),
                entries: Vec::new(),
            }))
            .unwrap();

        Fixture {
            store,
            changeset,
            outfit,
            helmet,
            list,
            weak,
        }
    }

    #[test]
    fn test_variant_substitutes_same_tier_sibling() {
        let f = fixture();
        let outfit_settings = OutfitSettings::default();
        let suffixes = LeveledListSettings::default();
        let rewriter = OutfitRewriter::new(&outfit_settings, &suffixes);
        let Some(Record::Outfit(outfit)) = f.store.resolve(&f.outfit) else {
            panic!("missing outfit");
        };

        let weak = rewriter
            .variant(&f.store, &f.changeset, outfit, Tier::Weak)
            .unwrap();
        assert_eq!(weak.editor_id.as_deref(), Some("BanditOutfit_UNL_Weak"));
        assert_eq!(weak.items, vec![f.helmet.clone(), f.weak.clone()]);

        assert!(rewriter.variant(&f.store, &f.changeset, outfit, Tier::Strong).is_none());
    }

    #[test]
    fn test_keep_unchanged_variants() {
        let f = fixture();
        let outfit_settings = OutfitSettings {
            keep_unchanged_variants: true,
            ..Default::default()
        };
        let suffixes = LeveledListSettings::default();
        let rewriter = OutfitRewriter::new(&outfit_settings, &suffixes);
        let Some(Record::Outfit(outfit)) = f.store.resolve(&f.outfit) else {
            panic!("missing outfit");
        };

        let strong = rewriter
            .variant(&f.store, &f.changeset, outfit, Tier::Strong)
            .unwrap();
        assert_eq!(strong.editor_id.as_deref(), Some("BanditOutfit_UNL_Strong"));
        assert_eq!(strong.items, vec![f.helmet.clone(), f.list.clone()]);
    }

    #[test]
    fn test_run_adds_variants_to_changeset() {
        let mut f = fixture();
        let outfit_settings = OutfitSettings::default();
        let suffixes = LeveledListSettings::default();
        let metrics = Metrics::new();

        OutfitRewriter::new(&outfit_settings, &suffixes)
            .run(&f.store, &mut f.changeset, &metrics, 100)
            .unwrap();

        assert!(
            f.changeset
                .find_by_editor_id(RecordKind::Outfit, "BanditOutfit_UNL_Weak")
                .is_some()
        );
        assert!(
            f.changeset
                .find_by_editor_id(RecordKind::Outfit, "BanditOutfit_UNL_Strong")
                .is_none()
        );
        assert!(f.changeset.get(&f.outfit).is_none());
    }
}
