//! Leveled item list unleveling.
//!
//! Each winning leveled item list ends in one of these states:
//!
//! - **Artifact lists** (every entry is the same named item, or the editor ID
//!   matches an artifact key) keep only their highest-level entries.
//! - **Other lists** lose their rare entries and, when a level spread remains,
//!   get a weak and a strong sibling (`<editor id><suffix>`) split at
//!   `round((min + max) * split_ratio)`.
//!
//! Every list that is kept or produced has its entry levels collapsed to 1.
//! A final pass points nested list entries inside the siblings at the
//! same-tier sibling of the nested list.

use crate::metrics::{CollectionProgress, Metrics};
use crate::models::{
    FormKey, KeyRule, LeveledEntry, LeveledList, LeveledListSettings, Record, RecordKind, Tier,
};
use crate::services::matching::{MatchMode, any_match};
use crate::store::{Changeset, PatchError, PatchView, RecordStore, Resolver};

/// Terminal state of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// Nothing to write.
    Unchanged,
    /// Pruned and/or unleveled but not split.
    Unleveled,
    ArtifactCulled,
    SplitIntoVariants,
    /// Processing emptied the list and empty lists are not allowed; the
    /// original is kept as is.
    EmptyDiscarded,
}

/// Result of processing one list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedList {
    pub outcome: ListOutcome,
    /// Override for the source list, when it changed.
    pub list: Option<LeveledList>,
    pub siblings: Vec<(Tier, LeveledList)>,
}

impl ProcessedList {
    fn untouched(outcome: ListOutcome) -> Self {
        Self {
            outcome,
            list: None,
            siblings: Vec::new(),
        }
    }
}

pub struct LeveledListSplitter<'a> {
    settings: &'a LeveledListSettings,
    artifact_keys: &'a [KeyRule],
}

impl<'a> LeveledListSplitter<'a> {
    pub fn new(settings: &'a LeveledListSettings, artifact_keys: &'a [KeyRule]) -> Self {
        Self {
            settings,
            artifact_keys,
        }
    }

    /// Unlevel every winning leveled item list and write the results.
    pub fn run<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        changeset: &mut Changeset,
        metrics: &Metrics,
        progress_interval: u64,
    ) -> Result<(), PatchError> {
        let mut progress = CollectionProgress::new("leveled item lists", progress_interval);
        let mut created = Vec::new();

        for (key, record) in store.winning(RecordKind::LeveledItem) {
            let Record::LeveledItem(list) = record else {
                continue;
            };

            let processed = self.process(&PatchView::new(store, changeset), list);
            match processed.outcome {
                ListOutcome::ArtifactCulled => metrics.record_artifact_list(),
                ListOutcome::SplitIntoVariants => metrics.record_list_split(),
                ListOutcome::EmptyDiscarded => {
                    tracing::debug!("Keeping {} unchanged, unleveling would empty it", key);
                    metrics.record_list_discarded();
                }
                ListOutcome::Unchanged | ListOutcome::Unleveled => {}
            }

            let changed = processed.list.is_some() || !processed.siblings.is_empty();
            if let Some(list) = processed.list {
                changeset.set(key.clone(), Record::LeveledItem(list));
            }
            for (tier, sibling) in processed.siblings {
                let sibling_key = changeset.add_new(Record::LeveledItem(sibling))?;
                metrics.record_created();
                created.push((sibling_key, tier));
            }
            progress.record(changed);
        }

        let rewired = self.rewire_nested(store, changeset, &created);
        if rewired > 0 {
            tracing::info!("Rewired {} nested entries in split leveled lists", rewired);
        }

        progress.finish(metrics);
        Ok(())
    }

    /// Classify, prune, split and unlevel a single list.
    pub fn process<R: Resolver + ?Sized>(&self, resolver: &R, original: &LeveledList) -> ProcessedList {
        let mut list = original.clone();
        let mut siblings = Vec::new();

        let outcome = if self.is_artifact_list(resolver, &list) {
            if self.settings.unlevel_artifacts {
                cull_to_max_level(&mut list.entries);
            }
            ListOutcome::ArtifactCulled
        } else {
            remove_rare_entries(&mut list.entries, resolver, self.settings);
            match (level_bounds(&list.entries), list.editor_id.as_deref()) {
                (Some((min, max)), Some(editor_id)) if min != max => {
                    let mid = split_threshold(min, max, self.settings.split_ratio);
                    let (weak, strong) = split_entries(&list.entries, mid);
                    for (tier, entries) in [(Tier::Weak, weak), (Tier::Strong, strong)] {
                        if entries.is_empty() && !self.settings.allow_empty_lists {
                            continue;
                        }
                        let mut sibling = LeveledList {
                            editor_id: Some(format!("{}{}", editor_id, self.settings.suffix(tier))),
                            entries,
                        };
                        unlevel(&mut sibling.entries);
                        siblings.push((tier, sibling));
                    }
                    ListOutcome::SplitIntoVariants
                }
                _ => ListOutcome::Unleveled,
            }
        };

        unlevel(&mut list.entries);

        if list.entries.is_empty() && !self.settings.allow_empty_lists {
            return ProcessedList::untouched(if original.entries.is_empty() {
                ListOutcome::Unchanged
            } else {
                ListOutcome::EmptyDiscarded
            });
        }

        let changed = list != *original;
        let outcome = match outcome {
            ListOutcome::Unleveled if !changed => ListOutcome::Unchanged,
            other => other,
        };

        ProcessedList {
            outcome,
            list: changed.then_some(list),
            siblings,
        }
    }

    /// True when every entry is the same named item, or the editor ID
    /// matches an artifact key.
    pub fn is_artifact_list<R: Resolver + ?Sized>(&self, resolver: &R, list: &LeveledList) -> bool {
        let by_key = list
            .editor_id
            .as_deref()
            .is_some_and(|id| any_match(self.artifact_keys, id, MatchMode::ContainsIgnoreCase));

        by_key || shares_one_display_name(resolver, list)
    }

    /// Point entries of new siblings at the same-tier sibling of the list they
    /// reference. Returns the number of entries changed.
    fn rewire_nested<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        changeset: &mut Changeset,
        created: &[(FormKey, Tier)],
    ) -> usize {
        let mut rewired = 0;
        for (sibling_key, tier) in created {
            let updated = {
                let view = PatchView::new(store, changeset);
                let Some(sibling) = view.resolve_leveled_item(sibling_key) else {
                    continue;
                };
                let mut updated = sibling.clone();
                let mut changed = false;
                for entry in &mut updated.entries {
                    let Some(target) = view
                        .resolve_leveled_item(&entry.reference)
                        .and_then(|nested| nested.editor_id.as_deref())
                        .map(|id| format!("{}{}", id, self.settings.suffix(*tier)))
                        .and_then(|name| changeset.find_by_editor_id(RecordKind::LeveledItem, &name))
                    else {
                        continue;
                    };
                    if *target != entry.reference {
                        entry.reference = target.clone();
                        changed = true;
                        rewired += 1;
                    }
                }
                changed.then_some(updated)
            };

            if let Some(updated) = updated {
                changeset.set(sibling_key.clone(), Record::LeveledItem(updated));
            }
        }
        rewired
    }
}

fn shares_one_display_name<R: Resolver + ?Sized>(resolver: &R, list: &LeveledList) -> bool {
    let mut shared: Option<&str> = None;
    for entry in &list.entries {
        let Some(name) = resolver
            .resolve(&entry.reference)
            .and_then(Record::name)
            .filter(|name| !name.is_empty())
        else {
            return false;
        };
        match shared {
            None => shared = Some(name),
            Some(existing) if existing == name => {}
            Some(_) => return false,
        }
    }
    shared.is_some()
}

/// Keep only the entries at the highest level present.
pub fn cull_to_max_level(entries: &mut Vec<LeveledEntry>) -> bool {
    let Some(max) = entries.iter().map(|e| e.level).max() else {
        return false;
    };
    let before = entries.len();
    entries.retain(|e| e.level == max);
    entries.len() != before
}

/// Drop entries above the configured maximum, below the minimum, or glass
/// items sitting exactly at the maximum.
pub fn remove_rare_entries<R: Resolver + ?Sized>(
    entries: &mut Vec<LeveledEntry>,
    resolver: &R,
    settings: &LeveledListSettings,
) -> bool {
    let max = settings.max_item_level;
    let min = settings.min_item_level;
    let before = entries.len();
    entries.retain(|entry| {
        if (max != 0 && entry.level > max) || entry.level < min {
            return false;
        }
        if max != 0 && entry.level == max {
            let is_glass = resolver
                .editor_id_of(&entry.reference)
                .is_some_and(|id| id.to_lowercase().contains("glass"));
            return !is_glass;
        }
        true
    });
    entries.len() != before
}

pub fn level_bounds(entries: &[LeveledEntry]) -> Option<(i16, i16)> {
    let min = entries.iter().map(|e| e.level).min()?;
    let max = entries.iter().map(|e| e.level).max()?;
    Some((min, max))
}

pub fn split_threshold(min: i16, max: i16, ratio: f32) -> i16 {
    ((min as f64 + max as f64) * ratio as f64).round() as i16
}

/// Weak keeps levels `<= mid`, strong keeps levels `> mid`.
pub fn split_entries(entries: &[LeveledEntry], mid: i16) -> (Vec<LeveledEntry>, Vec<LeveledEntry>) {
    entries.iter().cloned().partition(|e| e.level <= mid)
}

/// Set every entry level to 1.
pub fn unlevel(entries: &mut [LeveledEntry]) -> bool {
    let mut changed = false;
    for entry in entries.iter_mut().filter(|e| e.level != 1) {
        entry.level = 1;
        changed = true;
    }
    changed
}
