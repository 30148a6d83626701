//! Whole-run orchestration.
//!
//! Stages run in a fixed order because later ones read what earlier ones
//! wrote: NPC equipment swaps look up the leveled list and outfit siblings,
//! outfits look up the leveled list siblings.

use crate::metrics::Metrics;
use crate::models::{RuleSet, Settings};
use crate::services::baseline::BaselineTable;
use crate::services::leveled_lists::LeveledListSplitter;
use crate::services::npcs::NpcLeveler;
use crate::services::outfits::OutfitRewriter;
use crate::services::rescaler::StatRescaler;
use crate::services::roller::{LevelRoller, SeededRoller};
use crate::services::zones::ZoneLeveler;
use crate::store::{Changeset, PatchError, RecordStore};
use std::time::Instant;

pub struct Patcher<'a> {
    settings: &'a Settings,
    rules: &'a RuleSet,
}

impl<'a> Patcher<'a> {
    pub fn new(settings: &'a Settings, rules: &'a RuleSet) -> Self {
        Self { settings, rules }
    }

    /// Run every enabled stage with the configured seed.
    pub fn run<S: RecordStore + ?Sized>(&self, store: &S, metrics: &Metrics) -> Result<Changeset, PatchError> {
        let mut roller = SeededRoller::new(self.settings.general.seed);
        self.run_with(store, &mut roller, metrics)
    }

    /// Run every enabled stage, drawing random levels from `roller`.
    pub fn run_with<S, R>(&self, store: &S, roller: &mut R, metrics: &Metrics) -> Result<Changeset, PatchError>
    where
        S: RecordStore + ?Sized,
        R: LevelRoller + ?Sized,
    {
        let settings = self.settings;
        let interval = settings.general.progress_interval;
        let mut changeset = Changeset::new(settings.general.patch_plugin.clone());

        if settings.items.rescale_items {
            let start = Instant::now();
            let table = BaselineTable::from_reference_items(store, &settings.items.base_stat_plugins);
            StatRescaler::new(&table, &settings.items).run(store, &mut changeset, metrics, interval)?;
            tracing::info!("Item rescaling finished in {:?}", start.elapsed());
        } else {
            tracing::info!("Item rescaling disabled");
        }

        if settings.leveled_lists.unlevel_item_lists {
            let start = Instant::now();
            LeveledListSplitter::new(&settings.leveled_lists, &self.rules.artifact_keys).run(
                store,
                &mut changeset,
                metrics,
                interval,
            )?;
            tracing::info!("Leveled list unleveling finished in {:?}", start.elapsed());
        } else {
            tracing::info!("Leveled list unleveling disabled");
        }

        if settings.outfits.split_outfits {
            let start = Instant::now();
            OutfitRewriter::new(&settings.outfits, &settings.leveled_lists).run(
                store,
                &mut changeset,
                metrics,
                interval,
            )?;
            tracing::info!("Outfit splitting finished in {:?}", start.elapsed());
        } else {
            tracing::info!("Outfit splitting disabled");
        }

        if settings.zones.unlevel_zones {
            let start = Instant::now();
            ZoneLeveler::new(&settings.zones, self.rules).run(store, &mut changeset, roller, metrics, interval)?;
            tracing::info!("Zone leveling finished in {:?}", start.elapsed());
        } else {
            tracing::info!("Zone leveling disabled");
        }

        if settings.npcs.unlevel_npcs {
            let start = Instant::now();
            NpcLeveler::new(settings, self.rules).run(store, &mut changeset, roller, metrics, interval)?;
            tracing::info!("NPC leveling finished in {:?}", start.elapsed());
        } else {
            tracing::info!("NPC leveling disabled");
        }

        for (kind, count) in changeset.counts_by_kind() {
            tracing::debug!("Patch holds {} {:?} records", count, kind);
        }
        metrics.log_summary();
        Ok(changeset)
    }
}
