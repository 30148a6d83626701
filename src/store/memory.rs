use super::{RecordStore, Resolver};
use crate::models::{FormKey, Record, RecordKind};
use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record {key} comes from {plugin}, which is not in the load order")]
    UnknownPlugin { plugin: String, key: FormKey },
}

/// On-disk form of a loaded game: the load order plus every record version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub load_order: Vec<String>,
    #[serde(default)]
    pub records: Vec<SnapshotEntry>,
}

/// One plugin's version of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub plugin: String,
    pub key: FormKey,
    pub record: Record,
}

#[derive(Debug, Clone)]
struct Version {
    plugin_index: usize,
    record: Record,
}

/// Arena of record versions keyed by [`FormKey`].
///
/// Versions of a key are kept sorted by load order; the last one wins.
/// Iteration follows the order in which keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    load_order: Vec<String>,
    versions: IndexMap<FormKey, Vec<Version>>,
}

impl MemoryStore {
    pub fn new<I, P>(load_order: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            load_order: load_order.into_iter().map(Into::into).collect(),
            versions: IndexMap::new(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut store = Self::new(snapshot.load_order);
        for entry in snapshot.records {
            store.insert(&entry.plugin, entry.key, entry.record)?;
        }
        Ok(store)
    }

    /// Load a YAML snapshot file.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path))?;

        let snapshot: Snapshot = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse snapshot: {}", path))?;

        let store = Self::from_snapshot(snapshot)
            .with_context(|| format!("Invalid snapshot: {}", path))?;

        tracing::info!(
            "Loaded snapshot from {} ({} plugins, {} records)",
            path,
            store.load_order.len(),
            store.len()
        );
        Ok(store)
    }

    /// Add one plugin's version of a record.
    pub fn insert(&mut self, plugin: &str, key: FormKey, record: Record) -> Result<(), StoreError> {
        let plugin_index = self
            .load_order
            .iter()
            .position(|p| p.eq_ignore_ascii_case(plugin))
            .ok_or_else(|| StoreError::UnknownPlugin {
                plugin: plugin.to_string(),
                key: key.clone(),
            })?;

        let versions = self.versions.entry(key).or_default();
        match versions.binary_search_by_key(&plugin_index, |v| v.plugin_index) {
            Ok(existing) => versions[existing].record = record,
            Err(slot) => versions.insert(
                slot,
                Version {
                    plugin_index,
                    record,
                },
            ),
        }
        Ok(())
    }

    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }

    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    fn plugin_matches(&self, version: &Version, plugins: &[String]) -> bool {
        let name = &self.load_order[version.plugin_index];
        plugins.iter().any(|p| p.eq_ignore_ascii_case(name))
    }
}

impl Resolver for MemoryStore {
    fn resolve(&self, key: &FormKey) -> Option<&Record> {
        self.versions
            .get(key)
            .and_then(|versions| versions.last())
            .map(|v| &v.record)
    }
}

impl RecordStore for MemoryStore {
    fn winning(&self, kind: RecordKind) -> Box<dyn Iterator<Item = (&FormKey, &Record)> + '_> {
        Box::new(self.versions.iter().filter_map(move |(key, versions)| {
            let record = &versions.last()?.record;
            (record.kind() == kind).then_some((key, record))
        }))
    }

    fn resolve_in(&self, key: &FormKey, plugins: &[String]) -> Option<&Record> {
        self.versions
            .get(key)?
            .iter()
            .rev()
            .find(|v| self.plugin_matches(v, plugins))
            .map(|v| &v.record)
    }

    fn defining_plugins(&self, key: &FormKey) -> Vec<&str> {
        self.versions
            .get(key)
            .map(|versions| {
                versions
                    .iter()
                    .map(|v| self.load_order[v.plugin_index].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_by_editor_id(
        &self,
        kind: RecordKind,
        editor_id: &str,
    ) -> Option<(&FormKey, &Record)> {
        self.winning(kind)
            .find(|(_, record)| record.editor_id() == Some(editor_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncounterZone, Weapon};
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn sword(damage: u16) -> Record {
        Record::Weapon(Weapon {
            editor_id: Some("IronSword".into()),
            damage,
            ..Default::default()
        })
    }

    #[test]
    fn test_later_plugin_wins() {
        let key = FormKey::new(0x12EB7, "Skyrim.esm");
        let mut store = MemoryStore::new(["Skyrim.esm", "Update.esm", "Mod.esp"]);
        store.insert("Mod.esp", key.clone(), sword(12)).unwrap();
        store.insert("Skyrim.esm", key.clone(), sword(7)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve_weapon(&key).unwrap().damage, 12);
        assert_eq!(store.defining_plugins(&key), vec!["Skyrim.esm", "Mod.esp"]);

        let vanilla = vec!["Skyrim.esm".to_string()];
        match store.resolve_in(&key, &vanilla) {
            Some(Record::Weapon(w)) => assert_eq!(w.damage, 7),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_plugin_rejected() {
        let mut store = MemoryStore::new(["Skyrim.esm"]);
        let err = store
            .insert("Missing.esp", FormKey::new(1, "Missing.esp"), sword(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownPlugin { .. }));
    }

    #[test]
    fn test_winning_filters_by_kind() {
        let mut store = MemoryStore::new(["Skyrim.esm"]);
        store
            .insert("Skyrim.esm", FormKey::new(1, "Skyrim.esm"), sword(7))
            .unwrap();
        store
            .insert(
                "Skyrim.esm",
                FormKey::new(2, "Skyrim.esm"),
                Record::EncounterZone(EncounterZone::default()),
            )
            .unwrap();

        assert_eq!(store.winning(RecordKind::Weapon).count(), 1);
        assert_eq!(store.winning(RecordKind::EncounterZone).count(), 1);
        assert_eq!(store.winning(RecordKind::Npc).count(), 0);
        assert!(
            store
                .find_by_editor_id(RecordKind::Weapon, "IronSword")
                .is_some()
        );
    }

    #[test]
    fn test_load_snapshot_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let path = dir.join("snapshot.yaml");
        fs::write(
            &path,
            r#"
load_order: [Skyrim.esm]
records:
  - plugin: Skyrim.esm
    key: 012EB7:Skyrim.esm
    record:
      type: Weapon
      editor_id: IronSword
      damage: 7
"#,
        )
        .unwrap();

        let store = MemoryStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load_order(), &["Skyrim.esm".to_string()]);
    }
}
