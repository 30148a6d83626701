use crate::models::{FormKey, MAX_LOCAL_ID, Record, RecordKind};
use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use thiserror::Error;

/// First local id handed out to new records; lower ids are reserved by the game.
const FIRST_NEW_ID: u32 = 0x000800;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("No free form ids left in {0}")]
    FormIdsExhausted(String),
}

/// Output of a run: overrides of existing records plus newly created ones.
///
/// Insertion order is preserved so the written patch is deterministic.
/// Records are looked up by key or by `(kind, editor ID)`.
#[derive(Debug, Clone)]
pub struct Changeset {
    plugin: String,
    next_id: u32,
    records: IndexMap<FormKey, Record>,
    by_editor_id: HashMap<(RecordKind, String), FormKey>,
}

/// Serialized form of a [`Changeset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchDocument {
    pub plugin: String,
    pub records: Vec<PatchEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchEntry {
    pub key: FormKey,
    pub record: Record,
}

impl Changeset {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            next_id: FIRST_NEW_ID,
            records: IndexMap::new(),
            by_editor_id: HashMap::new(),
        }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Add a brand-new record owned by the patch plugin.
    pub fn add_new(&mut self, record: Record) -> Result<FormKey, PatchError> {
        if self.next_id > MAX_LOCAL_ID {
            return Err(PatchError::FormIdsExhausted(self.plugin.clone()));
        }
        let key = FormKey::new(self.next_id, self.plugin.clone());
        self.next_id += 1;
        self.set(key.clone(), record);
        Ok(key)
    }

    /// Insert or replace the record stored under `key`.
    pub fn set(&mut self, key: FormKey, record: Record) {
        let stale = self
            .records
            .get(&key)
            .and_then(|previous| Some((previous.kind(), previous.editor_id()?.to_string())));
        if let Some(index_key) = stale {
            if self.by_editor_id.get(&index_key) == Some(&key) {
                self.by_editor_id.remove(&index_key);
            }
        }

        if let Some(editor_id) = record.editor_id() {
            self.by_editor_id
                .insert((record.kind(), editor_id.to_string()), key.clone());
        }
        self.records.insert(key, record);
    }

    pub fn get(&self, key: &FormKey) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &FormKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn find_by_editor_id(&self, kind: RecordKind, editor_id: &str) -> Option<&FormKey> {
        self.by_editor_id.get(&(kind, editor_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormKey, &Record)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per kind, for the run summary.
    pub fn counts_by_kind(&self) -> BTreeMap<RecordKind, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records.values() {
            *counts.entry(record.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_document(&self) -> PatchDocument {
        PatchDocument {
            plugin: self.plugin.clone(),
            records: self
                .records
                .iter()
                .map(|(key, record)| PatchEntry {
                    key: key.clone(),
                    record: record.clone(),
                })
                .collect(),
        }
    }

    /// Write the changeset as YAML.
    pub fn save<P: AsRef<Utf8Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml_string = serde_yaml_ng::to_string(&self.to_document())
            .context("Failed to serialize patch to YAML")?;

        fs::write(path, yaml_string)
            .with_context(|| format!("Failed to write patch: {}", path))?;

        tracing::info!("Saved {} records to {}", self.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeveledList, Outfit};
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn list(editor_id: &str) -> Record {
        Record::LeveledItem(LeveledList {
            editor_id: Some(editor_id.to_string()),
            entries: Vec::new(),
        })
    }

    #[test]
    fn test_add_new_allocates_sequential_ids() {
        let mut changeset = Changeset::new("Unleveled.esp");
        let first = changeset.add_new(list("LItemA_UNL_Weak")).unwrap();
        let second = changeset.add_new(list("LItemA_UNL_Strong")).unwrap();

        assert_eq!(first, FormKey::new(0x800, "Unleveled.esp"));
        assert_eq!(second, FormKey::new(0x801, "Unleveled.esp"));
        assert_eq!(
            changeset.find_by_editor_id(RecordKind::LeveledItem, "LItemA_UNL_Strong"),
            Some(&second)
        );
        assert_eq!(
            changeset.find_by_editor_id(RecordKind::Outfit, "LItemA_UNL_Strong"),
            None
        );
    }

    #[test]
    fn test_form_ids_exhausted() {
        let mut changeset = Changeset::new("Unleveled.esp");
        changeset.next_id = MAX_LOCAL_ID;
        assert!(changeset.add_new(list("Last")).is_ok());
        assert_eq!(
            changeset.add_new(list("OneTooMany")),
            Err(PatchError::FormIdsExhausted("Unleveled.esp".to_string()))
        );
    }

    #[test]
    fn test_set_reindexes_renamed_record() {
        let mut changeset = Changeset::new("Unleveled.esp");
        let key = FormKey::new(0x10, "Skyrim.esm");
        changeset.set(key.clone(), list("Old"));
        changeset.set(key.clone(), list("New"));

        assert_eq!(changeset.len(), 1);
        assert!(changeset.find_by_editor_id(RecordKind::LeveledItem, "Old").is_none());
        assert_eq!(
            changeset.find_by_editor_id(RecordKind::LeveledItem, "New"),
            Some(&key)
        );
    }

    #[test]
    fn test_counts_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let mut changeset = Changeset::new("Unleveled.esp");
        changeset.add_new(list("A")).unwrap();
        changeset
            .add_new(Record::Outfit(Outfit::default()))
            .unwrap();

        let counts = changeset.counts_by_kind();
        assert_eq!(counts[&RecordKind::LeveledItem], 1);
        assert_eq!(counts[&RecordKind::Outfit], 1);

        let path = dir.join("patch.yaml");
        changeset.save(&path).unwrap();
        let written: PatchDocument =
            serde_yaml_ng::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.plugin, "Unleveled.esp");
        assert_eq!(written.records.len(), 2);
    }
}
