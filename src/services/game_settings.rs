//! Float game settings written by the item and zone stages.

use crate::models::{GameSetting, Record, RecordKind};
use crate::store::{Changeset, PatchError, RecordStore};

/// Set the float game setting `editor_id` to `value`.
///
/// An existing setting (already in the patch, or winning in the store) is
/// overridden in place; otherwise a new one is created in the patch plugin.
/// Returns `false` when the winning value already equals `value`.
pub fn set_float<S: RecordStore + ?Sized>(
    store: &S,
    changeset: &mut Changeset,
    editor_id: &str,
    value: f32,
) -> Result<bool, PatchError> {
    let existing = changeset
        .find_by_editor_id(RecordKind::GameSetting, editor_id)
        .cloned()
        .map(|key| {
            let current = changeset.get(&key).cloned();
            (key, current)
        })
        .or_else(|| {
            store
                .find_by_editor_id(RecordKind::GameSetting, editor_id)
                .map(|(key, record)| (key.clone(), Some(record.clone())))
        });

    let setting = GameSetting {
        editor_id: Some(editor_id.to_string()),
        value,
    };

    match existing {
        Some((_, Some(Record::GameSetting(current)))) if current.value == value => Ok(false),
        Some((key, _)) => {
            tracing::debug!("Overriding game setting {} = {}", editor_id, value);
            changeset.set(key, Record::GameSetting(setting));
            Ok(true)
        }
        None => {
            tracing::debug!("Adding game setting {} = {}", editor_id, value);
            changeset.add_new(Record::GameSetting(setting))?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormKey;
    use crate::store::MemoryStore;

    #[test]
    fn test_creates_missing_setting() {
        let store = MemoryStore::new(["Skyrim.esm"]);
        let mut changeset = Changeset::new("Unleveled.esp");

        assert!(set_float(&store, &mut changeset, "fSmithingArmorMax", 6.0).unwrap());
        let key = changeset
            .find_by_editor_id(RecordKind::GameSetting, "fSmithingArmorMax")
            .unwrap();
        assert_eq!(key.plugin, "Unleveled.esp");

        assert!(!set_float(&store, &mut changeset, "fSmithingArmorMax", 6.0).unwrap());
        assert_eq!(changeset.len(), 1);
    }

    #[test]
    fn test_overrides_existing_setting() {
        let key = FormKey::new(0x0F4B, "Skyrim.esm");
        let mut store = MemoryStore::new(["Skyrim.esm"]);
        store
            .insert(
                "Skyrim.esm",
                key.clone(),
                Record::GameSetting(GameSetting {
                    editor_id: Some("fLeveledActorMultHard".into()),
                    value: 1.25,
                }),
            )
            .unwrap();
        let mut changeset = Changeset::new("Unleveled.esp");

        assert!(set_float(&store, &mut changeset, "fLeveledActorMultHard", 1.0).unwrap());
        assert_eq!(
            changeset.get(&key),
            Some(&Record::GameSetting(GameSetting {
                editor_id: Some("fLeveledActorMultHard".into()),
                value: 1.0,
            }))
        );
    }
}
