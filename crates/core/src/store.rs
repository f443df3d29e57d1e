//! JSON document storage for medicine records.
//!
//! The whole collection lives in one JSON file shaped as `{ "medicines": [ ... ] }`. The store
//! reads and replaces that file as a unit; nothing else in the workspace touches it.
//!
//! Records are kept loosely typed on the way in. A hand-edited file may carry a record with a
//! missing name or a price of `"x"`, and those records must survive a rewrite untouched while
//! the validated operations in [`crate::service`] simply skip over them. A document whose
//! overall shape is wrong is rejected outright.

use crate::constants::{MEDICINES_FIELD, TEMP_FILE_EXTENSION};
use crate::error::StorageError;
use crate::CoreConfig;
use med_types::{name_key, MedicineName, Price};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// One record as it appears on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredMedicine {
    /// `None` when the field is absent; an explicit `null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Value>,
    /// Fields this service does not understand, preserved across rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl StoredMedicine {
    pub fn new(name: &MedicineName, price: Price) -> Self {
        Self {
            name: Some(Value::String(name.as_str().to_owned())),
            price: Some(Value::from(price.value())),
            extra: Map::new(),
        }
    }

    /// The record name, if it is a string.
    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    /// The normalised key of this record. Records without a usable name get the empty key.
    pub fn key(&self) -> String {
        self.name_str().map(name_key).unwrap_or_default()
    }

    /// The price, if it is a JSON number.
    pub fn numeric_price(&self) -> Option<f64> {
        match self.price.as_ref()? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn set_name(&mut self, name: &MedicineName) {
        self.name = Some(Value::String(name.as_str().to_owned()));
    }

    pub fn set_price(&mut self, price: Price) {
        self.price = Some(Value::from(price.value()));
    }
}

/// The full persisted collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub medicines: Vec<StoredMedicine>,
    /// Top-level fields other than `medicines`, preserved across rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// File-backed store for the medicines document.
#[derive(Debug, Clone)]
pub struct MedicineStore {
    path: PathBuf,
}

impl MedicineStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            path: cfg.data_file().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the current document.
    ///
    /// # Errors
    /// Returns `StorageError` if:
    /// - the file does not exist or cannot be read,
    /// - the content is not valid JSON,
    /// - the top level is not an object or `medicines` is absent or not a sequence,
    /// - any entry in `medicines` is not an object.
    pub fn read(&self) -> Result<Document, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Missing(self.path.clone()))
            }
            Err(e) => return Err(StorageError::FileRead(e)),
        };

        let raw: Value = serde_json::from_str(&contents).map_err(StorageError::Deserialization)?;
        let mut object = match raw {
            Value::Object(object) => object,
            _ => {
                return Err(StorageError::InvalidShape(
                    "top level is not a JSON object".into(),
                ))
            }
        };

        let entries = match object.remove(MEDICINES_FIELD) {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(StorageError::InvalidShape(format!(
                    "'{MEDICINES_FIELD}' is not a sequence"
                )))
            }
            None => {
                return Err(StorageError::InvalidShape(format!(
                    "missing '{MEDICINES_FIELD}' field"
                )))
            }
        };

        let mut medicines = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                return Err(StorageError::InvalidShape(format!(
                    "record {index} is not an object"
                )));
            }
            let record: StoredMedicine =
                serde_json::from_value(entry).map_err(StorageError::Deserialization)?;
            medicines.push(record);
        }

        Ok(Document {
            medicines,
            extra: object,
        })
    }

    /// Replaces the persisted document with `document`.
    ///
    /// The new content is written to a sibling temporary file, flushed to disk and renamed over
    /// the data file, so readers see either the old document or the new one.
    ///
    /// # Errors
    /// Returns `StorageError::FileWrite` if the temporary file cannot be written or renamed.
    /// The previous data file is left untouched in that case.
    pub fn write(&self, document: &Document) -> Result<(), StorageError> {
        let mut bytes = serde_json::to_vec_pretty(document).map_err(StorageError::Serialization)?;
        bytes.push(b'\n');

        let tmp_path = self.temp_path();
        let result = (|| {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        "failed to remove temporary file {}: {}",
                        tmp_path.display(),
                        cleanup
                    );
                }
            }
            return Err(StorageError::FileWrite(e));
        }

        Ok(())
    }

    /// Creates an empty document if the data file does not exist yet.
    ///
    /// Returns `true` when a new file was created.
    pub fn initialise_if_missing(&self) -> Result<bool, StorageError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.write(&Document::default())?;
        tracing::info!("created empty data file at {}", self.path.display());
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        file_name.push(".");
        file_name.push(TEMP_FILE_EXTENSION);
        self.path.with_file_name(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> MedicineStore {
        let cfg = CoreConfig::new(temp.path().join("data.json")).unwrap();
        MedicineStore::new(&cfg)
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(matches!(store.read(), Err(StorageError::Missing(_))));
    }

    #[test]
    fn test_read_corrupt_json_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), "{ \"medicines\": [").unwrap();

        assert!(matches!(
            store.read(),
            Err(StorageError::Deserialization(_))
        ));
    }

    #[test]
    fn test_read_rejects_wrong_shapes() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        for contents in [
            "[]",
            "{}",
            "{\"medicines\": null}",
            "{\"medicines\": {\"name\": \"x\"}}",
            "{\"medicines\": [1, 2]}",
        ] {
            fs::write(store.path(), contents).unwrap();
            assert!(
                matches!(store.read(), Err(StorageError::InvalidShape(_))),
                "expected shape error for {contents}"
            );
        }
    }

    #[test]
    fn test_read_keeps_malformed_records() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(
            store.path(),
            r#"{"medicines": [{"name": "A", "price": 10}, {"price": "x"}, {"name": 5}]}"#,
        )
        .unwrap();

        let doc = store.read().unwrap();
        assert_eq!(doc.medicines.len(), 3);
        assert_eq!(doc.medicines[0].name_str(), Some("A"));
        assert_eq!(doc.medicines[0].numeric_price(), Some(10.0));
        assert_eq!(doc.medicines[1].key(), "");
        assert_eq!(doc.medicines[1].numeric_price(), None);
        assert_eq!(doc.medicines[2].name_str(), None);
    }

    #[test]
    fn test_write_then_read_preserves_unknown_fields() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(
            store.path(),
            r#"{"version": 2, "medicines": [{"name": "A", "price": 1.5, "stock": 4}]}"#,
        )
        .unwrap();

        let doc = store.read().unwrap();
        store.write(&doc).unwrap();

        let reread = store.read().unwrap();
        assert_eq!(reread, doc);
        assert_eq!(reread.extra.get("version"), Some(&Value::from(2)));
        assert_eq!(
            reread.medicines[0].extra.get("stock"),
            Some(&Value::from(4))
        );
    }

    #[test]
    fn test_write_then_read_keeps_null_fields() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(
            store.path(),
            r#"{"medicines": [{"name": null, "price": null}, {"name": "B"}]}"#,
        )
        .unwrap();

        let doc = store.read().unwrap();
        assert_eq!(doc.medicines[0].name, Some(Value::Null));
        assert_eq!(doc.medicines[0].price, Some(Value::Null));
        assert_eq!(doc.medicines[1].price, None);
        store.write(&doc).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"medicines": [{"name": null, "price": null}, {"name": "B"}]})
        );
    }

    #[test]
    fn test_write_is_pretty_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let name = MedicineName::new("Aspirin").unwrap();
        let doc = Document {
            medicines: vec![StoredMedicine::new(&name, Price::new(5.5).unwrap())],
            extra: Map::new(),
        };

        store.write(&doc).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("\n  \"medicines\": ["));
        assert!(!store.temp_path().exists());
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), r#"{"medicines": []}"#).unwrap();

        // A directory squatting on the temporary path makes the write fail.
        fs::create_dir(store.temp_path()).unwrap();
        let name = MedicineName::new("Aspirin").unwrap();
        let doc = Document {
            medicines: vec![StoredMedicine::new(&name, Price::new(1.0).unwrap())],
            extra: Map::new(),
        };

        assert!(matches!(store.write(&doc), Err(StorageError::FileWrite(_))));
        assert!(store.read().unwrap().medicines.is_empty());
    }

    #[test]
    fn test_initialise_if_missing() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(store.initialise_if_missing().unwrap());
        assert!(store.read().unwrap().medicines.is_empty());
        assert!(!store.initialise_if_missing().unwrap());
    }

    #[test]
    fn test_temp_path_appends_extension() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert_eq!(store.temp_path(), temp.path().join("data.json.tmp"));
    }
}
