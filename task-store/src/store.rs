use crate::{Document, StoreError};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Flat directory of JSON documents, one file per name.
///
/// There is no locking here: two writers racing on the same file end with
/// whichever finished last. Callers that share a store across requests are
/// expected to serialize saves themselves.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

/// Outcome of [`DocumentStore::save_all`].
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Vec<(String, StoreError)>,
}

impl SaveReport {
    /// Returns true if every key was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl DocumentStore {
    /// Opens a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(DocumentStore { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads every known document.
    ///
    /// A document whose file does not exist is left out of the result
    /// entirely. One that exists but can't be read or parsed comes back as an
    /// empty array, and the failure is logged.
    pub fn load_all(&self) -> Map<String, Value> {
        let mut data = Map::new();

        for doc in Document::ALL {
            let name = doc.as_str();
            match self.load(name) {
                Ok(Some(value)) => {
                    data.insert(name.to_string(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Error loading {}: {}", name, e);
                    data.insert(name.to_string(), Value::Array(Vec::new()));
                }
            }
        }

        data
    }

    /// Loads a single document by name. `Ok(None)` means the file is absent.
    pub fn load(&self, name: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    /// Writes every entry of `data` to its own file, overwriting prior content.
    ///
    /// Keys are not limited to the known documents. A failure on one key is
    /// logged and recorded in the report, and the remaining keys are still
    /// written.
    pub fn save_all(&self, data: &Map<String, Value>) -> SaveReport {
        let mut report = SaveReport::default();

        for (key, value) in data {
            match self.save(key, value) {
                Ok(()) => report.saved.push(key.clone()),
                Err(e) => {
                    log::error!("Error saving {}: {}", key, e);
                    report.failed.push((key.clone(), e));
                }
            }
        }

        report
    }

    /// Writes one document as indented JSON. Non-ASCII text is kept as is.
    pub fn save(&self, name: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    /// Resolves a document name to its file, refusing names that would leave
    /// the data directory.
    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let escapes = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.contains('\0');
        if escapes {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        Ok(self.data_dir.join(format!("{}.json", name)))
    }
}
