use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::app_error::{SyncError, SyncResult};
use crate::models::StateRecord;

pub type StateMap = BTreeMap<String, StateRecord>;

/// Shapes a state file may take on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum StateFormat {
    /// Oldest layout: path to article id.
    Ids(BTreeMap<String, i64>),
    Records(StateMap),
}

impl From<StateFormat> for StateMap {
    fn from(value: StateFormat) -> Self {
        match value {
            StateFormat::Ids(ids) => ids
                .into_iter()
                .map(|(path, id)| (path, StateRecord::with_id(id)))
                .collect(),
            StateFormat::Records(records) => records,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StateStore {
    records: StateMap,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(content: &[u8]) -> SyncResult<Self> {
        let format: StateFormat = serde_json::from_slice(content).map_err(|_| {
            SyncError::Parse("not a map of ids or a map of state records".to_string())
        })?;
        Ok(Self {
            records: format.into(),
        })
    }

    /// Reads a state file. A file that does not exist yet is an empty store.
    pub fn load_file(path: &Path) -> SyncResult<Self> {
        match fs::read(path) {
            Ok(content) => Self::load(&content).map_err(|e| match e {
                SyncError::Parse(msg) => SyncError::Parse(format!("{}: {msg}", path.display())),
                other => other,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(SyncError::io(path, e)),
        }
    }

    /// Overwrites `path` with the record format. Nothing is rolled back if the
    /// write fails halfway.
    pub fn persist(&self, path: &Path) -> SyncResult<()> {
        let file = fs::File::create(path).map_err(|e| SyncError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        self.records
            .serialize(&mut serializer)
            .map_err(|e| SyncError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        writer.write_all(b"\n").map_err(|e| SyncError::io(path, e))?;
        writer.flush().map_err(|e| SyncError::io(path, e))?;
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&StateRecord> {
        self.records.get(path)
    }

    pub fn set(&mut self, path: impl Into<String>, record: StateRecord) {
        self.records.insert(path.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StateRecord> {
        self.records.iter()
    }
}
