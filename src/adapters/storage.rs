use crate::core::codec::{self, MalformedPolicy, Record};
use crate::domain::model::RecordKind;
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Record files under one data directory: `books.txt` and `members.txt`.
///
/// Every save rewrites the whole file. With `atomic_writes` the new content
/// goes to a `.tmp` sibling first and is renamed over the target; otherwise
/// the target is truncated and written in place.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    on_malformed: MalformedPolicy,
    atomic_writes: bool,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            on_malformed: MalformedPolicy::default(),
            atomic_writes: false,
        }
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    pub fn with_atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.base_path.join(kind.file_name())
    }

    fn write_records<R: Record>(&self, path: &Path, records: &[R]) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = codec::writer(BufWriter::new(file));
        codec::encode_all(&mut writer, records)
    }
}

impl RecordStore for LocalStorage {
    fn load<R: Record>(&self) -> Result<Vec<R>> {
        let full_path = self.path_for(R::KIND);

        if !full_path.exists() {
            tracing::debug!("{} does not exist yet, no {}", full_path.display(), R::KIND.plural());
            return Ok(Vec::new());
        }

        let file = File::open(&full_path)?;
        let mut reader = codec::reader(BufReader::new(file));
        let records = codec::decode_all(&mut reader, self.on_malformed)?;

        tracing::debug!("Read {} {} from {}", records.len(), R::KIND.plural(), full_path.display());
        Ok(records)
    }

    fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        let full_path = self.path_for(R::KIND);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.atomic_writes {
            let tmp_path = full_path.with_extension("txt.tmp");
            self.write_records(&tmp_path, records)?;
            fs::rename(&tmp_path, &full_path)?;
        } else {
            self.write_records(&full_path, records)?;
        }

        tracing::debug!("Wrote {} {} to {}", records.len(), R::KIND.plural(), full_path.display());
        Ok(())
    }
}

/// Volatile store keeping the encoded lines in memory.
///
/// Lines pass through the same codec as the file store, so what a registry
/// sees after a reload matches what it would read back from disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lines: RefCell<HashMap<RecordKind, Vec<String>>>,
    on_malformed: MalformedPolicy,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Seeds raw lines for a record kind, as if read from a file.
    pub fn with_lines<I, L>(self, kind: RecordKind, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.lines
            .borrow_mut()
            .insert(kind, lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn lines(&self, kind: RecordKind) -> Vec<String> {
        self.lines.borrow().get(&kind).cloned().unwrap_or_default()
    }
}

impl RecordStore for MemoryStore {
    fn load<R: Record>(&self) -> Result<Vec<R>> {
        let text = self.lines(R::KIND).join("\n");
        let mut reader = codec::reader(text.as_bytes());
        codec::decode_all(&mut reader, self.on_malformed)
    }

    fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        let encoded = records
            .iter()
            .map(codec::encode_line)
            .collect::<Result<Vec<_>>>()?;
        self.lines.borrow_mut().insert(R::KIND, encoded);
        Ok(())
    }
}
