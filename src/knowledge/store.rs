//! Durable record storage
//!
//! The file format is a flat, headerless run of 32-byte [`RawRecord`]s.
//! Saving writes the full set to a sibling temp file, syncs it, then renames
//! it over the live file, so a crash never leaves a half-written store.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::error::{Result, TrainerError};
use crate::knowledge::observation::{Observation, RawRecord, RECORD_SIZE};

/// Where the knowledge base lives between sessions
pub trait RecordStore {
    /// All stored records; empty when nothing has been stored yet
    fn load_all(&mut self) -> Vec<Observation>;

    /// Replace the stored set with `records`
    fn save_all(&mut self, records: &[Observation]) -> Result<()>;
}

/// Knowledge store backed by a single binary file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "knowledge".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_temp(&self, temp: &Path, records: &[Observation]) -> io::Result<()> {
        let raw: Vec<RawRecord> = records.iter().map(RawRecord::from).collect();
        let mut file = File::create(temp)?;
        file.write_all(bytemuck::cast_slice::<RawRecord, u8>(&raw))?;
        file.sync_all()
    }

    fn replace(&self, temp: &Path) -> io::Result<()> {
        match fs::rename(temp, &self.path) {
            Ok(()) => Ok(()),
            // Some filesystems refuse to rename over an existing file
            Err(e) if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::AlreadyExists) => {
                warn!(path = ?self.path, error = %e, "atomic replace refused, falling back to remove + rename");
                fs::remove_file(&self.path)?;
                fs::rename(temp, &self.path)
            }
            Err(e) => Err(e),
        }
    }
}

/// Decode a store image, skipping malformed records and any trailing fragment
pub fn decode_records(bytes: &[u8]) -> Vec<Observation> {
    let chunks = bytes.chunks_exact(RECORD_SIZE);
    if !chunks.remainder().is_empty() {
        warn!(trailing = chunks.remainder().len(), "ignoring partial trailing record");
    }

    let mut records = Vec::with_capacity(bytes.len() / RECORD_SIZE);
    for (index, chunk) in chunks.enumerate() {
        let raw: RawRecord = bytemuck::pod_read_unaligned(chunk);
        match raw.to_observation() {
            Some(obs) => records.push(obs),
            None => warn!(index, ?raw, "skipping malformed record"),
        }
    }
    records
}

impl RecordStore for FileStore {
    fn load_all(&mut self) -> Vec<Observation> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let records = decode_records(&bytes);
                info!(path = ?self.path, count = records.len(), "loaded knowledge base");
                records
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = ?self.path, "no knowledge base yet, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "knowledge base unreadable, starting empty");
                Vec::new()
            }
        }
    }

    fn save_all(&mut self, records: &[Observation]) -> Result<()> {
        let temp = self.temp_path();

        if let Err(e) = self.write_temp(&temp, records) {
            let _ = fs::remove_file(&temp);
            return Err(TrainerError::Persist { path: self.path.clone(), source: e });
        }

        if let Err(e) = self.replace(&temp) {
            let _ = fs::remove_file(&temp);
            return Err(TrainerError::Persist { path: self.path.clone(), source: e });
        }

        debug!(path = ?self.path, count = records.len(), "knowledge base saved");
        Ok(())
    }
}

/// In-memory store for tests and embedding hosts
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub records: Vec<Observation>,
    /// Make the next saves fail, to exercise rollback
    pub fail_saves: bool,
    pub save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Observation>) -> Self {
        Self { records, ..Self::default() }
    }
}

impl RecordStore for MemoryStore {
    fn load_all(&mut self) -> Vec<Observation> {
        self.records.clone()
    }

    fn save_all(&mut self, records: &[Observation]) -> Result<()> {
        if self.fail_saves {
            return Err(TrainerError::Persist {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(ErrorKind::Other, "save disabled"),
            });
        }
        self.records = records.to_vec();
        self.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutation::Permutation;

    fn sample() -> Vec<Observation> {
        let mut a = Permutation::empty();
        a.set(0, 12);
        let mut b = Permutation::empty();
        b.set(23, 32);
        b.set(5, 1);
        vec![Observation::new(a, 1, 3), Observation::new(b, 5, 9)]
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("absent.bin"));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.bin");
        let mut store = FileStore::new(&path);

        store.save_all(&sample()).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 2 * RECORD_SIZE as u64);
        assert!(!store.temp_path().exists());

        let mut reopened = FileStore::new(&path);
        assert_eq!(reopened.load_all(), sample());
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("kb.bin"));
        store.save_all(&sample()).unwrap();
        store.save_all(&sample()[..1]).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_native_byte_layout() {
        let records = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.bin");
        FileStore::new(&path).save_all(&records[..1]).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes[0], 12);
        assert_eq!(&bytes[24..28], &1i32.to_ne_bytes());
        assert_eq!(&bytes[28..32], &3i32.to_ne_bytes());
    }

    #[test]
    fn test_trailing_fragment_and_bad_records_skipped() {
        let records = sample();
        let mut raw: Vec<RawRecord> = records.iter().map(RawRecord::from).collect();
        raw[1].denominator = 0;
        let mut bytes = bytemuck::cast_slice::<RawRecord, u8>(&raw).to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);

        let decoded = decode_records(&bytes);
        assert_eq!(decoded, vec![records[0]]);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nope").join("kb.bin"));
        assert!(matches!(store.save_all(&sample()), Err(TrainerError::Persist { .. })));
    }

    #[test]
    fn test_failed_replace_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.bin");
        // A non-empty directory in the way can be neither renamed over nor removed
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.save_all(&sample()), Err(TrainerError::Persist { .. })));
        assert!(!store.temp_path().exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_memory_store_failure_switch() {
        let mut store = MemoryStore::new();
        store.fail_saves = true;
        assert!(store.save_all(&sample()).is_err());
        assert!(store.records.is_empty());
        store.fail_saves = false;
        store.save_all(&sample()).unwrap();
        assert_eq!(store.save_count, 1);
    }
}
