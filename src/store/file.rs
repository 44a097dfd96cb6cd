//! File-backed store: one JSON file per record inside a data directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{HABITS_KEY, Snapshot, Store, USER_KEY, decode_record, encode_record};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the data directory. It is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.record_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.record_path(key).with_extension("json.tmp")
    }

    /// Write `content` to the record's temp file and sync it.
    fn stage(&self, key: &str, content: &str) -> Result<()> {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.temp_path(key))?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;
        Ok(())
    }

    /// Move a staged temp file over the record.
    fn commit(&self, key: &str) -> Result<()> {
        std::fs::rename(self.temp_path(key), self.record_path(key))?;
        Ok(())
    }

    fn discard(&self, key: &str) {
        let _ = std::fs::remove_file(self.temp_path(key));
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Snapshot> {
        let habits = self.read(HABITS_KEY)?;
        let user = self.read(USER_KEY)?;
        Ok(Snapshot {
            habits: decode_record(HABITS_KEY, habits.as_deref()),
            user: decode_record(USER_KEY, user.as_deref()),
        })
    }

    /// Stage every record before replacing any, so a failed write leaves
    /// the previous pair on disk.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let mut records = Vec::with_capacity(2);
        if let Some(ref habits) = snapshot.habits {
            records.push((HABITS_KEY, encode_record(habits)?));
        }
        if let Some(ref user) = snapshot.user {
            records.push((USER_KEY, encode_record(user)?));
        }

        for (key, content) in &records {
            if let Err(e) = self.stage(key, content) {
                for (key, _) in &records {
                    self.discard(key);
                }
                return Err(e);
            }
        }
        for (key, _) in &records {
            self.commit(key)?;
        }
        Ok(())
    }
}
