use super::SlotBackend;
use crate::error::{QuireError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsSlot {
    root: PathBuf,
}

impl FsSlot {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl SlotBackend for FsSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuireError::Io(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let write_err = |e: std::io::Error| QuireError::SlotWrite {
            key: key.to_string(),
            reason: e.to_string(),
        };

        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(write_err)?;
        }

        // Atomic write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp_path, self.slot_path(key)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }

        Ok(())
    }

    fn location(&self, key: &str) -> String {
        self.slot_path(key).display().to_string()
    }
}
