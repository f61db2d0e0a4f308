use super::{RepertoireStore, Song, StoreError};
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Stores the repertoire as a single JSON array in a file on disk.
/// Saves go through a temp file in the same directory followed by a
/// rename, so a concurrent reader never observes a half-written file.
pub struct FileRepertoireStore {
    file_path: PathBuf,
}

impl FileRepertoireStore {
    pub fn new(file_path: PathBuf) -> FileRepertoireStore {
        FileRepertoireStore { file_path }
    }

    fn read_songs(&self) -> Result<Vec<Song>> {
        let mut file = File::open(&self.file_path)
            .with_context(|| format!("Error opening {}", self.file_path.display()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        serde_json::from_str(&content)
            .with_context(|| format!("Error parsing {}", self.file_path.display()))
    }

    fn write_songs(&self, songs: &[Song]) -> Result<()> {
        let json_string = serde_json::to_string_pretty(songs)?;

        let dir = self.file_path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp_file = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Error creating temp file in {}", dir.display()))?;
        tmp_file.write_all(json_string.as_bytes())?;
        tmp_file
            .persist(&self.file_path)
            .with_context(|| format!("Error replacing {}", self.file_path.display()))?;
        Ok(())
    }
}

impl RepertoireStore for FileRepertoireStore {
    fn load(&self) -> Result<Vec<Song>, StoreError> {
        self.read_songs().map_err(StoreError::Read)
    }

    fn save(&self, songs: &[Song]) -> Result<(), StoreError> {
        self.write_songs(songs).map_err(StoreError::Write)
    }
}
