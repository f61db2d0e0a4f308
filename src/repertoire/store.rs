use super::Song;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not read the repertoire: {0}")]
    Read(#[source] anyhow::Error),

    #[error("Could not persist the repertoire: {0}")]
    Write(#[source] anyhow::Error),
}

/// Whole-document persistence boundary for the repertoire. Every call
/// transfers the entire collection, there is no partial or streaming
/// access. Implementations must preserve the order of the songs they
/// are given across a save/load cycle.
pub trait RepertoireStore: Send {
    fn load(&self) -> Result<Vec<Song>, StoreError>;
    fn save(&self, songs: &[Song]) -> Result<(), StoreError>;
}
