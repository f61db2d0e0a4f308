mod file_store;
mod service;
mod song;
mod store;

pub use file_store::FileRepertoireStore;
pub use service::{RepertoireError, RepertoireService};
pub use song::{NewSong, Song, SongPatch};
pub use store::{RepertoireStore, StoreError};
