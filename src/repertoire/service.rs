use super::{NewSong, RepertoireStore, Song, SongPatch, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepertoireError {
    #[error("Missing required fields: title, artist and key must all be provided")]
    MissingRequiredField,

    #[error("At least one of title, artist or key must be provided")]
    NoFieldsToUpdate,

    #[error("Song {0} not found")]
    SongNotFound(u64),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Applies the validation and mutation rules of the repertoire. Holds no
/// state of its own: every operation re-reads the whole document from the
/// store, mutates an in-memory copy and writes the whole document back.
/// Validation failures short-circuit before any storage access, and a
/// miss on lookup short-circuits before any write, so a failed operation
/// never persists anything.
pub struct RepertoireService {
    store: Box<dyn RepertoireStore>,
}

impl RepertoireService {
    pub fn new(store: Box<dyn RepertoireStore>) -> RepertoireService {
        RepertoireService { store }
    }

    pub fn list(&self) -> Result<Vec<Song>, RepertoireError> {
        Ok(self.store.load()?)
    }

    pub fn create(&self, draft: NewSong) -> Result<Song, RepertoireError> {
        let (title, artist, key) = draft
            .into_required_fields()
            .ok_or(RepertoireError::MissingRequiredField)?;

        let mut songs = self.store.load()?;

        // The id is recomputed from the current maximum on every creation,
        // so deleting the highest id and creating again reuses that id.
        let id = songs.iter().map(|s| s.id).max().map_or(1, |max| max + 1);

        let song = Song {
            id,
            title,
            artist,
            key,
        };
        songs.push(song.clone());
        self.store.save(&songs)?;

        Ok(song)
    }

    pub fn update(&self, id: u64, patch: SongPatch) -> Result<Song, RepertoireError> {
        let patch = patch.normalized();
        if patch.is_empty() {
            return Err(RepertoireError::NoFieldsToUpdate);
        }

        let mut songs = self.store.load()?;
        let song = songs
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepertoireError::SongNotFound(id))?;

        patch.apply_to(song);
        let updated = song.clone();
        self.store.save(&songs)?;

        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> Result<(), RepertoireError> {
        let mut songs = self.store.load()?;
        let index = songs
            .iter()
            .position(|s| s.id == id)
            .ok_or(RepertoireError::SongNotFound(id))?;

        songs.remove(index);
        self.store.save(&songs)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryRepertoireStore {
        songs: Mutex<Vec<Song>>,
        fail_saves: bool,
    }

    impl RepertoireStore for InMemoryRepertoireStore {
        fn load(&self) -> Result<Vec<Song>, StoreError> {
            Ok(self.songs.lock().unwrap().clone())
        }

        fn save(&self, songs: &[Song]) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Write(anyhow::anyhow!("disk full")));
            }
            *self.songs.lock().unwrap() = songs.to_vec();
            Ok(())
        }
    }

    fn empty_service() -> RepertoireService {
        RepertoireService::new(Box::<InMemoryRepertoireStore>::default())
    }

    fn draft(title: &str, artist: &str, key: &str) -> NewSong {
        NewSong {
            title: Some(title.to_owned()),
            artist: Some(artist.to_owned()),
            key: Some(key.to_owned()),
        }
    }

    #[test]
    fn creates_with_id_one_on_empty_repertoire() {
        let service = empty_service();

        let song = service.create(draft("Imagine", "Lennon", "C")).unwrap();

        assert_eq!(song.id, 1);
        assert_eq!(song.title, "Imagine");
        assert_eq!(service.list().unwrap(), vec![song]);
    }

    #[test]
    fn assigns_max_id_plus_one() {
        let service = empty_service();

        service.create(draft("Imagine", "Lennon", "C")).unwrap();
        let second = service.create(draft("Yesterday", "Beatles", "F")).unwrap();

        assert_eq!(second.id, 2);
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn reuses_the_highest_id_after_deleting_it() {
        let service = empty_service();

        service.create(draft("Imagine", "Lennon", "C")).unwrap();
        service.create(draft("Yesterday", "Beatles", "F")).unwrap();
        service.delete(2).unwrap();

        let song = service.create(draft("Hey Jude", "Beatles", "G")).unwrap();
        assert_eq!(song.id, 2);
    }

    #[test]
    fn reuses_id_one_after_emptying_a_lower_slot() {
        let service = empty_service();

        service.create(draft("Imagine", "Lennon", "C")).unwrap();
        service.create(draft("Yesterday", "Beatles", "F")).unwrap();
        service.delete(1).unwrap();
        service.delete(2).unwrap();

        let song = service.create(draft("Hey Jude", "Beatles", "G")).unwrap();
        assert_eq!(song.id, 1);
    }

    #[test]
    fn create_with_missing_field_touches_no_storage() {
        let store = Box::<InMemoryRepertoireStore>::default();
        let service = RepertoireService::new(store);

        let result = service.create(NewSong {
            title: Some("Imagine".to_owned()),
            artist: None,
            key: Some("C".to_owned()),
        });

        assert!(matches!(
            result,
            Err(RepertoireError::MissingRequiredField)
        ));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn create_with_empty_field_is_rejected() {
        let service = empty_service();

        let result = service.create(draft("Imagine", "", "C"));

        assert!(matches!(
            result,
            Err(RepertoireError::MissingRequiredField)
        ));
    }

    #[test]
    fn update_changes_only_the_supplied_fields() {
        let service = empty_service();
        service.create(draft("Imagine", "Lennon", "C")).unwrap();

        let updated = service
            .update(
                1,
                SongPatch {
                    title: None,
                    artist: None,
                    key: Some("G".to_owned()),
                },
            )
            .unwrap();

        assert_eq!(updated.key, "G");
        assert_eq!(updated.title, "Imagine");
        assert_eq!(service.list().unwrap(), vec![updated]);
    }

    #[test]
    fn update_without_fields_is_rejected_before_loading() {
        let store = Box::new(InMemoryRepertoireStore {
            fail_saves: true,
            ..Default::default()
        });
        let service = RepertoireService::new(store);

        // With a store that fails every save, only a short-circuit
        // before storage access can produce a validation error here.
        let result = service.update(1, SongPatch::default());
        assert!(matches!(result, Err(RepertoireError::NoFieldsToUpdate)));
    }

    #[test]
    fn update_on_unknown_id_persists_nothing() {
        let store = Box::new(InMemoryRepertoireStore {
            fail_saves: true,
            ..Default::default()
        });
        let service = RepertoireService::new(store);

        let result = service.update(
            7,
            SongPatch {
                title: Some("Let It Be".to_owned()),
                artist: None,
                key: None,
            },
        );
        assert!(matches!(result, Err(RepertoireError::SongNotFound(7))));
    }

    #[test]
    fn delete_on_unknown_id_persists_nothing() {
        let store = Box::new(InMemoryRepertoireStore {
            fail_saves: true,
            ..Default::default()
        });
        let service = RepertoireService::new(store);

        assert!(matches!(
            service.delete(7),
            Err(RepertoireError::SongNotFound(7))
        ));
    }

    #[test]
    fn delete_removes_exactly_one_song() {
        let service = empty_service();
        service.create(draft("Imagine", "Lennon", "C")).unwrap();
        service.create(draft("Yesterday", "Beatles", "F")).unwrap();

        service.delete(1).unwrap();

        let songs = service.list().unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, 2);
    }

    #[test]
    fn storage_write_failures_surface_as_storage_errors() {
        let store = Box::new(InMemoryRepertoireStore {
            fail_saves: true,
            ..Default::default()
        });
        let service = RepertoireService::new(store);

        let result = service.create(draft("Imagine", "Lennon", "C"));
        assert!(matches!(
            result,
            Err(RepertoireError::Storage(StoreError::Write(_)))
        ));
    }
}
