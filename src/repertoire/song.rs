use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub key: String,
}

/// Incoming payload for a song creation, all fields still unchecked.
#[derive(Debug, Default, Deserialize)]
pub struct NewSong {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Partial update payload. Each field is independently present-or-absent;
/// absent fields are left unchanged. A field supplied as an empty string
/// counts as absent, there is no way to clear a field through a patch.
#[derive(Debug, Default, Deserialize)]
pub struct SongPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl SongPatch {
    pub fn normalized(self) -> SongPatch {
        SongPatch {
            title: non_empty(self.title),
            artist: non_empty(self.artist),
            key: non_empty(self.key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.key.is_none()
    }

    pub fn apply_to(self, song: &mut Song) {
        if let Some(title) = self.title {
            song.title = title;
        }
        if let Some(artist) = self.artist {
            song.artist = artist;
        }
        if let Some(key) = self.key {
            song.key = key;
        }
    }
}

impl NewSong {
    /// Returns (title, artist, key) if all three are present and non-empty.
    pub fn into_required_fields(self) -> Option<(String, String, String)> {
        Some((
            non_empty(self.title)?,
            non_empty(self.artist)?,
            non_empty(self.key)?,
        ))
    }
}
