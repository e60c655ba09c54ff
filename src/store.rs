//! Local preference store and the favorites structure kept in it.
//!
//! The store is a thin fail-soft layer over a string key/value backend:
//! reads that fail for any reason (missing key, corrupt JSON, backend
//! unavailable) yield the caller's default, and failed writes are dropped.
//! Failures are logged but never surfaced.
//!
//! Favorites are persisted under a single key as a JSON object mapping the
//! item kind (`source_codes` / `blog_posts`) to an ordered list of ids.  The
//! object is decoded loosely: a kind whose list is missing, `null` or not an
//! array counts as empty, and keys this program does not know are written
//! back untouched.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::source::{ItemId, ItemKind};

/// Key the favorites structure is stored under.
pub const FAVORITES_KEY: &str = "favorites";

/// A persistent string key/value store.
pub trait KeyValueBackend: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) the backing directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write-then-rename so a crash never leaves a half-written file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// In-process backend.  Used in tests and when no data directory is usable.
///
/// An *unavailable* backend rejects every operation, mirroring a store that
/// has been disabled.
#[derive(Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: true,
        }
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Favorited ids per item kind, in the order they were added.
pub type Favorites = BTreeMap<ItemKind, Vec<ItemId>>;

/// The favorites object exactly as stored, unknown keys included.
type StoredFavorites = Map<String, Value>;

/// Ids listed for `kind`; anything but an array reads as empty and
/// malformed entries are skipped.
fn stored_ids(stored: &StoredFavorites, kind: ItemKind) -> Vec<ItemId> {
    match stored.get(&kind.to_string()) {
        Some(Value::Array(ids)) => ids.iter().filter_map(|id| ItemId::try_from(id).ok()).collect(),
        _ => Vec::new(),
    }
}

/// Fail-soft JSON layer over a [`KeyValueBackend`].
pub struct PreferenceStore {
    backend: Box<dyn KeyValueBackend>,
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Open a file-backed store in `dir`, falling back to memory if the
    /// directory cannot be created.
    pub fn open_or_memory(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match FileBackend::open(&dir) {
            Ok(backend) => Self::new(Box::new(backend)),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "preference store unavailable, favorites will not persist");
                Self::new(Box::new(MemoryBackend::new()))
            }
        }
    }

    /// Read and decode `key`, returning `default` on any failure.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "preference read failed");
                return default;
            }
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => value,
            // A stored `null` reads as the default.
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt preference");
                default
            }
        }
    }

    /// Encode and persist `value` under `key`; failures are dropped.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| self.backend.set(key, &raw));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "preference write dropped");
        }
    }

    fn stored_favorites(&self) -> StoredFavorites {
        self.read(FAVORITES_KEY, StoredFavorites::new())
    }

    /// Current favorites snapshot.  Kinds without favorites are absent.
    pub fn favorites(&self) -> Favorites {
        let stored = self.stored_favorites();
        ItemKind::ALL
            .into_iter()
            .map(|kind| (kind, stored_ids(&stored, kind)))
            .filter(|(_, ids)| !ids.is_empty())
            .collect()
    }

    /// Flip membership of `id` in the favorites of `kind`.
    ///
    /// Returns the resulting membership (`true` = now favorited).  A malformed
    /// id is a no-op returning `false`.  The updated structure is persisted
    /// immediately.
    pub fn toggle_favorite<I: TryInto<ItemId>>(&mut self, id: I, kind: ItemKind) -> bool {
        let Ok(id) = id.try_into() else {
            return false;
        };

        let mut stored = self.stored_favorites();
        let mut ids = stored_ids(&stored, kind);
        let adding = match ids.iter().position(|&fav| fav == id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id);
                true
            }
        };
        let ids: Vec<Value> = ids.into_iter().map(|id| Value::from(id.0)).collect();
        stored.insert(kind.to_string(), Value::Array(ids));
        self.write(FAVORITES_KEY, &stored);

        tracing::debug!(%kind, %id, favorited = adding, "toggled favorite");
        adding
    }

    /// Whether `id` is favorited for `kind`; `false` for malformed ids.
    #[cfg(test)]
    pub fn is_favorited<I: TryInto<ItemId>>(&self, id: I, kind: ItemKind) -> bool {
        let Ok(id) = id.try_into() else {
            return false;
        };
        is_member(&self.favorites(), id, kind)
    }
}

/// Membership test against an already-loaded snapshot.
pub fn is_member(favorites: &Favorites, id: ItemId, kind: ItemKind) -> bool {
    favorites.get(&kind).is_some_and(|ids| ids.contains(&id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
