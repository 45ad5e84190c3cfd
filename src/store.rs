//! Durable per-tournament store with all-or-nothing writes.
//!
//! Tournaments live in memory; when a data directory is configured every committed write is
//! also saved as `<id>.json` (written to a temp file, then renamed over the old snapshot).

use crate::models::{SchedulerError, Tournament, TournamentId};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

struct Entry {
    tournament: RwLock<Tournament>,
    /// Held for the whole of a write so writers to one tournament queue up.
    writer: Mutex<()>,
}

impl Entry {
    fn new(tournament: Tournament) -> Arc<Self> {
        Arc::new(Self {
            tournament: RwLock::new(tournament),
            writer: Mutex::new(()),
        })
    }
}

fn lock_error() -> SchedulerError {
    SchedulerError::Storage("lock error".into())
}

pub struct TournamentStore {
    entries: RwLock<HashMap<TournamentId, Arc<Entry>>>,
    data_dir: Option<PathBuf>,
}

impl TournamentStore {
    /// Store without a data directory; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            data_dir: None,
        }
    }

    /// Store backed by `dir`. Existing snapshots are loaded.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| SchedulerError::Storage(e.to_string()))?;
        let mut entries = HashMap::new();
        let listing = fs::read_dir(&dir).map_err(|e| SchedulerError::Storage(e.to_string()))?;
        for item in listing {
            let path = item.map_err(|e| SchedulerError::Storage(e.to_string()))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read(&path).map_err(|e| SchedulerError::Storage(e.to_string()))?;
            let tournament: Tournament = serde_json::from_slice(&raw)
                .map_err(|e| SchedulerError::Storage(format!("{}: {}", path.display(), e)))?;
            entries.insert(tournament.id, Entry::new(tournament));
        }
        log::info!("Loaded {} tournament(s) from {}", entries.len(), dir.display());
        Ok(Self {
            entries: RwLock::new(entries),
            data_dir: Some(dir),
        })
    }

    fn entry(&self, id: TournamentId) -> Result<Arc<Entry>, SchedulerError> {
        let entries = self.entries.read().map_err(|_| lock_error())?;
        entries.get(&id).cloned().ok_or(SchedulerError::TournamentNotFound(id))
    }

    fn persist(&self, tournament: &Tournament) -> Result<(), SchedulerError> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(tournament).map_err(|e| SchedulerError::Storage(e.to_string()))?;
        let target = dir.join(format!("{}.json", tournament.id));
        let tmp = dir.join(format!("{}.json.tmp", tournament.id));
        fs::write(&tmp, json).map_err(|e| SchedulerError::Storage(e.to_string()))?;
        fs::rename(&tmp, &target).map_err(|e| SchedulerError::Storage(e.to_string()))
    }

    /// Add a tournament. Fails if the snapshot cannot be written.
    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, SchedulerError> {
        self.persist(&tournament)?;
        let id = tournament.id;
        let mut entries = self.entries.write().map_err(|_| lock_error())?;
        entries.insert(id, Entry::new(tournament));
        Ok(id)
    }

    /// Delete a tournament and its snapshot.
    pub fn remove(&self, id: TournamentId) -> Result<(), SchedulerError> {
        let mut entries = self.entries.write().map_err(|_| lock_error())?;
        entries.remove(&id).ok_or(SchedulerError::TournamentNotFound(id))?;
        if let Some(dir) = &self.data_dir {
            let path = dir.join(format!("{}.json", id));
            if path.exists() {
                fs::remove_file(path).map_err(|e| SchedulerError::Storage(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Ids of every stored tournament, sorted.
    pub fn ids(&self) -> Result<Vec<TournamentId>, SchedulerError> {
        let entries = self.entries.read().map_err(|_| lock_error())?;
        let mut ids: Vec<TournamentId> = entries.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    /// Run `f` against the committed state. Never sees a half-applied write.
    pub fn read<R>(&self, id: TournamentId, f: impl FnOnce(&Tournament) -> R) -> Result<R, SchedulerError> {
        let entry = self.entry(id)?;
        let guard = entry.tournament.read().map_err(|_| lock_error())?;
        Ok(f(&guard))
    }

    /// Copy of the committed state.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, SchedulerError> {
        self.read(id, Tournament::clone)
    }

    /// Apply `f` to a draft copy and commit it only if `f` and the snapshot write both succeed.
    ///
    /// Writers to the same tournament are serialized; readers keep seeing the previous state
    /// until the draft is swapped in.
    pub fn transaction<R>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> Result<R, SchedulerError>,
    ) -> Result<R, SchedulerError> {
        let entry = self.entry(id)?;
        let _writer = entry.writer.lock().map_err(|_| lock_error())?;
        let mut draft = entry.tournament.read().map_err(|_| lock_error())?.clone();
        let out = f(&mut draft)?;
        self.persist(&draft)?;
        *entry.tournament.write().map_err(|_| lock_error())? = draft;
        Ok(out)
    }
}
