//! InMemoryVoteStore - BTreeMap-backed vote store for testing and embedding.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use event_emitter_rs::EventEmitter;
use tracing::warn;

use super::{Replaced, Vote, VoteCriteria, VoteDraft, VoteStore};
use crate::entity::EntityRef;
use crate::error::StorageError;

/// Event fired with the affected `EntityRef` whenever votes are created or deleted.
pub const VOTES_CHANGED: &str = "votes.changed";

/// In-memory vote store. Votes are kept as bitcode bytes keyed by id.
///
/// Change listeners run after the write lock is released, and every write
/// waits for them before returning. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryVoteStore {
    storage: Arc<RwLock<BTreeMap<u64, Vec<u8>>>>,
    next_id: Arc<AtomicU64>,
    emitter: Arc<Mutex<EventEmitter>>,
}

/// Handle that does not keep an `InMemoryVoteStore` alive.
///
/// Change listeners hold this instead of a clone, since the emitter they are
/// registered on is owned by the store itself.
#[derive(Clone)]
pub(crate) struct WeakVoteStore {
    storage: Weak<RwLock<BTreeMap<u64, Vec<u8>>>>,
    next_id: Weak<AtomicU64>,
    emitter: Weak<Mutex<EventEmitter>>,
}

impl WeakVoteStore {
    /// The store, if any strong handle to it still exists.
    pub(crate) fn upgrade(&self) -> Option<InMemoryVoteStore> {
        Some(InMemoryVoteStore {
            storage: self.storage.upgrade()?,
            next_id: self.next_id.upgrade()?,
            emitter: self.emitter.upgrade()?,
        })
    }
}

impl Default for InMemoryVoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Register a listener for `VOTES_CHANGED`. Returns the listener id.
    pub fn on_change<F>(&self, listener: F) -> Result<String, StorageError>
    where
        F: Fn(EntityRef) + Send + Sync + 'static,
    {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| StorageError::LockPoisoned("vote emitter"))?;
        Ok(emitter.on(VOTES_CHANGED, listener))
    }

    pub(crate) fn downgrade(&self) -> WeakVoteStore {
        WeakVoteStore {
            storage: Arc::downgrade(&self.storage),
            next_id: Arc::downgrade(&self.next_id),
            emitter: Arc::downgrade(&self.emitter),
        }
    }

    /// Number of stored votes.
    pub fn len(&self) -> Result<usize, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("vote read"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }

    fn encode(vote: &Vote) -> Result<Vec<u8>, StorageError> {
        Ok(bitcode::serialize(vote)?)
    }

    fn decode(bytes: &[u8]) -> Result<Vote, StorageError> {
        Ok(bitcode::deserialize(bytes)?)
    }

    fn notify(&self, mut changed: Vec<EntityRef>) -> Result<(), StorageError> {
        changed.sort();
        changed.dedup();

        let handles = {
            let mut emitter = self
                .emitter
                .lock()
                .map_err(|_| StorageError::LockPoisoned("vote emitter"))?;
            changed
                .into_iter()
                .flat_map(|entity| emitter.emit(VOTES_CHANGED, entity))
                .collect::<Vec<_>>()
        };

        for handle in handles {
            if handle.join().is_err() {
                warn!(event = VOTES_CHANGED, "vote change listener panicked");
            }
        }
        Ok(())
    }
}

impl VoteStore for InMemoryVoteStore {
    fn save(&self, draft: VoteDraft) -> Result<Vote, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let vote = draft.into_vote(id, Self::now());
        let bytes = Self::encode(&vote)?;
        {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StorageError::LockPoisoned("vote write"))?;
            storage.insert(id, bytes);
        }

        self.notify(vec![vote.entity.clone()])?;
        Ok(vote)
    }

    fn load_by_properties(&self, criteria: &VoteCriteria) -> Result<Vec<Vote>, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("vote read"))?;

        let mut votes = Vec::new();
        for bytes in storage.values() {
            let vote = Self::decode(bytes)?;
            if criteria.matches(&vote) {
                votes.push(vote);
            }
        }
        Ok(votes)
    }

    fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let removed = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StorageError::LockPoisoned("vote write"))?;
            storage.remove(&id)
        };

        match removed {
            Some(bytes) => {
                let vote = Self::decode(&bytes)?;
                self.notify(vec![vote.entity])?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete-then-save under a single write lock.
    fn replace(&self, criteria: &VoteCriteria, draft: VoteDraft) -> Result<Replaced, StorageError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let vote = draft.into_vote(id, Self::now());
        let bytes = Self::encode(&vote)?;
        let mut changed = vec![vote.entity.clone()];

        let removed = {
            let mut storage = self
                .storage
                .write()
                .map_err(|_| StorageError::LockPoisoned("vote write"))?;

            let mut stale = Vec::new();
            if !criteria.is_empty() {
                for (stored_id, stored) in storage.iter() {
                    let existing = Self::decode(stored)?;
                    if criteria.matches(&existing) {
                        stale.push(*stored_id);
                        changed.push(existing.entity);
                    }
                }
            }
            for stale_id in &stale {
                storage.remove(stale_id);
            }
            storage.insert(id, bytes);
            stale.len()
        };

        self.notify(changed)?;
        Ok(Replaced { vote, removed })
    }
}
