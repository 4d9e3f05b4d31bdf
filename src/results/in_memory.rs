//! InMemoryResultStore - Aggregates cached per entity, computed from a vote store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::{AggregateResult, EntityResults, ResultStore};
use crate::entity::EntityRef;
use crate::error::StorageError;
use crate::identity::VoterIdentity;
use crate::vote::{InMemoryVoteStore, VoteCriteria, VoteStore};

/// Caches aggregates per entity and recomputes them from the wrapped vote store.
/// Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryResultStore<S> {
    votes: S,
    cache: Arc<RwLock<HashMap<EntityRef, EntityResults>>>,
}

impl<S: VoteStore> InMemoryResultStore<S> {
    /// Result store over `votes`. Nothing is computed until `recalculate_results`.
    pub fn new(votes: S) -> Self {
        Self {
            votes,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn compute(&self, entity: &EntityRef) -> Result<EntityResults, StorageError> {
        let mut by_kind: HashMap<String, Vec<i32>> = HashMap::new();
        for vote in self.votes.load_by_properties(&VoteCriteria::for_entity(entity))? {
            by_kind.entry(vote.vote_kind).or_default().push(vote.value);
        }
        Ok(by_kind
            .into_iter()
            .map(|(kind, values)| (kind, AggregateResult::from_values(values)))
            .collect())
    }
}

impl InMemoryResultStore<InMemoryVoteStore> {
    /// Result store that recalculates an entity whenever its votes change.
    ///
    /// The listener holds weak handles, so dropping both stores frees them.
    pub fn subscribed(votes: InMemoryVoteStore) -> Result<Self, StorageError> {
        let results = Self::new(votes.clone());
        let weak_votes = votes.downgrade();
        let weak_cache = Arc::downgrade(&results.cache);
        votes.on_change(move |entity: EntityRef| {
            let (Some(votes), Some(cache)) = (weak_votes.upgrade(), weak_cache.upgrade()) else {
                return;
            };
            let listener = InMemoryResultStore { votes, cache };
            if let Err(err) = listener.recalculate_results(&entity, &entity.entity_type) {
                warn!(entity = %entity, error = %err, "result recalculation failed");
            }
        })?;
        Ok(results)
    }
}

impl<S: VoteStore> ResultStore for InMemoryResultStore<S> {
    fn get_results(&self, entity: &EntityRef) -> Result<EntityResults, StorageError> {
        let cache = self
            .cache
            .read()
            .map_err(|_| StorageError::LockPoisoned("result read"))?;
        Ok(cache.get(entity).cloned().unwrap_or_default())
    }

    fn voter_value(
        &self,
        entity: &EntityRef,
        vote_kind: &str,
        voter: &VoterIdentity,
    ) -> Result<Option<i32>, StorageError> {
        let criteria = VoteCriteria::for_entity(entity)
            .vote_kind(vote_kind)
            .voter(voter.clone());
        let votes = self.votes.load_by_properties(&criteria)?;
        Ok(votes.last().map(|vote| vote.value))
    }

    fn recalculate_results(
        &self,
        entity: &EntityRef,
        bundle: &str,
    ) -> Result<EntityResults, StorageError> {
        let results = self.compute(entity)?;
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::LockPoisoned("result write"))?;
        if results.is_empty() {
            cache.remove(entity);
        } else {
            cache.insert(entity.clone(), results.clone());
        }
        info!(entity = %entity, bundle, kinds = results.len(), "results recalculated");
        Ok(results)
    }
}
