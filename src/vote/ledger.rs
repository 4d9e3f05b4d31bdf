use tracing::debug;

use super::{clamp_value, Replaced, Vote, VoteCriteria, VoteDraft, VoteStore};
use crate::entity::EntityRef;
use crate::error::StorageError;
use crate::identity::Voter;

/// Write path for votes: cast, look up, remove, supersede.
///
/// The ledger never recomputes aggregates; the backing store does that when
/// its votes change.
pub struct VoteLedger<S> {
    store: S,
}

impl<S: VoteStore> VoteLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a new vote. Values above 100 are truncated to 100.
    pub fn cast(
        &self,
        entity: &EntityRef,
        vote_kind: &str,
        voter: &Voter,
        value: i32,
    ) -> Result<Vote, StorageError> {
        let vote = self.store.save(Self::draft(entity, vote_kind, voter, value))?;
        debug!(entity = %entity, vote_kind, voter = %vote.voter, value = vote.value, "vote cast");
        Ok(vote)
    }

    /// Votes matching `criteria`. Empty criteria match nothing.
    pub fn find(&self, criteria: &VoteCriteria) -> Result<Vec<Vote>, StorageError> {
        if criteria.is_empty() {
            return Ok(Vec::new());
        }
        self.store.load_by_properties(criteria)
    }

    /// Every vote recorded against `entity`.
    pub fn votes_for(&self, entity: &EntityRef) -> Result<Vec<Vote>, StorageError> {
        self.find(&VoteCriteria::for_entity(entity))
    }

    /// Remove one vote. Removing a vote that is already gone returns false.
    pub fn remove(&self, vote: &Vote) -> Result<bool, StorageError> {
        let removed = self.store.delete(vote.id)?;
        debug!(vote_id = vote.id, removed, "vote removed");
        Ok(removed)
    }

    /// Replace the voter's vote of this kind on `entity` with a new one.
    pub fn supersede(
        &self,
        entity: &EntityRef,
        vote_kind: &str,
        voter: &Voter,
        value: i32,
    ) -> Result<Replaced, StorageError> {
        let criteria = VoteCriteria::for_entity(entity)
            .vote_kind(vote_kind)
            .voter(voter.identity.clone());
        let replaced = self
            .store
            .replace(&criteria, Self::draft(entity, vote_kind, voter, value))?;
        debug!(
            entity = %entity,
            vote_kind,
            voter = %replaced.vote.voter,
            value = replaced.vote.value,
            superseded = replaced.removed,
            "vote superseded"
        );
        Ok(replaced)
    }

    fn draft(entity: &EntityRef, vote_kind: &str, voter: &Voter, value: i32) -> VoteDraft {
        VoteDraft::new(
            entity.clone(),
            vote_kind,
            voter.identity.clone(),
            clamp_value(value),
        )
        .with_source(voter.source.clone())
    }
}
