//! VoteStore - Abstract persistence for vote records.

use super::{Vote, VoteCriteria, VoteDraft};
use crate::error::StorageError;

/// Result of a conditional upsert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replaced {
    pub vote: Vote,
    /// How many prior votes matching the criteria were removed.
    pub removed: usize,
}

/// Durable storage for votes.
///
/// Stores are expected to keep their own aggregates current (see
/// `ResultStore`) and to cascade-delete votes of entities the host removes.
pub trait VoteStore: Send + Sync {
    /// Persist a draft, assigning its id and timestamp.
    fn save(&self, draft: VoteDraft) -> Result<Vote, StorageError>;

    /// All votes matching `criteria`, ordered by id.
    fn load_by_properties(&self, criteria: &VoteCriteria) -> Result<Vec<Vote>, StorageError>;

    /// Delete a vote by id. Returns true if it existed.
    fn delete(&self, id: u64) -> Result<bool, StorageError>;

    /// Remove every vote matching `criteria`, then save `draft`.
    ///
    /// Backends that can do this atomically should override it. This default
    /// leaves a window between the delete and the save. Empty criteria remove
    /// nothing.
    fn replace(&self, criteria: &VoteCriteria, draft: VoteDraft) -> Result<Replaced, StorageError> {
        let mut removed = 0;
        if !criteria.is_empty() {
            for vote in self.load_by_properties(criteria)? {
                if self.delete(vote.id)? {
                    removed += 1;
                }
            }
        }
        let vote = self.save(draft)?;
        Ok(Replaced { vote, removed })
    }
}
