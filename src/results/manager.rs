use super::{AggregateResult, EntityResults, ResultStore};
use crate::config::DEFAULT_VOTE_KIND;
use crate::entity::Entity;
use crate::error::StorageError;
use crate::identity::VoterIdentity;

/// Read-only facade over a `ResultStore` for rendering.
pub struct VoteResultManager<R> {
    store: R,
}

impl<R: ResultStore> VoteResultManager<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// All aggregates for `entity`. An entity without results yields a
    /// single all-zero entry under the default vote kind.
    pub fn results(&self, entity: &Entity) -> Result<EntityResults, StorageError> {
        let results = self.store.get_results(entity.reference())?;
        if !results.is_empty() {
            return Ok(results);
        }
        let mut defaults = EntityResults::new();
        defaults.insert(DEFAULT_VOTE_KIND.to_string(), Self::default_results());
        Ok(defaults)
    }

    /// Aggregates of one vote kind, all-zero when absent.
    pub fn results_by_kind(
        &self,
        entity: &Entity,
        vote_kind: &str,
    ) -> Result<AggregateResult, StorageError> {
        let results = self.store.get_results(entity.reference())?;
        Ok(results
            .get(vote_kind)
            .copied()
            .unwrap_or_else(Self::default_results))
    }

    /// `results_by_kind` with the voter's own value filled in.
    pub fn results_for_voter(
        &self,
        entity: &Entity,
        vote_kind: &str,
        voter: &VoterIdentity,
    ) -> Result<AggregateResult, StorageError> {
        let mut result = self.results_by_kind(entity, vote_kind)?;
        result.current_voter_value = self
            .store
            .voter_value(entity.reference(), vote_kind, voter)?
            .unwrap_or(0);
        Ok(result)
    }

    /// Force recomputation, e.g. after votes were edited out of band.
    pub fn recalculate(&self, entity: &Entity) -> Result<EntityResults, StorageError> {
        self.store.recalculate_results(entity.reference(), entity.bundle())
    }

    pub fn default_results() -> AggregateResult {
        AggregateResult::default()
    }
}
