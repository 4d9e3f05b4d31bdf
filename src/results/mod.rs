//! Results - Aggregate statistics over an entity's votes.
//!
//! A `ResultStore` holds per-(entity, vote kind) aggregates. The
//! `VoteResultManager` facade is the read path presentation code uses; it
//! falls back to an all-zero result for anything not yet computed.

mod in_memory;
mod manager;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityRef;
use crate::error::StorageError;
use crate::identity::VoterIdentity;

pub use in_memory::InMemoryResultStore;
pub use manager::VoteResultManager;

/// Statistics for one vote kind on one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub sum: i64,
    pub count: u64,
    pub average: f64,
    /// The requesting voter's own value; 0 when unknown or not voted.
    pub current_voter_value: i32,
}

impl AggregateResult {
    /// Sum, count and average of `values`.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0i64, 0u64), |(sum, count), value| (sum + value as i64, count + 1));
        let average = if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        };
        AggregateResult {
            sum,
            count,
            average,
            current_voter_value: 0,
        }
    }
}

/// Aggregates of one entity, keyed by vote kind.
pub type EntityResults = BTreeMap<String, AggregateResult>;

/// Storage of computed aggregates.
pub trait ResultStore: Send + Sync {
    /// Aggregates currently held for `entity`; empty when none were computed.
    fn get_results(&self, entity: &EntityRef) -> Result<EntityResults, StorageError>;

    /// The value `voter` currently has on `entity` for `vote_kind`.
    fn voter_value(
        &self,
        entity: &EntityRef,
        vote_kind: &str,
        voter: &VoterIdentity,
    ) -> Result<Option<i32>, StorageError>;

    /// Recompute `entity`'s aggregates from its raw votes.
    fn recalculate_results(
        &self,
        entity: &EntityRef,
        bundle: &str,
    ) -> Result<EntityResults, StorageError>;
}
