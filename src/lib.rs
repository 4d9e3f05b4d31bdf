//! Rating fields for content entities.
//!
//! Every save of a rated entity replaces the acting voter's previous vote
//! with a new one, optionally mirrors it onto a bridged target entity, and
//! keeps per-kind aggregates (sum, count, average) readable for rendering.
//! Storage is pluggable: entities, votes and results each sit behind a trait
//! with an in-memory implementation.

pub mod access;
pub mod config;
pub mod entity;
mod error;
pub mod identity;
pub mod lifecycle;
pub mod results;
pub mod target;
pub mod vote;

pub use access::{AccessPolicy, VoteAccess};
pub use config::{ConfigError, FieldConfig, RatedWhile, TargetSettings, VoteKindRegistry};
pub use entity::{Entity, EntityRef, EntityStore, FieldValue, InMemoryEntityStore};
pub use error::StorageError;
pub use identity::{hash_origin, IdentityProvider, Session, Voter, VoterIdentity};
pub use lifecycle::{RatingController, RatingError, SaveOutcome};
pub use results::{AggregateResult, EntityResults, InMemoryResultStore, ResultStore, VoteResultManager};
pub use target::TargetResolver;
pub use vote::{
    clamp_value, InMemoryVoteStore, Replaced, Vote, VoteCriteria, VoteDraft, VoteLedger,
    VoteStore, MAX_VOTE_VALUE,
};
