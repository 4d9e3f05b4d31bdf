//! Votes - Individual rating records and the ledger that writes them.
//!
//! A vote is immutable once cast. Revoting deletes the previous vote for the
//! same (entity, kind, voter) and casts a new one; nothing is updated in place.
//!
//! ## Example
//!
//! ```ignore
//! use fivestar_votes::{InMemoryVoteStore, VoteLedger, Session, IdentityProvider};
//!
//! let ledger = VoteLedger::new(InMemoryVoteStore::new());
//! let voter = Session::user(7).current_voter();
//! let replaced = ledger.supersede(entity.reference(), "quality", &voter, 80)?;
//! assert_eq!(replaced.vote.value, 80);
//! ```

mod in_memory;
mod ledger;
mod store;

use serde::{Deserialize, Serialize};

use crate::entity::EntityRef;
use crate::identity::VoterIdentity;

pub use in_memory::{InMemoryVoteStore, VOTES_CHANGED};
pub use ledger::VoteLedger;
pub use store::{Replaced, VoteStore};

/// Highest value a vote can carry. Larger values are truncated on cast.
pub const MAX_VOTE_VALUE: i32 = 100;

/// Clamp a rating to the vote range. There is no lower bound.
pub fn clamp_value(value: i32) -> i32 {
    value.min(MAX_VOTE_VALUE)
}

/// A persisted vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: u64,
    pub entity: EntityRef,
    pub vote_kind: String,
    pub voter: VoterIdentity,
    pub value: i32,
    /// Hashed origin of the request that cast the vote.
    pub source: String,
    /// Unix seconds.
    pub timestamp: u64,
}

/// A vote that has not been persisted yet. The store assigns id and timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteDraft {
    pub entity: EntityRef,
    pub vote_kind: String,
    pub voter: VoterIdentity,
    pub value: i32,
    pub source: String,
}

impl VoteDraft {
    pub fn new(
        entity: EntityRef,
        vote_kind: impl Into<String>,
        voter: VoterIdentity,
        value: i32,
    ) -> Self {
        Self {
            entity,
            vote_kind: vote_kind.into(),
            voter,
            value,
            source: String::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub(crate) fn into_vote(self, id: u64, timestamp: u64) -> Vote {
        Vote {
            id,
            entity: self.entity,
            vote_kind: self.vote_kind,
            voter: self.voter,
            value: self.value,
            source: self.source,
            timestamp,
        }
    }
}

/// Partial match over vote properties. Unset properties match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteCriteria {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub vote_kind: Option<String>,
    pub voter: Option<VoterIdentity>,
    pub value: Option<i32>,
    pub source: Option<String>,
}

impl VoteCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria selecting every vote on `entity`.
    pub fn for_entity(entity: &EntityRef) -> Self {
        Self::new()
            .entity_type(entity.entity_type.clone())
            .entity_id(entity.entity_id.clone())
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn vote_kind(mut self, vote_kind: impl Into<String>) -> Self {
        self.vote_kind = Some(vote_kind.into());
        self
    }

    pub fn voter(mut self, voter: VoterIdentity) -> Self {
        self.voter = Some(voter);
        self
    }

    pub fn value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, vote: &Vote) -> bool {
        self.entity_type
            .as_ref()
            .map_or(true, |t| *t == vote.entity.entity_type)
            && self
                .entity_id
                .as_ref()
                .map_or(true, |id| *id == vote.entity.entity_id)
            && self.vote_kind.as_ref().map_or(true, |k| *k == vote.vote_kind)
            && self.voter.as_ref().map_or(true, |v| *v == vote.voter)
            && self.value.map_or(true, |v| v == vote.value)
            && self.source.as_ref().map_or(true, |s| *s == vote.source)
    }
}
