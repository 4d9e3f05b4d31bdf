//! Rating lifecycle - keep the vote ledger consistent with rated entities.
//!
//! The host application calls `on_save` after persisting an entity with a
//! rating field and `on_delete` before removing one. `submit` is the voting
//! entry point: it writes a rating into the entity, saves it, and runs
//! `on_save`.
//!
//! ## Example
//!
//! ```ignore
//! let controller = RatingController::new(votes, entities, Session::user(7));
//! let config = FieldConfig::new("rating").with_vote_kind("quality");
//!
//! let outcome = controller.submit(entity.reference(), &config, 80, RatedWhile::Viewing)?;
//! assert_eq!(outcome.vote.value, 80);
//! ```

use std::fmt;

use tracing::warn;

use crate::access::AccessPolicy;
use crate::config::{FieldConfig, RatedWhile};
use crate::entity::{Entity, EntityRef, EntityStore};
use crate::error::StorageError;
use crate::identity::{IdentityProvider, Voter, VoterIdentity};
use crate::target::TargetResolver;
use crate::vote::{Vote, VoteCriteria, VoteLedger, VoteStore};

/// Error type for lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    Storage(StorageError),
    EntityNotFound(EntityRef),
    MissingField { entity: EntityRef, field: String },
    NotAcceptedWhile { rated_while: RatedWhile, context: RatedWhile },
    AccessDenied { entity: EntityRef, voter: VoterIdentity },
}

impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingError::Storage(err) => write!(f, "{}", err),
            RatingError::EntityNotFound(entity) => write!(f, "entity not found: {}", entity),
            RatingError::MissingField { entity, field } => {
                write!(f, "entity {} has no field {}", entity, field)
            }
            RatingError::NotAcceptedWhile {
                rated_while,
                context,
            } => write!(
                f,
                "field is rated while {}, rating submitted while {}",
                rated_while, context
            ),
            RatingError::AccessDenied { entity, voter } => {
                write!(f, "{} may not vote on {}", voter, entity)
            }
        }
    }
}

impl std::error::Error for RatingError {}

impl From<StorageError> for RatingError {
    fn from(err: StorageError) -> Self {
        RatingError::Storage(err)
    }
}

/// What a save did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub vote: Vote,
    /// Prior votes of the same voter that the new vote replaced.
    pub superseded: usize,
    /// Vote cast on the bridged target, if any.
    pub mirrored: Option<Vote>,
    /// Why mirroring failed. The primary vote stands regardless.
    pub mirror_error: Option<StorageError>,
}

pub struct RatingController<S, E, I> {
    ledger: VoteLedger<S>,
    resolver: TargetResolver<E>,
    identity: I,
    access: AccessPolicy,
}

impl<S, E, I> RatingController<S, E, I>
where
    S: VoteStore,
    E: EntityStore,
    I: IdentityProvider,
{
    pub fn new(votes: S, entities: E, identity: I) -> Self {
        Self {
            ledger: VoteLedger::new(votes),
            resolver: TargetResolver::new(entities),
            identity,
            access: AccessPolicy::new(),
        }
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    pub fn ledger(&self) -> &VoteLedger<S> {
        &self.ledger
    }

    pub fn resolver(&self) -> &TargetResolver<E> {
        &self.resolver
    }

    /// Record the entity's rating as the acting voter's vote.
    ///
    /// Unpublished entities record 0. The voter's previous vote of this kind
    /// is replaced, on the entity and on its bridged target.
    pub fn on_save(&self, entity: &Entity, config: &FieldConfig) -> Result<SaveOutcome, RatingError> {
        let voter = self.identity.current_voter();
        let rating = if entity.is_published() {
            entity.rating(&config.field_name).unwrap_or(0)
        } else {
            0
        };

        let primary = self
            .ledger
            .supersede(entity.reference(), &config.vote_kind, &voter, rating)?;

        let (mirrored, mirror_error) = match self.mirror(entity, config, &voter, rating) {
            Ok(mirrored) => (mirrored, None),
            Err(err) => {
                warn!(
                    entity = %entity.reference(),
                    vote_kind = %config.vote_kind,
                    error = %err,
                    "mirrored vote failed"
                );
                (None, Some(err))
            }
        };

        Ok(SaveOutcome {
            vote: primary.vote,
            superseded: primary.removed,
            mirrored,
            mirror_error,
        })
    }

    /// Remove the mirrored copies of the entity's votes from its target.
    ///
    /// Returns how many target votes were removed. The entity's own votes are
    /// left to the vote store's cascade.
    pub fn on_delete(&self, entity: &Entity, config: &FieldConfig) -> Result<usize, RatingError> {
        let Some(target) = self.resolver.resolve(entity, config)? else {
            return Ok(0);
        };

        let mut removed = 0;
        for vote in self.ledger.votes_for(entity.reference())? {
            let criteria = VoteCriteria::for_entity(target.reference())
                .vote_kind(vote.vote_kind.clone())
                .voter(vote.voter.clone())
                .value(vote.value)
                .source(vote.source.clone());
            for mirrored in self.ledger.find(&criteria)? {
                if self.ledger.remove(&mirrored)? {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    /// Store `rating` in the entity's rating field and record the vote.
    pub fn submit(
        &self,
        reference: &EntityRef,
        config: &FieldConfig,
        rating: i32,
        context: RatedWhile,
    ) -> Result<SaveOutcome, RatingError> {
        if !config.accepts(context) {
            return Err(RatingError::NotAcceptedWhile {
                rated_while: config.rated_while,
                context,
            });
        }

        let entities = self.resolver.entities();
        let mut entity = entities
            .load(reference)?
            .ok_or_else(|| RatingError::EntityNotFound(reference.clone()))?;
        if !entity.has_field(&config.field_name) {
            return Err(RatingError::MissingField {
                entity: reference.clone(),
                field: config.field_name.clone(),
            });
        }

        let voter = self.identity.current_voter();
        if !self.access.allows(&entity, config, &voter.identity) {
            return Err(RatingError::AccessDenied {
                entity: reference.clone(),
                voter: voter.identity,
            });
        }

        entity.set_rating(config.field_name.clone(), rating);
        entities.save(&entity)?;
        self.on_save(&entity, config)
    }

    fn mirror(
        &self,
        entity: &Entity,
        config: &FieldConfig,
        voter: &Voter,
        rating: i32,
    ) -> Result<Option<Vote>, StorageError> {
        let Some(target) = self.resolver.resolve(entity, config)? else {
            return Ok(None);
        };
        let replaced = self
            .ledger
            .supersede(target.reference(), &config.vote_kind, voter, rating)?;
        Ok(Some(replaced.vote))
    }
}
