//! Vote access - who may vote on what.
//!
//! Each check answers allow, deny, or no opinion. A single deny wins;
//! otherwise at least one allow is needed. The built-in field rule always has
//! an opinion, so a policy with no extra checks allows everything except own
//! votes on fields that forbid them.

use crate::config::FieldConfig;
use crate::entity::Entity;
use crate::identity::VoterIdentity;

/// A pluggable access check.
pub trait VoteAccess: Send + Sync {
    fn check(&self, entity: &Entity, vote_kind: &str, voter: &VoterIdentity) -> Option<bool>;
}

impl<F> VoteAccess for F
where
    F: Fn(&Entity, &str, &VoterIdentity) -> Option<bool> + Send + Sync,
{
    fn check(&self, entity: &Entity, vote_kind: &str, voter: &VoterIdentity) -> Option<bool> {
        self(entity, vote_kind, voter)
    }
}

#[derive(Default)]
pub struct AccessPolicy {
    checks: Vec<Box<dyn VoteAccess>>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check(mut self, check: impl VoteAccess + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Whether `voter` may vote on `entity` through the field `config` describes.
    pub fn allows(&self, entity: &Entity, config: &FieldConfig, voter: &VoterIdentity) -> bool {
        let mut allowed = false;
        let field_rule = own_vote_rule(entity, config, voter);
        let opinions = std::iter::once(field_rule).chain(
            self.checks
                .iter()
                .map(|check| check.check(entity, &config.vote_kind, voter)),
        );
        for opinion in opinions {
            match opinion {
                Some(false) => return false,
                Some(true) => allowed = true,
                None => {}
            }
        }
        allowed
    }
}

fn own_vote_rule(entity: &Entity, config: &FieldConfig, voter: &VoterIdentity) -> Option<bool> {
    let own = matches!(
        (entity.owner(), voter.user_id()),
        (Some(owner), Some(uid)) if owner == uid
    );
    Some(config.allow_ownvote || !own)
}
