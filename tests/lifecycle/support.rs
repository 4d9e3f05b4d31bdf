//! Shared fixture: in-memory stores wired the way a host application would.

use std::sync::Once;

use fivestar_votes::{
    Entity, EntityRef, EntityStore, FieldConfig, FieldValue, InMemoryEntityStore,
    InMemoryResultStore, InMemoryVoteStore, RatingController, Session, StorageError, Vote,
    VoteCriteria, VoteDraft, VoteResultManager, VoteStore,
};

pub type Controller = RatingController<InMemoryVoteStore, InMemoryEntityStore, Session>;

pub struct Site {
    pub votes: InMemoryVoteStore,
    pub entities: InMemoryEntityStore,
    pub results: VoteResultManager<InMemoryResultStore<InMemoryVoteStore>>,
}

static TRACING: Once = Once::new();

/// Route crate logs to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "fivestar_votes=warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

impl Site {
    pub fn new() -> Self {
        init_tracing();
        let votes = InMemoryVoteStore::new();
        let results = InMemoryResultStore::subscribed(votes.clone()).unwrap();
        Self {
            votes,
            entities: InMemoryEntityStore::new(),
            results: VoteResultManager::new(results),
        }
    }

    /// A controller acting for one request.
    pub fn as_voter(&self, session: Session) -> Controller {
        RatingController::new(self.votes.clone(), self.entities.clone(), session)
    }

    /// A controller whose vote writes fail for entity `failing_id`.
    pub fn with_outage(
        &self,
        session: Session,
        failing_id: &str,
    ) -> RatingController<Outage, InMemoryEntityStore, Session> {
        let votes = Outage {
            inner: self.votes.clone(),
            failing_id: failing_id.to_string(),
        };
        RatingController::new(votes, self.entities.clone(), session)
    }

    pub fn store(&self, entity: &Entity) {
        self.entities.save(entity).unwrap();
    }
}

/// Vote store that rejects writes for one entity id and passes the rest through.
/// Uses the trait's default `replace`.
pub struct Outage {
    inner: InMemoryVoteStore,
    failing_id: String,
}

impl VoteStore for Outage {
    fn save(&self, draft: VoteDraft) -> Result<Vote, StorageError> {
        if draft.entity.entity_id == self.failing_id {
            return Err(StorageError::Backend("vote backend down".into()));
        }
        self.inner.save(draft)
    }

    fn load_by_properties(&self, criteria: &VoteCriteria) -> Result<Vec<Vote>, StorageError> {
        self.inner.load_by_properties(criteria)
    }

    fn delete(&self, id: u64) -> Result<bool, StorageError> {
        self.inner.delete(id)
    }
}

pub fn article(id: &str, rating: Option<i32>) -> Entity {
    Entity::new("node", id)
        .with_bundle("article")
        .with_owner(100)
        .with_field("rating", FieldValue::Rating(rating))
}

pub fn product(id: &str) -> Entity {
    Entity::new("node", id)
        .with_bundle("product")
        .with_field("product_rating", FieldValue::Rating(None))
}

pub fn review(id: &str, product_id: &str, rating: i32) -> Entity {
    Entity::new("comment", id)
        .with_bundle("review")
        .with_field("rating", FieldValue::Rating(Some(rating)))
        .with_field(
            "product",
            FieldValue::Reference(Some(EntityRef::new("node", product_id))),
        )
}

pub fn quality() -> FieldConfig {
    FieldConfig::new("rating").with_vote_kind("quality")
}

pub fn bridged() -> FieldConfig {
    quality().with_target("product", "product_rating")
}
