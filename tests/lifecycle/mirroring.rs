//! Votes mirrored onto a bridged target entity.

use fivestar_votes::{
    EntityRef, RatingError, Session, StorageError, VoteCriteria, VoteDraft, VoteStore,
    VoterIdentity,
};

use crate::support::{bridged, product, quality, review, Site};

#[test]
fn save_mirrors_vote_onto_target() {
    let site = Site::new();
    site.store(&product("p"));
    let u1 = site.as_voter(Session::user(1));

    let outcome = u1.on_save(&review("r", "p", 70), &bridged()).unwrap();

    let mirrored = outcome.mirrored.unwrap();
    assert_eq!(mirrored.entity, EntityRef::new("node", "p"));
    assert_eq!(mirrored.vote_kind, "quality");
    assert_eq!(mirrored.voter, VoterIdentity::User(1));
    assert_eq!(mirrored.value, 70);
    assert!(outcome.mirror_error.is_none());
}

#[test]
fn no_mirror_when_bridging_disabled() {
    let site = Site::new();
    site.store(&product("p"));
    let u1 = site.as_voter(Session::user(1));

    let outcome = u1.on_save(&review("r", "p", 70), &quality()).unwrap();

    assert!(outcome.mirrored.is_none());
    assert!(u1
        .ledger()
        .votes_for(&EntityRef::new("node", "p"))
        .unwrap()
        .is_empty());
}

#[test]
fn revote_supersedes_mirror_too() {
    let site = Site::new();
    site.store(&product("p"));
    let u1 = site.as_voter(Session::user(1));

    u1.on_save(&review("r", "p", 70), &bridged()).unwrap();
    u1.on_save(&review("r", "p", 30), &bridged()).unwrap();

    let on_target = u1.ledger().votes_for(&EntityRef::new("node", "p")).unwrap();
    assert_eq!(on_target.len(), 1);
    assert_eq!(on_target[0].value, 30);

    let target = site
        .results
        .results_by_kind(&product("p"), "quality")
        .unwrap();
    assert_eq!(target.count, 1);
    assert_eq!(target.sum, 30);
}

#[test]
fn delete_removes_all_mirrors_and_nothing_else() {
    let site = Site::new();
    site.store(&product("p"));
    let r = review("r", "p", 50);

    for (uid, rating) in [(1, 50), (2, 80), (3, 20)] {
        site.as_voter(Session::user(uid))
            .on_save(&review("r", "p", rating), &bridged())
            .unwrap();
    }
    // Unrelated votes on the target: another kind, and a direct vote.
    site.votes
        .save(VoteDraft::new(
            EntityRef::new("node", "p"),
            "price",
            VoterIdentity::User(1),
            50,
        ))
        .unwrap();
    site.votes
        .save(VoteDraft::new(
            EntityRef::new("node", "p"),
            "quality",
            VoterIdentity::User(9),
            80,
        ))
        .unwrap();

    let controller = site.as_voter(Session::user(1));
    assert_eq!(controller.on_delete(&r, &bridged()).unwrap(), 3);

    let remaining = controller
        .ledger()
        .votes_for(&EntityRef::new("node", "p"))
        .unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining
        .iter()
        .any(|vote| vote.vote_kind == "price" && vote.voter == VoterIdentity::User(1)));
    assert!(remaining
        .iter()
        .any(|vote| vote.vote_kind == "quality" && vote.voter == VoterIdentity::User(9)));

    // The review's own votes stay until the store cascades the entity removal.
    assert_eq!(controller.ledger().votes_for(r.reference()).unwrap().len(), 3);
}

#[test]
fn delete_uses_config_at_delete_time() {
    let site = Site::new();
    site.store(&product("p"));
    let u1 = site.as_voter(Session::user(1));
    u1.on_save(&review("r", "p", 50), &bridged()).unwrap();

    assert_eq!(u1.on_delete(&review("r", "p", 50), &quality()).unwrap(), 0);
    assert_eq!(
        u1.ledger()
            .votes_for(&EntityRef::new("node", "p"))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn dangling_bridge_casts_primary_only() {
    let site = Site::new();
    let u1 = site.as_voter(Session::user(1));

    let outcome = u1.on_save(&review("r", "missing", 60), &bridged()).unwrap();

    assert_eq!(outcome.vote.value, 60);
    assert!(outcome.mirrored.is_none());
    assert!(outcome.mirror_error.is_none());
    assert_eq!(site.votes.len().unwrap(), 1);
}

#[test]
fn failed_mirror_keeps_primary_vote() {
    let site = Site::new();
    site.store(&product("p"));
    let u1 = site.with_outage(Session::user(1), "p");

    let outcome = u1.on_save(&review("r", "p", 70), &bridged()).unwrap();

    assert_eq!(outcome.vote.value, 70);
    assert!(outcome.mirrored.is_none());
    assert!(matches!(outcome.mirror_error, Some(StorageError::Backend(_))));

    let primary = site
        .votes
        .load_by_properties(&VoteCriteria::for_entity(&EntityRef::new("comment", "r")))
        .unwrap();
    assert_eq!(primary.len(), 1);
    assert_eq!(primary[0].value, 70);
    assert!(u1
        .ledger()
        .votes_for(&EntityRef::new("node", "p"))
        .unwrap()
        .is_empty());
    assert_eq!(
        site.results
            .results_by_kind(&product("p"), "quality")
            .unwrap()
            .count,
        0
    );
}

#[test]
fn failed_primary_vote_is_an_error() {
    let site = Site::new();
    site.store(&product("p"));
    let u1 = site.with_outage(Session::user(1), "r");

    let err = u1.on_save(&review("r", "p", 70), &bridged()).unwrap_err();

    assert!(matches!(err, RatingError::Storage(StorageError::Backend(_))));
    assert!(site.votes.is_empty().unwrap());
}
