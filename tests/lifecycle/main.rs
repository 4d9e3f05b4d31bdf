//! End-to-end tests for the save/delete vote lifecycle.

mod mirroring;
mod support;

use fivestar_votes::{
    AggregateResult, EntityRef, IdentityProvider, RatedWhile, Session, VoteCriteria,
    VoterIdentity,
};
use support::{article, quality, Site};

#[test]
fn revote_replaces_instead_of_accumulating() {
    let site = Site::new();
    let u1 = site.as_voter(Session::user(1));
    let entity = article("e", Some(80));

    u1.on_save(&entity, &quality()).unwrap();
    let votes = u1.ledger().votes_for(entity.reference()).unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].vote_kind, "quality");
    assert_eq!(votes[0].voter, VoterIdentity::User(1));
    assert_eq!(votes[0].value, 80);

    u1.on_save(&article("e", Some(60)), &quality()).unwrap();
    let votes = u1.ledger().votes_for(entity.reference()).unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].value, 60);
}

#[test]
fn last_save_wins_for_each_voter() {
    let site = Site::new();
    let u1 = site.as_voter(Session::user(1));
    let u2 = site.as_voter(Session::user(2));

    for rating in [20, 100, 40, 75] {
        u1.on_save(&article("e", Some(rating)), &quality()).unwrap();
    }
    u2.on_save(&article("e", Some(10)), &quality()).unwrap();

    let mine = u1
        .ledger()
        .find(
            &VoteCriteria::for_entity(&EntityRef::new("node", "e"))
                .vote_kind("quality")
                .voter(VoterIdentity::User(1)),
        )
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].value, 75);
    assert_eq!(site.votes.len().unwrap(), 2);
}

#[test]
fn unpublished_entities_record_zero() {
    let site = Site::new();
    let u1 = site.as_voter(Session::user(1));

    let draft = article("e", Some(90)).with_published(false);
    let outcome = u1.on_save(&draft, &quality()).unwrap();
    assert_eq!(outcome.vote.value, 0);

    let published = article("e", Some(90));
    let outcome = u1.on_save(&published, &quality()).unwrap();
    assert_eq!(outcome.vote.value, 90);
    assert_eq!(outcome.superseded, 1);
}

#[test]
fn ratings_above_hundred_are_truncated() {
    let site = Site::new();
    let u1 = site.as_voter(Session::user(1));
    assert_eq!(
        u1.on_save(&article("e", Some(150)), &quality())
            .unwrap()
            .vote
            .value,
        100
    );
    assert_eq!(
        u1.on_save(&article("e", Some(-5)), &quality())
            .unwrap()
            .vote
            .value,
        -5
    );
}

#[test]
fn anonymous_visitors_share_one_vote_per_origin() {
    let site = Site::new();
    let visitor = site.as_voter(Session::anonymous("203.0.113.7"));
    let same_origin = site.as_voter(Session::anonymous("203.0.113.7"));
    let elsewhere = site.as_voter(Session::anonymous("198.51.100.2"));

    visitor.on_save(&article("e", Some(40)), &quality()).unwrap();
    elsewhere.on_save(&article("e", Some(60)), &quality()).unwrap();
    let outcome = same_origin.on_save(&article("e", Some(100)), &quality()).unwrap();

    assert_eq!(outcome.superseded, 1);
    assert_eq!(site.votes.len().unwrap(), 2);
}

#[test]
fn aggregates_follow_every_save() {
    let site = Site::new();
    let entity = article("e", None);

    let zero = site.results.results_by_kind(&entity, "quality").unwrap();
    assert_eq!(zero, AggregateResult::default());

    site.as_voter(Session::user(1))
        .on_save(&article("e", Some(80)), &quality())
        .unwrap();
    site.as_voter(Session::user(2))
        .on_save(&article("e", Some(40)), &quality())
        .unwrap();

    let result = site.results.results_by_kind(&entity, "quality").unwrap();
    assert_eq!(result.sum, 120);
    assert_eq!(result.count, 2);
    assert_eq!(result.average, 60.0);

    site.as_voter(Session::user(1))
        .on_save(&article("e", Some(100)), &quality())
        .unwrap();
    let result = site
        .results
        .results_for_voter(&entity, "quality", &VoterIdentity::User(1))
        .unwrap();
    assert_eq!(result.sum, 140);
    assert_eq!(result.count, 2);
    assert_eq!(result.current_voter_value, 100);
}

#[test]
fn submit_while_viewing() {
    let site = Site::new();
    site.store(&article("e", None));
    let voter = Session::user(3).with_origin("192.0.2.1");
    let expected_source = voter.current_voter().source;
    let controller = site.as_voter(voter);

    let outcome = controller
        .submit(&EntityRef::new("node", "e"), &quality(), 80, RatedWhile::Viewing)
        .unwrap();
    assert_eq!(outcome.vote.value, 80);
    assert_eq!(outcome.vote.source, expected_source);

    let err = controller
        .submit(
            &EntityRef::new("node", "e"),
            &quality().with_rated_while(RatedWhile::Editing),
            20,
            RatedWhile::Viewing,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        fivestar_votes::RatingError::NotAcceptedWhile { .. }
    ));

    let result = site
        .results
        .results_by_kind(&article("e", None), "quality")
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.sum, 80);
}
