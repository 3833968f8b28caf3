//! Handler Tests: command outcomes against a live store
//!
//! Each test drives handlers directly with an injected store and checks both
//! the reply text and what ended up stored.

use ranking_bot::config::EmbedConfig;
use ranking_bot::handlers;
use ranking_bot::{Member, Response};
use ranking_core::config::{BackendKind, LeaderboardConfig, PersistenceConfig};
use ranking_core::{Leaderboard, LeaderboardStore, MemberId};

fn alice() -> Member {
    Member::new("1001", "alice")
}

fn bob() -> Member {
    Member::new("1002", "bob")
}

fn text(response: &Response) -> &str {
    response.as_text().expect("text reply")
}

fn snapshot(store: &LeaderboardStore) -> Leaderboard {
    store.load().expect("load")
}

// ---------------------------------------------------------------------------
// The end-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn scenario_check_add_give_remove_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LeaderboardStore::open(&PersistenceConfig {
        backend: BackendKind::Json,
        path: dir.path().join("leaderboard.json"),
        ..PersistenceConfig::default()
    })
    .expect("open");
    let (alice, bob) = (alice(), bob());

    let reply = handlers::check_points(&store, &alice, None).expect("check");
    assert_eq!(text(&reply), "<@1001> has no points yet.");

    let reply = handlers::add_points(&store, &alice, 10).expect("add");
    assert_eq!(
        text(&reply),
        "Added 10 points to <@1001>. Their total is now 10 points."
    );

    let reply = handlers::give_points(&store, &alice, &bob, 15).expect("give");
    assert_eq!(text(&reply), "You don't have enough points to give!");
    assert_eq!(snapshot(&store).points(&alice.id), Some(10));
    assert!(snapshot(&store).get_score(&bob.id).is_none());

    let reply = handlers::give_points(&store, &alice, &bob, 5).expect("give");
    assert_eq!(
        text(&reply),
        "🎁 <@1001> gave 5 points to <@1002>!\nalice now has 5 points.\nbob now has 5 points."
    );

    let reply = handlers::remove_points(&store, &alice, 100).expect("remove");
    assert_eq!(
        text(&reply),
        "Removed 100 points from <@1001>. Their total is now 0 points."
    );

    let reply = handlers::set_points(&store, &alice, -3).expect("set");
    assert_eq!(text(&reply), "Set <@1001>'s points to -3.");
    assert_eq!(snapshot(&store).points(&alice.id), Some(-3));
    assert_eq!(snapshot(&store).points(&bob.id), Some(5));
}

// ---------------------------------------------------------------------------
// remove / check
// ---------------------------------------------------------------------------

#[test]
fn remove_from_absent_member_is_not_found() {
    let store = LeaderboardStore::in_memory();
    let reply = handlers::remove_points(&store, &bob(), 5).expect("remove");
    assert_eq!(text(&reply), "<@1002> is not in the leaderboard yet.");
    assert!(snapshot(&store).is_empty());
}

#[test]
fn check_other_member() {
    let store = LeaderboardStore::in_memory();
    handlers::add_points(&store, &bob(), 7).expect("add");
    let reply = handlers::check_points(&store, &alice(), Some(&bob())).expect("check");
    assert_eq!(text(&reply), "<@1002> has 7 points.");
}

#[test]
fn recorded_zero_is_not_absent() {
    let store = LeaderboardStore::in_memory();
    handlers::set_points(&store, &alice(), 0).expect("set");
    let reply = handlers::check_points(&store, &alice(), None).expect("check");
    assert_eq!(text(&reply), "<@1001> has 0 points.");
}

// ---------------------------------------------------------------------------
// give rejections leave the store untouched
// ---------------------------------------------------------------------------

#[test]
fn give_rejections_do_not_mutate() {
    let store = LeaderboardStore::in_memory();
    handlers::add_points(&store, &alice(), 10).expect("add");
    let before = snapshot(&store);

    let cases = [
        (alice(), alice(), 5, "You can't give points to yourself!"),
        (alice(), bob(), 0, "You must give a positive number of points!"),
        (alice(), bob(), -4, "You must give a positive number of points!"),
        (bob(), alice(), 1, "You don't have enough points to give!"),
        (alice(), bob(), 11, "You don't have enough points to give!"),
    ];
    for (giver, receiver, amount, expected) in cases {
        let reply = handlers::give_points(&store, &giver, &receiver, amount).expect("give");
        assert_eq!(text(&reply), expected);
        assert_eq!(snapshot(&store), before);
    }
}

#[test]
fn give_negative_balance_is_insufficient() {
    let store = LeaderboardStore::in_memory();
    handlers::set_points(&store, &alice(), -3).expect("set");
    let reply = handlers::give_points(&store, &alice(), &bob(), 1).expect("give");
    assert_eq!(text(&reply), "You don't have enough points to give!");
}

#[test]
fn give_whole_balance_conserves_points() {
    let store = LeaderboardStore::in_memory();
    handlers::add_points(&store, &alice(), 8).expect("add");
    handlers::add_points(&store, &bob(), 2).expect("add");

    handlers::give_points(&store, &alice(), &bob(), 8).expect("give");

    let lb = snapshot(&store);
    assert_eq!(lb.points(&alice().id), Some(0));
    assert_eq!(lb.points(&bob().id), Some(10));
    assert_eq!(lb.total_points(), 10);
}

// ---------------------------------------------------------------------------
// leaderboard
// ---------------------------------------------------------------------------

#[test]
fn empty_leaderboard_message() {
    let store = LeaderboardStore::in_memory();
    let replies = handlers::show_leaderboard(
        &store,
        &LeaderboardConfig::default(),
        &EmbedConfig::default(),
    )
    .expect("show");
    assert_eq!(replies, vec![Response::text("The leaderboard is empty!")]);
}

#[test]
fn small_leaderboard_is_one_embed() {
    let store = LeaderboardStore::in_memory();
    handlers::add_points(&store, &alice(), 3).expect("add");
    handlers::add_points(&store, &bob(), 9).expect("add");

    let replies = handlers::show_leaderboard(
        &store,
        &LeaderboardConfig::default(),
        &EmbedConfig::default(),
    )
    .expect("show");

    assert_eq!(replies.len(), 1);
    let embed = replies[0].as_embed().expect("embed");
    assert_eq!(embed.title, "Points Leaderboard");
    let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["1. bob", "2. alice"]);
}

#[test]
fn each_page_renders_its_own_entries() {
    let store = LeaderboardStore::in_memory();
    store
        .update(|lb| {
            for i in 0..60_i64 {
                lb.set_score(&MemberId::from(format!("{i}")), &format!("member{i}"), 1000 - i);
            }
        })
        .expect("seed");

    let replies = handlers::show_leaderboard(
        &store,
        &LeaderboardConfig::default(),
        &EmbedConfig::default(),
    )
    .expect("show");

    assert_eq!(replies.len(), 3);
    let embeds: Vec<_> = replies.iter().map(|r| r.as_embed().expect("embed")).collect();
    assert_eq!(embeds[0].title, "Points Leaderboard (Page 1/3)");
    assert_eq!(embeds[2].title, "Points Leaderboard (Page 3/3)");
    assert_eq!(embeds[0].fields.len(), 25);
    assert_eq!(embeds[1].fields.len(), 25);
    assert_eq!(embeds[2].fields.len(), 10);

    assert_ne!(embeds[0].fields, embeds[1].fields, "pages must not repeat page one");
    assert_eq!(embeds[1].fields[0].name, "26. member25");
    assert_eq!(embeds[2].fields[9].name, "60. member59");
    assert_eq!(embeds[2].fields[9].value, "941 points");
}
