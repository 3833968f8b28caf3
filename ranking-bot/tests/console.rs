//! Console Tests: line input through to ordered replies

use std::sync::Arc;

use ranking_bot::config::MemberEntry;
use ranking_bot::console::{self, Roster};
use ranking_bot::{BotConfig, Dispatcher, Response};
use ranking_core::{LeaderboardStore, MemberId};
use tokio::sync::mpsc;

fn roster() -> Roster {
    Roster::from_entries(&[
        MemberEntry {
            id: "1".into(),
            name: "alice".into(),
            admin: true,
        },
        MemberEntry {
            id: "2".into(),
            name: "bob".into(),
            admin: false,
        },
    ])
}

async fn serve_lines(input: &str) -> (Vec<Response>, Arc<LeaderboardStore>) {
    let store = Arc::new(LeaderboardStore::in_memory());
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), &BotConfig::default()));
    let (tx, mut rx) = mpsc::unbounded_channel();

    console::serve(input.as_bytes(), "!", &roster(), &dispatcher, &tx)
        .await
        .expect("serve");
    drop(tx);

    let mut replies = Vec::new();
    while let Some(reply) = rx.recv().await {
        replies.push(reply);
    }
    (replies, store)
}

fn texts(replies: &[Response]) -> Vec<&str> {
    replies.iter().filter_map(Response::as_text).collect()
}

#[tokio::test]
async fn replies_follow_input_order() {
    let input = "\
1 !addpoints <@2> 5
2 !give <@1> 2
1 !setpoints <@2> 10
2 !points
2 hello everyone
9 !points
";
    let (replies, store) = serve_lines(input).await;

    assert_eq!(
        texts(&replies),
        vec![
            "Added 5 points to <@2>. Their total is now 5 points.",
            "🎁 <@2> gave 2 points to <@1>!\nbob now has 3 points.\nalice now has 2 points.",
            "Set <@2>'s points to 10.",
            "<@2> has 10 points.",
            "Unknown sender: 9",
        ]
    );
    let lb = store.load().expect("load");
    assert_eq!(lb.points(&MemberId::from("1")), Some(2));
    assert_eq!(lb.points(&MemberId::from("2")), Some(10));
}

#[tokio::test(start_paused = true)]
async fn open_reset_does_not_hold_up_later_lines() {
    let input = "\
1 !addpoints <@2> 5
1 !resetleaderboard
2 !points
";
    let (replies, store) = serve_lines(input).await;

    let prompts = replies
        .iter()
        .filter(|r| matches!(r, Response::Prompt { .. }))
        .count();
    assert_eq!(prompts, 1);
    assert_eq!(
        texts(&replies),
        vec![
            "Added 5 points to <@2>. Their total is now 5 points.",
            "<@2> has 5 points.",
            "Leaderboard reset cancelled.",
        ]
    );
    assert_eq!(store.load().expect("load").points(&MemberId::from("2")), Some(5));
}
