//! Property-Based Tests for `give`
//!
//! Random balances and amounts on both sides: a transfer either moves points
//! exactly or changes nothing, and never leaves a solvent giver negative.

use proptest::prelude::*;

use ranking_bot::handlers;
use ranking_bot::Member;
use ranking_core::LeaderboardStore;

fn giver() -> Member {
    Member::new("1", "giver")
}

fn receiver() -> Member {
    Member::new("2", "receiver")
}

proptest! {
    #[test]
    fn give_conserves_points(
        giver_balance in proptest::option::of(-100..1_000i64),
        receiver_balance in proptest::option::of(-100..1_000i64),
        amount in -50..1_200i64,
    ) {
        let store = LeaderboardStore::in_memory();
        store
            .update(|lb| {
                if let Some(points) = giver_balance {
                    lb.set_score(&giver().id, "giver", points);
                }
                if let Some(points) = receiver_balance {
                    lb.set_score(&receiver().id, "receiver", points);
                }
            })
            .expect("seed");
        let before = store.load().expect("load");

        handlers::give_points(&store, &giver(), &receiver(), amount).expect("give");
        let after = store.load().expect("load");

        let balance = |lb: &ranking_core::Leaderboard, m: &Member| lb.points(&m.id).unwrap_or(0);
        prop_assert_eq!(
            balance(&after, &giver()) + balance(&after, &receiver()),
            balance(&before, &giver()) + balance(&before, &receiver())
        );

        let accepted = amount > 0 && giver_balance.is_some_and(|b| b >= amount);
        if accepted {
            prop_assert!(balance(&after, &giver()) >= 0);
            prop_assert_eq!(balance(&after, &giver()), balance(&before, &giver()) - amount);
        } else {
            prop_assert_eq!(after, before);
        }
    }
}
