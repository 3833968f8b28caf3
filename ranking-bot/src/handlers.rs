//! The seven leaderboard commands.
//!
//! Every handler takes the [`LeaderboardStore`] explicitly, receives members
//! and amounts already resolved by the chat framework, and returns the
//! response to show. Permission checks happen in
//! [`Dispatcher`](crate::dispatch::Dispatcher) before a handler is called.
//!
//! Each mutating handler is one load → mutate → save cycle. Business
//! rejections are returned as text and leave the stored leaderboard as it was.

use std::fmt;

use ranking_core::config::LeaderboardConfig;
use ranking_core::error::Result;
use ranking_core::ranking::{paginate, rank};
use ranking_core::{Leaderboard, LeaderboardStore};
use tracing::info;

use crate::config::EmbedConfig;
use crate::confirm::{ConfirmationGate, ConfirmationOutcome};
use crate::member::Member;
use crate::response::{Embed, Response};

/// Why a transfer was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRejection {
    /// Giver and receiver are the same member.
    SelfTransfer,
    /// Zero or negative amount.
    NonPositiveAmount,
    /// Giver has no record or too few points.
    InsufficientBalance,
}

impl fmt::Display for TransferRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfTransfer => "You can't give points to yourself!",
            Self::NonPositiveAmount => "You must give a positive number of points!",
            Self::InsufficientBalance => "You don't have enough points to give!",
        })
    }
}

/// Target has never been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NotOnLeaderboard;

/// `addpoints <member> <points>`, admin.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn add_points(store: &LeaderboardStore, target: &Member, amount: i64) -> Result<Response> {
    let total = store.update(|lb| lb.upsert_add(&target.id, &target.display_name, amount))?;
    Ok(Response::text(format!(
        "Added {amount} points to {}. Their total is now {total} points.",
        target.mention()
    )))
}

/// `removepoints <member> <points>`, admin. Floors at zero.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn remove_points(store: &LeaderboardStore, target: &Member, amount: i64) -> Result<Response> {
    let outcome = store.transaction(|lb| {
        if lb.upsert_subtract(&target.id, amount) {
            Ok(lb.points(&target.id).unwrap_or_default())
        } else {
            Err(NotOnLeaderboard)
        }
    })?;

    Ok(match outcome {
        Ok(total) => Response::text(format!(
            "Removed {amount} points from {}. Their total is now {total} points.",
            target.mention()
        )),
        Err(NotOnLeaderboard) => Response::text(format!(
            "{} is not in the leaderboard yet.",
            target.mention()
        )),
    })
}

/// `setpoints <member> <points>`, admin. Any value, negative included.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn set_points(store: &LeaderboardStore, target: &Member, amount: i64) -> Result<Response> {
    store.update(|lb| lb.set_score(&target.id, &target.display_name, amount))?;
    Ok(Response::text(format!(
        "Set {}'s points to {amount}.",
        target.mention()
    )))
}

/// `give <member> <points>`, any member.
///
/// Moves `amount` from `giver` to `receiver`, creating the receiver's record
/// if needed. The sum of both balances is unchanged.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn give_points(
    store: &LeaderboardStore,
    giver: &Member,
    receiver: &Member,
    amount: i64,
) -> Result<Response> {
    if giver.id == receiver.id {
        return Ok(Response::text(TransferRejection::SelfTransfer.to_string()));
    }
    if amount <= 0 {
        return Ok(Response::text(TransferRejection::NonPositiveAmount.to_string()));
    }

    let outcome = store.transaction(|lb| {
        match lb.points(&giver.id) {
            Some(balance) if balance >= amount => {}
            _ => return Err(TransferRejection::InsufficientBalance),
        }
        lb.upsert_subtract(&giver.id, amount);
        let receiver_total = lb.upsert_add(&receiver.id, &receiver.display_name, amount);
        let giver_total = lb.points(&giver.id).unwrap_or_default();
        Ok((giver_total, receiver_total))
    })?;

    Ok(match outcome {
        Ok((giver_total, receiver_total)) => {
            info!(
                giver = %giver.id,
                receiver = %receiver.id,
                amount,
                "Points transferred"
            );
            Response::text(format!(
                "🎁 {} gave {amount} points to {}!\n\
                 {} now has {giver_total} points.\n\
                 {} now has {receiver_total} points.",
                giver.mention(),
                receiver.mention(),
                giver.display_name,
                receiver.display_name,
            ))
        }
        Err(rejection) => Response::text(rejection.to_string()),
    })
}

/// `points [member]`, any member. Defaults to the invoker.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn check_points(
    store: &LeaderboardStore,
    invoker: &Member,
    target: Option<&Member>,
) -> Result<Response> {
    let target = target.unwrap_or(invoker);
    let leaderboard = store.load()?;

    Ok(Response::text(match leaderboard.points(&target.id) {
        Some(points) => format!("{} has {points} points.", target.mention()),
        None => format!("{} has no points yet.", target.mention()),
    }))
}

/// `leaderboard` / `lb`, any member.
///
/// One embed for a board that fits on a page, otherwise one embed per page,
/// each built from its own entries.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn show_leaderboard(
    store: &LeaderboardStore,
    ranking: &LeaderboardConfig,
    style: &EmbedConfig,
) -> Result<Vec<Response>> {
    let leaderboard = store.load()?;
    if leaderboard.is_empty() {
        return Ok(vec![Response::text("The leaderboard is empty!")]);
    }

    Ok(paginate(rank(&leaderboard), ranking.page_size)
        .iter()
        .map(|page| Response::Embed(Embed::leaderboard_page(page, style)))
        .collect())
}

/// `resetleaderboard`, admin.
///
/// Emits the prompt through `emit`, then waits for the requester's
/// confirmation. The store is only touched once confirmed, and is then
/// overwritten with the empty leaderboard without being read.
///
/// # Errors
/// Returns an error if the confirmed reset cannot be written.
pub async fn reset_leaderboard(
    store: &LeaderboardStore,
    gate: &ConfirmationGate,
    requester: &Member,
    emit: impl FnOnce(Response),
) -> Result<Response> {
    let pending = gate.open(&requester.id);
    emit(Response::Prompt {
        id: pending.id(),
        text: format!(
            "⚠️ Are you sure you want to reset the entire leaderboard? \
             This cannot be undone. React with {} to confirm.",
            gate.emoji()
        ),
        reaction: gate.emoji().to_string(),
    });

    match pending.wait().await {
        ConfirmationOutcome::Confirmed => {
            // Written blind so a reset also recovers an unreadable document.
            store.save(&Leaderboard::new())?;
            info!(requester = %requester.id, "Leaderboard reset");
            Ok(Response::text("🗑️ Leaderboard has been reset."))
        }
        ConfirmationOutcome::TimedOut => {
            info!(requester = %requester.id, "Leaderboard reset cancelled");
            Ok(Response::text("Leaderboard reset cancelled."))
        }
    }
}
