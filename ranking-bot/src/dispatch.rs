//! Capability-checked routing from commands to handlers.
//!
//! The dispatcher is the only place that knows which commands need the
//! administrator capability. Handlers below it are plain functions over the
//! store; storage failures are logged here and turned into a generic reply
//! so a broken file never takes the bot down.

use std::sync::Arc;

use ranking_core::config::LeaderboardConfig;
use ranking_core::LeaderboardStore;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::config::{BotConfig, EmbedConfig};
use crate::confirm::{ConfirmationGate, Reaction};
use crate::handlers;
use crate::member::{Capability, Invoker, Member};
use crate::response::Response;

/// Reply sent when a handler hits a storage failure.
pub const FAILURE_REPLY: &str = "Something went wrong while updating the leaderboard.";

/// Reply sent when the invoker lacks the required capability.
pub const PERMISSION_REPLY: &str = "You don't have permission to use this command.";

/// A fully parsed command with resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `addpoints <member> <points>`
    AddPoints {
        /// Member receiving points.
        target: Member,
        /// Points to add.
        amount: i64,
    },
    /// `removepoints <member> <points>`
    RemovePoints {
        /// Member losing points.
        target: Member,
        /// Points to remove.
        amount: i64,
    },
    /// `setpoints <member> <points>`
    SetPoints {
        /// Member being set.
        target: Member,
        /// New balance.
        amount: i64,
    },
    /// `give <member> <points>`
    Give {
        /// Member receiving the gift.
        target: Member,
        /// Points to give.
        amount: i64,
    },
    /// `points [member]`
    Points {
        /// Member to look up; the invoker when absent.
        target: Option<Member>,
    },
    /// `leaderboard` / `lb`
    Leaderboard,
    /// `resetleaderboard`
    ResetLeaderboard,
}

impl Command {
    /// Command name as typed after the prefix.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPoints { .. } => "addpoints",
            Self::RemovePoints { .. } => "removepoints",
            Self::SetPoints { .. } => "setpoints",
            Self::Give { .. } => "give",
            Self::Points { .. } => "points",
            Self::Leaderboard => "leaderboard",
            Self::ResetLeaderboard => "resetleaderboard",
        }
    }

    /// Whether the command suspends on a confirmation prompt. Transports
    /// run these off the input loop so later lines keep flowing.
    #[must_use]
    pub fn awaits_confirmation(&self) -> bool {
        matches!(self, Self::ResetLeaderboard)
    }

    /// Capability the invoker must hold.
    #[must_use]
    pub fn required_capability(&self) -> Capability {
        match self {
            Self::AddPoints { .. }
            | Self::RemovePoints { .. }
            | Self::SetPoints { .. }
            | Self::ResetLeaderboard => Capability::Admin,
            Self::Give { .. } | Self::Points { .. } | Self::Leaderboard => Capability::Member,
        }
    }
}

/// Routes commands to handlers with an injected store.
#[derive(Debug)]
pub struct Dispatcher {
    store: Arc<LeaderboardStore>,
    gate: ConfirmationGate,
    ranking: LeaderboardConfig,
    style: EmbedConfig,
}

impl Dispatcher {
    /// Build a dispatcher over `store` using the settings in `config`.
    #[must_use]
    pub fn new(store: Arc<LeaderboardStore>, config: &BotConfig) -> Self {
        Self {
            store,
            gate: ConfirmationGate::from_config(&config.reset),
            ranking: config.leaderboard.clone(),
            style: config.embed.clone(),
        }
    }

    /// The injected store.
    #[must_use]
    pub fn store(&self) -> &LeaderboardStore {
        &self.store
    }

    /// The confirmation gate used by reset.
    #[must_use]
    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Run `command` for `invoker`, sending every reply to `out`.
    ///
    /// Resolves once the command has finished, which for a reset means after
    /// the confirmation window.
    pub async fn dispatch(
        &self,
        invoker: &Invoker,
        command: Command,
        out: &mpsc::UnboundedSender<Response>,
    ) {
        let name = command.name();
        if !invoker.capability.permits(command.required_capability()) {
            warn!(
                command = name,
                invoker = %invoker.member.id,
                "Command denied: missing capability"
            );
            send(out, Response::text(PERMISSION_REPLY));
            return;
        }

        debug!(command = name, invoker = %invoker.member.id, "Dispatching command");
        let actor = &invoker.member;
        let result = match command {
            Command::AddPoints { target, amount } => {
                handlers::add_points(&self.store, &target, amount).map(|r| vec![r])
            }
            Command::RemovePoints { target, amount } => {
                handlers::remove_points(&self.store, &target, amount).map(|r| vec![r])
            }
            Command::SetPoints { target, amount } => {
                handlers::set_points(&self.store, &target, amount).map(|r| vec![r])
            }
            Command::Give { target, amount } => {
                handlers::give_points(&self.store, actor, &target, amount).map(|r| vec![r])
            }
            Command::Points { target } => {
                handlers::check_points(&self.store, actor, target.as_ref()).map(|r| vec![r])
            }
            Command::Leaderboard => handlers::show_leaderboard(&self.store, &self.ranking, &self.style),
            Command::ResetLeaderboard => {
                handlers::reset_leaderboard(&self.store, &self.gate, actor, |prompt| {
                    send(out, prompt);
                })
                .await
                .map(|r| vec![r])
            }
        };

        match result {
            Ok(responses) => {
                for response in responses {
                    send(out, response);
                }
            }
            Err(e) => {
                error!(command = name, invoker = %actor.id, error = %e, "Command failed");
                send(out, Response::text(FAILURE_REPLY));
            }
        }
    }

    /// Route a reaction to the confirmation gate.
    ///
    /// Returns `true` if it confirmed a pending prompt.
    pub fn react(&self, reaction: &Reaction) -> bool {
        self.gate.signal(reaction)
    }
}

pub(crate) fn send(out: &mpsc::UnboundedSender<Response>, response: Response) {
    if out.send(response).is_err() {
        debug!("Response channel closed, dropping reply");
    }
}
