//! Line-oriented console transport.
//!
//! Stands in for a chat network: each input line is a message from a roster
//! member.
//!
//! ```text
//! <actor> !addpoints <@2> 10      command (prefix from config)
//! <actor> react <prompt> ✅        reaction on a confirmation prompt
//! <actor> hello there             ordinary chat, ignored
//! ```
//!
//! Like a chat framework's converters, this layer resolves members and parses
//! integers before anything reaches a handler, and rejects lines it cannot
//! resolve.
//!
//! [`serve`] handles commands one at a time in arrival order. Only a reset,
//! which sits on its confirmation window, is moved off the input loop.

use std::collections::HashMap;
use std::sync::Arc;

use ranking_core::MemberId;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::MemberEntry;
use crate::confirm::Reaction;
use crate::dispatch::{send, Command, Dispatcher};
use crate::member::{Capability, Invoker, Member};
use crate::response::{PromptId, Response};

/// Why a line could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The sender is not on the roster.
    #[error("Unknown sender: {0}")]
    UnknownActor(String),
    /// The command word is not recognised.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// A required argument is missing.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    /// A member argument does not resolve to a roster member.
    #[error("Member \"{0}\" not found.")]
    UnknownMember(String),
    /// A numeric argument is not an integer.
    #[error("Converting to \"int\" failed for parameter \"{name}\": {value}")]
    BadInteger {
        /// Parameter name.
        name: &'static str,
        /// Offending text.
        value: String,
    },
    /// Extra arguments after a complete command.
    #[error("Too many arguments: {0}")]
    UnexpectedArgument(String),
}

/// Something that happened on the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A member ran a command.
    Command {
        /// Who ran it.
        invoker: Invoker,
        /// What they ran.
        command: Command,
    },
    /// A member reacted to a prompt.
    Reaction(Reaction),
}

/// Known members and their capabilities.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: HashMap<MemberId, (Member, Capability)>,
}

impl Roster {
    /// Build a roster from `[[members]]` entries.
    #[must_use]
    pub fn from_entries(entries: &[MemberEntry]) -> Self {
        let members = entries
            .iter()
            .map(|entry| {
                let member = Member::new(entry.id.as_str(), entry.name.as_str());
                let capability = if entry.admin {
                    Capability::Admin
                } else {
                    Capability::Member
                };
                (member.id.clone(), (member, capability))
            })
            .collect();
        Self { members }
    }

    /// Number of known members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Resolve a mention (`<@id>`, `<@!id>`) or bare id.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<&Member> {
        let id = token
            .strip_prefix("<@")
            .and_then(|rest| rest.strip_suffix('>'))
            .map_or(token, |inner| inner.trim_start_matches('!'));
        self.members.get(&MemberId::from(id)).map(|(m, _)| m)
    }

    /// The invoker for a sender id.
    #[must_use]
    pub fn invoker(&self, id: &str) -> Option<Invoker> {
        self.members
            .get(&MemberId::from(id))
            .map(|(member, capability)| Invoker {
                member: member.clone(),
                capability: *capability,
            })
    }
}

/// Parse one console line.
///
/// Returns `Ok(None)` for blank lines and ordinary chat.
///
/// # Errors
/// Returns a [`ParseError`] when a command or reaction cannot be resolved.
pub fn parse_line(
    line: &str,
    prefix: &str,
    roster: &Roster,
) -> Result<Option<ConsoleEvent>, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(sender) = tokens.next() else {
        return Ok(None);
    };
    let Some(head) = tokens.next() else {
        return Ok(None);
    };

    if head == "react" {
        let invoker = roster
            .invoker(sender)
            .ok_or_else(|| ParseError::UnknownActor(sender.to_string()))?;
        let prompt = tokens.next().ok_or(ParseError::MissingArgument("prompt"))?;
        let prompt = prompt.parse::<u64>().map_err(|_| ParseError::BadInteger {
            name: "prompt",
            value: prompt.to_string(),
        })?;
        let emoji = tokens.next().ok_or(ParseError::MissingArgument("emoji"))?;
        return Ok(Some(ConsoleEvent::Reaction(Reaction {
            prompt: PromptId(prompt),
            member: invoker.member.id,
            emoji: emoji.to_string(),
        })));
    }

    let Some(word) = head.strip_prefix(prefix) else {
        return Ok(None);
    };
    let invoker = roster
        .invoker(sender)
        .ok_or_else(|| ParseError::UnknownActor(sender.to_string()))?;
    let args: Vec<&str> = tokens.collect();
    let command = parse_command(word, &args, roster)?;

    Ok(Some(ConsoleEvent::Command { invoker, command }))
}

/// Read lines from `input` until it closes, replying on `out`.
///
/// Returns once the input is exhausted and every open reset prompt has
/// resolved.
///
/// # Errors
/// Returns an error if reading `input` fails.
pub async fn serve<R>(
    input: R,
    prefix: &str,
    roster: &Roster,
    dispatcher: &Arc<Dispatcher>,
    out: &mpsc::UnboundedSender<Response>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut confirmations = JoinSet::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line, prefix, roster) {
            Ok(Some(ConsoleEvent::Command { invoker, command })) => {
                if command.awaits_confirmation() {
                    let dispatcher = Arc::clone(dispatcher);
                    let out = out.clone();
                    confirmations.spawn(async move {
                        dispatcher.dispatch(&invoker, command, &out).await;
                    });
                } else {
                    dispatcher.dispatch(&invoker, command, out).await;
                }
            }
            Ok(Some(ConsoleEvent::Reaction(reaction))) => {
                let confirmed = dispatcher.react(&reaction);
                debug!(prompt = %reaction.prompt, confirmed, "Reaction received");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = %line, error = %e, "Rejected input");
                send(out, Response::text(e.to_string()));
            }
        }
    }

    while let Some(joined) = confirmations.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Confirmation task failed");
        }
    }
    Ok(())
}

fn parse_command(word: &str, args: &[&str], roster: &Roster) -> Result<Command, ParseError> {
    let command = match word {
        "addpoints" => {
            let (target, amount) = member_and_points(args, roster)?;
            Command::AddPoints { target, amount }
        }
        "removepoints" => {
            let (target, amount) = member_and_points(args, roster)?;
            Command::RemovePoints { target, amount }
        }
        "setpoints" => {
            let (target, amount) = member_and_points(args, roster)?;
            Command::SetPoints { target, amount }
        }
        "give" => {
            let (target, amount) = member_and_points(args, roster)?;
            Command::Give { target, amount }
        }
        "points" => {
            let target = args.first().map(|t| member(t, roster)).transpose()?;
            no_more(args, 1)?;
            Command::Points { target }
        }
        "leaderboard" | "lb" => {
            no_more(args, 0)?;
            Command::Leaderboard
        }
        "resetleaderboard" => {
            no_more(args, 0)?;
            Command::ResetLeaderboard
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn member_and_points(args: &[&str], roster: &Roster) -> Result<(Member, i64), ParseError> {
    let target = args.first().ok_or(ParseError::MissingArgument("member"))?;
    let points = args.get(1).ok_or(ParseError::MissingArgument("points"))?;
    no_more(args, 2)?;

    let target = member(target, roster)?;
    let amount = points.parse::<i64>().map_err(|_| ParseError::BadInteger {
        name: "points",
        value: (*points).to_string(),
    })?;
    Ok((target, amount))
}

fn member(token: &str, roster: &Roster) -> Result<Member, ParseError> {
    roster
        .resolve(token)
        .cloned()
        .ok_or_else(|| ParseError::UnknownMember(token.to_string()))
}

fn no_more(args: &[&str], expected: usize) -> Result<(), ParseError> {
    match args.get(expected) {
        Some(extra) => Err(ParseError::UnexpectedArgument((*extra).to_string())),
        None => Ok(()),
    }
}
