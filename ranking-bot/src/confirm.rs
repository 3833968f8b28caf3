//! Reaction-based confirmation for destructive commands.
//!
//! A command opens a [`PendingConfirmation`], shows the prompt, and awaits
//! [`PendingConfirmation::wait`]. Reactions arriving from the transport are
//! fed to [`ConfirmationGate::signal`]; only the requester's configured emoji
//! on that exact prompt completes the wait. Anything else is ignored and the
//! wait runs on until the window closes.
//!
//! ```text
//! AwaitingConfirmation ──(requester reacts with emoji)──▶ Confirmed
//!          │
//!          └──────────────(window elapses)──────────────▶ TimedOut
//! ```
//!
//! Waiting is a task suspension on a oneshot channel, so other commands keep
//! running while a prompt is open.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ranking_core::MemberId;
use tokio::sync::oneshot;
use tracing::debug;

use crate::config::ResetConfig;
use crate::response::PromptId;

/// A reaction added to some message by some member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Prompt the reaction was added to.
    pub prompt: PromptId,
    /// Who reacted.
    pub member: MemberId,
    /// The emoji used.
    pub emoji: String,
}

/// Terminal state of a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The requester confirmed within the window.
    Confirmed,
    /// The window closed first.
    TimedOut,
}

struct Waiter {
    requester: MemberId,
    tx: oneshot::Sender<()>,
}

struct GateInner {
    pending: HashMap<PromptId, Waiter>,
    next_id: u64,
}

/// Registry of open confirmation prompts. Cheap to clone.
#[derive(Clone)]
pub struct ConfirmationGate {
    inner: Arc<Mutex<GateInner>>,
    window: Duration,
    emoji: Arc<str>,
}

impl std::fmt::Debug for ConfirmationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationGate")
            .field("window", &self.window)
            .field("emoji", &self.emoji)
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl ConfirmationGate {
    /// Create a gate with the given window and confirming emoji.
    #[must_use]
    pub fn new(window: Duration, emoji: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GateInner {
                pending: HashMap::new(),
                next_id: 1,
            })),
            window,
            emoji: Arc::from(emoji.into()),
        }
    }

    /// Create a gate from `[reset]` settings.
    #[must_use]
    pub fn from_config(config: &ResetConfig) -> Self {
        Self::new(config.window(), config.confirm_emoji.clone())
    }

    /// The confirmation window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The emoji that confirms.
    #[must_use]
    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    /// Number of prompts still awaiting a decision.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Open a prompt that only `requester` can confirm.
    #[must_use]
    pub fn open(&self, requester: &MemberId) -> PendingConfirmation {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();
        let id = PromptId(inner.next_id);
        inner.next_id += 1;
        inner.pending.insert(
            id,
            Waiter {
                requester: requester.clone(),
                tx,
            },
        );
        debug!(prompt = %id, requester = %requester, "Confirmation prompt opened");

        PendingConfirmation {
            id,
            gate: self.clone(),
            rx,
        }
    }

    /// Feed a reaction to the gate.
    ///
    /// Returns `true` if it confirmed an open prompt. Reactions from other
    /// members, with another emoji, or on unknown prompts return `false` and
    /// leave every prompt as it was.
    pub fn signal(&self, reaction: &Reaction) -> bool {
        if reaction.emoji.as_str() != &*self.emoji {
            return false;
        }

        let mut inner = self.inner.lock();
        let Some(waiter) = inner.pending.get(&reaction.prompt) else {
            return false;
        };
        if waiter.requester != reaction.member {
            debug!(
                prompt = %reaction.prompt,
                member = %reaction.member,
                "Ignoring confirmation from someone other than the requester"
            );
            return false;
        }

        match inner.pending.remove(&reaction.prompt) {
            Some(waiter) => waiter.tx.send(()).is_ok(),
            None => false,
        }
    }

    fn forget(&self, id: PromptId) {
        self.inner.lock().pending.remove(&id);
    }
}

/// An open prompt. Dropping it withdraws the prompt from the gate.
#[derive(Debug)]
pub struct PendingConfirmation {
    id: PromptId,
    gate: ConfirmationGate,
    rx: oneshot::Receiver<()>,
}

impl PendingConfirmation {
    /// Prompt id to show alongside the message.
    #[must_use]
    pub fn id(&self) -> PromptId {
        self.id
    }

    /// Suspend until confirmed or until the window elapses.
    pub async fn wait(mut self) -> ConfirmationOutcome {
        match tokio::time::timeout(self.gate.window, &mut self.rx).await {
            Ok(Ok(())) => ConfirmationOutcome::Confirmed,
            Ok(Err(_)) | Err(_) => ConfirmationOutcome::TimedOut,
        }
    }
}

impl Drop for PendingConfirmation {
    fn drop(&mut self) {
        self.gate.forget(self.id);
    }
}
