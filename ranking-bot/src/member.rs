//! Members, capabilities and invokers.
//!
//! The chat framework resolves mentions to [`Member`]s and decides each
//! invoker's [`Capability`] before any handler runs. Handlers never look at
//! capabilities themselves.

use ranking_core::MemberId;

/// A resolved community member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Platform id.
    pub id: MemberId,
    /// Current display name.
    pub display_name: String,
}

impl Member {
    /// Create a member.
    #[must_use]
    pub fn new(id: impl Into<MemberId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Chat mention markup, e.g. `<@1234>`.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// What an invoker is allowed to do. Ordered: `Admin` permits everything
/// `Member` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Any community member.
    Member,
    /// Server administrator.
    Admin,
}

impl Capability {
    /// Whether this capability satisfies `required`.
    #[must_use]
    pub fn permits(self, required: Capability) -> bool {
        self >= required
    }
}

/// The member who issued a command, with their capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// Who is invoking.
    pub member: Member,
    /// What they may do.
    pub capability: Capability,
}

impl Invoker {
    /// An ordinary member.
    #[must_use]
    pub fn member(member: Member) -> Self {
        Self {
            member,
            capability: Capability::Member,
        }
    }

    /// An administrator.
    #[must_use]
    pub fn admin(member: Member) -> Self {
        Self {
            member,
            capability: Capability::Admin,
        }
    }
}
