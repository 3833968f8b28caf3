//! Response payloads handed back to the chat transport.
//!
//! Handlers return plain text, a field-structured embed, or a confirmation
//! prompt. The transport decides how to draw them; [`Response::render`] gives
//! a plain-text rendering for consoles and logs.

use std::fmt;

use ranking_core::ranking::Page;

use crate::config::EmbedConfig;

/// `discord.Color.blue()`.
pub const EMBED_BLUE: u32 = 0x3498DB;

/// Identifies a confirmation prompt so reactions can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptId(pub u64);

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One named field of an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    pub inline: bool,
}

/// A titled, colored list of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Title line.
    pub title: String,
    /// Side color, `0xRRGGBB`.
    pub color: u32,
    /// Fields in display order.
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Render one leaderboard page. Multi-page boards get a
    /// `(Page X/Y)` suffix on the title.
    #[must_use]
    pub fn leaderboard_page(page: &Page, style: &EmbedConfig) -> Self {
        let title = if page.total > 1 {
            format!("{} (Page {}/{})", style.title, page.number(), page.total)
        } else {
            style.title.clone()
        };

        let fields = page
            .entries
            .iter()
            .map(|entry| EmbedField {
                name: format!("{}. {}", entry.rank, entry.name),
                value: format!("{} points", entry.points),
                inline: false,
            })
            .collect();

        Self {
            title,
            color: style.color,
            fields,
        }
    }
}

/// Anything a handler wants shown to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A plain message.
    Text(String),
    /// A structured embed.
    Embed(Embed),
    /// A message awaiting a confirming reaction.
    Prompt {
        /// Prompt to react to.
        id: PromptId,
        /// Message body.
        text: String,
        /// Reaction that confirms.
        reaction: String,
    },
}

impl Response {
    /// Shorthand for [`Response::Text`].
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The message body, if this is plain text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The embed, if this is one.
    #[must_use]
    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            Self::Embed(embed) => Some(embed),
            _ => None,
        }
    }

    /// Plain-text rendering.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Embed(embed) => {
                let mut out = format!("== {} ==", embed.title);
                for field in &embed.fields {
                    out.push('\n');
                    out.push_str(&field.name);
                    out.push_str(" — ");
                    out.push_str(&field.value);
                }
                out
            }
            Self::Prompt { id, text, reaction } => {
                format!("[prompt {id}] {text} (react with {reaction})")
            }
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
