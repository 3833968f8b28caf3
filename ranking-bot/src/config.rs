//! Bot configuration (`ranking.toml`).
//!
//! Wraps the store-level [`PersistenceConfig`] and [`LeaderboardConfig`] from
//! `ranking-core` and adds the chat-facing settings: command prefix, embed
//! styling, the reset confirmation window and the member roster used by the
//! console transport.

use std::time::Duration;

use ranking_core::config::{LeaderboardConfig, PersistenceConfig};
use serde::{Deserialize, Serialize};

use crate::error::BotError;
use crate::response::EMBED_BLUE;

/// Top-level bot configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Where the leaderboard is stored.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Ranking and pagination.
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    /// Leaderboard embed styling.
    #[serde(default)]
    pub embed: EmbedConfig,
    /// Reset confirmation flow.
    #[serde(default)]
    pub reset: ResetConfig,
    /// Known members and their capabilities.
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

impl BotConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `BotError::Config` if the TOML is invalid or fails
    /// [`BotConfig::validate`].
    pub fn from_toml(toml_str: &str) -> Result<Self, BotError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| BotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that parse but cannot work.
    ///
    /// # Errors
    /// Returns `BotError::Config` naming the offending key.
    pub fn validate(&self) -> Result<(), BotError> {
        if self.general.command_prefix.trim().is_empty() {
            return Err(BotError::Config(
                "general.command_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, BotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Prefix that marks a chat line as a command.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            log_level: default_log_level(),
        }
    }
}

/// Leaderboard embed styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Embed title; page indicators are appended to it.
    #[serde(default = "default_title")]
    pub title: String,
    /// Embed side color as `0xRRGGBB`.
    #[serde(default = "default_color")]
    pub color: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            color: EMBED_BLUE,
        }
    }
}

/// Reset confirmation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    /// How long the requester has to confirm.
    #[serde(default = "default_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    /// Reaction that confirms the reset.
    #[serde(default = "default_confirm_emoji")]
    pub confirm_emoji: String,
}

impl ResetConfig {
    /// The confirmation window as a [`Duration`].
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_secs: default_timeout_secs(),
            confirm_emoji: default_confirm_emoji(),
        }
    }
}

/// One roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEntry {
    /// Platform member id.
    pub id: String,
    /// Display name used when a record is created.
    pub name: String,
    /// Whether the member holds the administrator capability.
    #[serde(default)]
    pub admin: bool,
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_prefix() -> String { "!".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_title() -> String { "Points Leaderboard".to_string() }
fn default_color() -> u32 { EMBED_BLUE }
fn default_timeout_secs() -> u64 { 30 }
fn default_confirm_emoji() -> String { "✅".to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use ranking_core::config::BackendKind;

    #[test]
    fn defaults_match_stock_bot() {
        let config = BotConfig::from_toml("").expect("parse");
        assert_eq!(config.general.command_prefix, "!");
        assert_eq!(config.embed.title, "Points Leaderboard");
        assert_eq!(config.embed.color, 0x3498DB);
        assert_eq!(config.reset.window(), Duration::from_secs(30));
        assert_eq!(config.reset.confirm_emoji, "✅");
        assert_eq!(config.leaderboard.page_size, 25);
        assert!(config.members.is_empty());
    }

    #[test]
    fn full_file_parses() {
        let config = BotConfig::from_toml(
            r#"
            [general]
            command_prefix = "?"

            [persistence]
            backend = "memory"

            [reset]
            confirmation_timeout_secs = 5

            [[members]]
            id = "1"
            name = "alice"
            admin = true

            [[members]]
            id = "2"
            name = "bob"
            "#,
        )
        .expect("parse");

        assert_eq!(config.general.command_prefix, "?");
        assert_eq!(config.persistence.backend, BackendKind::Memory);
        assert_eq!(config.reset.window(), Duration::from_secs(5));
        assert_eq!(config.members.len(), 2);
        assert!(config.members[0].admin);
        assert!(!config.members[1].admin);
    }

    #[test]
    fn member_without_name_is_rejected() {
        let err = BotConfig::from_toml("[[members]]\nid = \"1\"").expect_err("missing name");
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        for prefix in ["\"\"", "\"  \""] {
            let toml = format!("[general]\ncommand_prefix = {prefix}");
            let err = BotConfig::from_toml(&toml).expect_err("empty prefix");
            match err {
                BotError::Config(msg) => assert!(msg.contains("command_prefix")),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
