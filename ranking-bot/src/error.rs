//! Bot error types.

use thiserror::Error;

/// Errors raised by the bot outside of ordinary command outcomes.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration could not be parsed.
    #[error("Bot configuration error: {0}")]
    Config(String),

    /// Reading configuration or the input stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
