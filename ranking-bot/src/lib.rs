//! # ranking-bot: Chat Command Layer for the Points Leaderboard
//!
//! Sits between a chat framework and the platform-agnostic `ranking-core`
//! store.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │      chat transport (console / network)   │
//! │  ┌─────────────────────────────────────┐  │
//! │  │           ranking-bot               │  │
//! │  │  ┌────────────┐   ┌──────────────┐  │  │
//! │  │  │ Dispatcher │──▶│   Handlers   │  │  │
//! │  │  │ capability │   │ + Confirm    │  │  │
//! │  │  └────────────┘   └──────┬───────┘  │  │
//! │  │                          ▼          │  │
//! │  │          ┌──────────────────────┐   │  │
//! │  │          │     ranking-core     │   │  │
//! │  │          └──────────────────────┘   │  │
//! │  └─────────────────────────────────────┘  │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `member`: members, capabilities, invokers
//! - `response`: text, embeds and confirmation prompts
//! - `handlers`: the seven commands
//! - `confirm`: reaction-based confirmation with a timeout
//! - `dispatch`: capability checks and routing
//! - `console`: line-oriented transport used by the binary
//! - `config`: `ranking.toml`

pub mod config;
pub mod confirm;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod member;
pub mod response;

pub use config::BotConfig;
pub use dispatch::{Command, Dispatcher};
pub use error::BotError;
pub use member::{Capability, Invoker, Member};
pub use response::Response;
