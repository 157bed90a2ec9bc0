//! # courier-api
//!
//! Telegram Bot API transport, method calls, and the long-polling update loop.

pub mod bot;
pub mod envelope;
pub mod polling;
pub mod transport;

pub use bot::Bot;
pub use polling::{PollerState, UpdatePoller};
