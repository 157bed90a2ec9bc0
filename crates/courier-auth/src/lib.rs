//! # courier-auth
//!
//! Validation of data Telegram signs on behalf of a bot: login widget
//! callbacks and Web App init data. Both are HMAC-SHA256 over a canonical
//! `key=value` string; they differ only in how the secret is derived from the
//! bot token.
//!
//! Every function here is pure and safe to call concurrently.

mod check;
mod query;

pub use check::{
    check_string, login_widget_secret, validate_hash, validate_login_widget,
    validate_web_app_data, web_app_secret, AuthError, HASH_KEY,
};
pub use query::payload_from_query;
