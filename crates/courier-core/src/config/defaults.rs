//! Default value functions used by serde for config deserialization.

pub const DEFAULT_API_SERVER: &str = "https://api.telegram.org";

pub fn default_api_server() -> String {
    DEFAULT_API_SERVER.to_string()
}

pub fn default_request_timeout() -> u64 {
    10
}

pub fn default_limit() -> u32 {
    100
}

pub fn default_poll_timeout() -> u32 {
    25
}

pub fn default_buffer() -> usize {
    1
}

pub fn default_log_level() -> String {
    "info".to_string()
}
