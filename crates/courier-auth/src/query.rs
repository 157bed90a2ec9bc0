use std::collections::HashMap;

/// Parse a form-urlencoded string (login callback query, Web App
/// `initData`) into a payload map. A repeated key keeps its last value.
pub fn payload_from_query(query: &str) -> HashMap<String, String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
