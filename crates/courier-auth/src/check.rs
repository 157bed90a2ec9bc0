//! HMAC-SHA256 check of signed key/value payloads.
//!
//! Login widget: <https://core.telegram.org/widgets/login#checking-authorization>
//! Web Apps: <https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app>

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Payload key carrying the hex-encoded signature.
pub const HASH_KEY: &str = "hash";

/// Key for deriving the Web App secret from the bot token.
const WEB_APP_KEY: &[u8] = b"WebAppData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The payload's `hash` does not match its contents.
    #[error("invalid hash")]
    InvalidHash,
}

/// Check a login widget callback (secret = SHA-256 of the token).
pub fn validate_login_widget(
    payload: &HashMap<String, String>,
    bot_token: &str,
) -> Result<(), AuthError> {
    validate_hash(payload, &login_widget_secret(bot_token))
}

/// Check Web App init data (secret = HMAC-SHA256 of the token under "WebAppData").
pub fn validate_web_app_data(
    payload: &HashMap<String, String>,
    bot_token: &str,
) -> Result<(), AuthError> {
    validate_hash(payload, &web_app_secret(bot_token))
}

pub fn login_widget_secret(bot_token: &str) -> [u8; 32] {
    Sha256::digest(bot_token.as_bytes()).into()
}

pub fn web_app_secret(bot_token: &str) -> [u8; 32] {
    let mut mac = new_mac(WEB_APP_KEY);
    mac.update(bot_token.as_bytes());
    mac.finalize().into_bytes().into()
}

/// Verify `payload[hash]` against HMAC-SHA256(secret, check string).
///
/// The signature must be lowercase hex. Comparison is constant-time.
pub fn validate_hash(payload: &HashMap<String, String>, secret: &[u8]) -> Result<(), AuthError> {
    let supplied = payload.get(HASH_KEY).ok_or_else(|| {
        debug!("payload has no hash");
        AuthError::InvalidHash
    })?;
    if !supplied.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(AuthError::InvalidHash);
    }
    let expected = hex::decode(supplied).map_err(|_| AuthError::InvalidHash)?;

    let mut mac = new_mac(secret);
    mac.update(check_string(payload).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidHash)
}

/// Canonical form of a payload: every key except `hash`, sorted byte-wise,
/// as `key=value` lines joined by `\n`.
pub fn check_string(payload: &HashMap<String, String>) -> String {
    let mut keys: Vec<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|k| *k != HASH_KEY)
        .collect();
    keys.sort_unstable();

    keys.iter()
        .map(|k| format!("{k}={}", payload[*k]))
        .collect::<Vec<_>>()
        .join("\n")
}

fn new_mac(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";

    fn widget_payload(hash: &str) -> HashMap<String, String> {
        [
            ("id", "12807202"),
            ("first_name", "John"),
            ("username", "doe"),
            (
                "photo_url",
                "https://t.me/i/userpic/320/a4f15041-e6a3-4cf4-9363-b0cba2f66720.jpg",
            ),
            ("auth_date", "1722489598"),
            ("hash", hash),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_check_string_sorted_without_hash() {
        let payload = widget_payload("a19016198a35deb3469a2af3c5aa1f40aa71941cf14cc20e7be8c6507b147061");
        assert_eq!(
            check_string(&payload),
            "auth_date=1722489598\nfirst_name=John\nid=12807202\nphoto_url=https://t.me/i/userpic/320/a4f15041-e6a3-4cf4-9363-b0cba2f66720.jpg\nusername=doe"
        );
    }

    #[test]
    fn test_check_string_only_hash_is_empty() {
        let payload = HashMap::from([("hash".to_string(), "00".to_string())]);
        assert_eq!(check_string(&payload), "");
    }

    #[test]
    fn test_check_string_is_bytewise() {
        let payload = HashMap::from([
            ("b".to_string(), "2".to_string()),
            ("B".to_string(), "1".to_string()),
            ("a_b".to_string(), "3".to_string()),
            ("ab".to_string(), "4".to_string()),
        ]);
        assert_eq!(check_string(&payload), "B=1\na_b=3\nab=4\nb=2");
    }

    #[test]
    fn test_validate_hash() {
        let payload = widget_payload("aba23cb08c508bd952abb2a9b3c2e9b3d6a2c8726145ccea53bd660d7995b586");
        assert_eq!(validate_hash(&payload, b"111"), Ok(()));
        assert_eq!(validate_hash(&payload, b"222"), Err(AuthError::InvalidHash));
    }

    #[test]
    fn test_modified_value_rejected() {
        let mut payload = widget_payload("aba23cb08c508bd952abb2a9b3c2e9b3d6a2c8726145ccea53bd660d7995b586");
        payload.insert("username".into(), "mallory".into());
        assert_eq!(validate_hash(&payload, b"111"), Err(AuthError::InvalidHash));
    }

    #[test]
    fn test_uppercase_or_malformed_hash_rejected() {
        let upper = widget_payload("ABA23CB08C508BD952ABB2A9B3C2E9B3D6A2C8726145CCEA53BD660D7995B586");
        assert_eq!(validate_hash(&upper, b"111"), Err(AuthError::InvalidHash));

        let short = widget_payload("aba23c");
        assert_eq!(validate_hash(&short, b"111"), Err(AuthError::InvalidHash));

        let odd = widget_payload("abc");
        assert_eq!(validate_hash(&odd, b"111"), Err(AuthError::InvalidHash));
    }

    #[test]
    fn test_missing_hash_rejected() {
        let mut payload = widget_payload("");
        payload.remove("hash");
        assert_eq!(validate_hash(&payload, b"111"), Err(AuthError::InvalidHash));
    }

    #[test]
    fn test_empty_payload_signature() {
        let payload = HashMap::from([(
            "hash".to_string(),
            "c48e6de9151d2b2c2757fa084b9e4cbd6cd513b76ce6745ef091fc581c401f32".to_string(),
        )]);
        assert_eq!(validate_hash(&payload, b"111"), Ok(()));
    }

    #[test]
    fn test_secret_derivation() {
        assert_eq!(
            hex::encode(login_widget_secret(TOKEN)),
            "731fa294d036e54f19df879bfcd4fe72d967dc6327800c5f74a48414a3f258c9"
        );
        assert_eq!(
            hex::encode(web_app_secret(TOKEN)),
            "a0e5dfce69d0e0e2311028cbb9c5e74bf476e08a08b30063019af6df1ca8b638"
        );
        assert_ne!(login_widget_secret(TOKEN), web_app_secret(TOKEN));
    }

    #[test]
    fn test_login_widget_scheme() {
        let payload = widget_payload("c7c1d473ecdf8e3d07d887cbe8673ee310f5e2ef73d4723a5d312d5d391828e7");
        assert_eq!(validate_login_widget(&payload, TOKEN), Ok(()));
        assert_eq!(
            validate_web_app_data(&payload, TOKEN),
            Err(AuthError::InvalidHash)
        );
    }

    #[test]
    fn test_web_app_scheme() {
        let payload = widget_payload("5de3874f3e38c93803a2000c7df81eecb1b0f3cd0cbf712c3debad6f06c06cf1");
        assert_eq!(validate_web_app_data(&payload, TOKEN), Ok(()));
        assert_eq!(
            validate_login_widget(&payload, TOKEN),
            Err(AuthError::InvalidHash)
        );
    }

    #[test]
    fn test_wrong_token_rejected() {
        let payload = widget_payload("c7c1d473ecdf8e3d07d887cbe8673ee310f5e2ef73d4723a5d312d5d391828e7");
        assert_eq!(
            validate_login_widget(&payload, "654321:other"),
            Err(AuthError::InvalidHash)
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(AuthError::InvalidHash.to_string(), "invalid hash");
    }
}
