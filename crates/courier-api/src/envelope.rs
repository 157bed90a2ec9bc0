//! Decoding of the `{ok, error_code, description, result}` response envelope.

use courier_core::error::CourierError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// Decode `result` into `T`, or surface the envelope's error.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CourierError> {
    let result = open(body)?;
    serde_json::from_value(result)
        .map_err(|e| CourierError::Decode(format!("decode result error: {e}")))
}

/// Check the envelope only, ignoring `result`.
pub fn decode_ok(body: &[u8]) -> Result<(), CourierError> {
    open(body).map(|_| ())
}

fn open(body: &[u8]) -> Result<serde_json::Value, CourierError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| CourierError::Decode(format!("decode response error: {e}")))?;

    if !envelope.ok {
        return Err(CourierError::Api {
            code: envelope.error_code,
            description: envelope.description,
        });
    }

    Ok(envelope.result)
}
