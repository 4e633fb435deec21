// Response envelope decoding
//
// Every Technitium endpoint except user/login wraps its payload in a
// uniform envelope:
//
//   { "status": "ok", "response": { ... } }
//   { "status": "error", "errorMessage": "...", "error": "..." }
//   { "status": "invalid-token" }
//
// `decode` resolves the three-state discriminant exactly once; nothing
// downstream re-derives it from message text.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Raw envelope shape, before the status discriminant is resolved.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Decode an envelope body, returning the payload on `status == "ok"`.
///
/// `"error"` surfaces the first non-empty of `errorMessage`/`error`, falling
/// back to `"unknown error"` when the server sent neither. `"invalid-token"`
/// maps to [`Error::InvalidToken`]. Any other status is a protocol violation
/// and becomes [`Error::UnexpectedStatus`]. This is purely a parse step; it
/// never retries or touches authentication state.
pub fn decode(body: &str) -> Result<Option<Value>, Error> {
    let envelope: ApiEnvelope = serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })?;

    match envelope.status.as_str() {
        "ok" => Ok(envelope.response),
        "error" => {
            let message = [envelope.error_message, envelope.error]
                .into_iter()
                .flatten()
                .find(|m| !m.is_empty())
                .unwrap_or_else(|| "unknown error".to_owned());
            Err(Error::Api { message })
        }
        "invalid-token" => Err(Error::InvalidToken),
        other => Err(Error::UnexpectedStatus {
            status: other.to_owned(),
        }),
    }
}
