//! Wire protocol decoding for backend push messages.
//!
//! The backend pushes UTF-8 text frames, each carrying one JSON object:
//!
//! ```json
//! { "type": "warning", "text": "<detected utterance>", "reasoning": "<explanation>" }
//! ```
//!
//! Only `"warning"` is recognized. Any other `type` decodes to
//! [`InboundMessage::Other`] so the backend can grow new message kinds without
//! breaking this client. Unknown extra fields are ignored.

use serde_json::{Map, Value};
use thiserror::Error;

use sentinel_core::{Alert, InboundMessage, WARNING_KIND};

/// Why a frame could not be turned into an [`InboundMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing or non-string field '{0}'")]
    MissingField(&'static str),

    #[error("warning has empty text")]
    EmptyText,
}

/// Decode one text frame.
pub fn decode_message(text: &str) -> Result<InboundMessage, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let kind = string_field(&object, "type")?;

    if kind != WARNING_KIND {
        return Ok(InboundMessage::Other {
            kind: kind.to_string(),
        });
    }

    let detected_text = string_field(&object, "text")?;
    let reasoning = string_field(&object, "reasoning")?;

    if detected_text.is_empty() {
        return Err(DecodeError::EmptyText);
    }

    Ok(InboundMessage::Warning(Alert::new(detected_text, reasoning)))
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, DecodeError> {
    object
        .get(name)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingField(name))
}

/// Truncate a raw payload for log output.
pub(crate) fn preview(raw: &str) -> &str {
    const MAX_PREVIEW: usize = 120;
    match raw.char_indices().nth(MAX_PREVIEW) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}
