// Builds the uniform JSON envelope every entry point returns.
//
// The formatter knows nothing about HTTP. It produces a `TextOutput`: a JSON
// text payload, its MIME type, and the status code the caller asked for. The
// web layer decides how to put that on the wire.

use serde::Serialize;

/// MIME type attached to every payload.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Generic message used when a payload cannot be produced at all.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// A serialized response, ready to be handed to the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOutput {
    pub status: u16,
    pub mime_type: &'static str,
    pub content: String,
}

/// Success bodies carry a `success` marker next to the data's own fields,
/// so `{"documentId": ..}` becomes `{"success": true, "documentId": ..}`.
#[derive(Serialize)]
struct SuccessBody<'a, T: Serialize> {
    success: bool,
    #[serde(flatten)]
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Wraps `data` in a 200 success envelope.
    ///
    /// `data` must serialize to a JSON object. If serialization fails the
    /// caller gets a 500 "Internal server error" envelope instead.
    pub fn success<T: Serialize>(data: &T) -> TextOutput {
        let body = SuccessBody {
            success: true,
            data,
        };

        match serde_json::to_string(&body) {
            Ok(content) => Self::output(200, content),
            Err(e) => {
                tracing::error!("Failed to serialize success payload: {}", e);
                Self::error(500, INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Wraps `message` as `{"error": message}` with the given status code.
    pub fn error(status: u16, message: &str) -> TextOutput {
        // A struct with a single &str field always serializes.
        let content = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", INTERNAL_SERVER_ERROR));
        Self::output(status, content)
    }

    fn output(status: u16, content: String) -> TextOutput {
        TextOutput {
            status,
            mime_type: JSON_MIME_TYPE,
            content,
        }
    }
}
