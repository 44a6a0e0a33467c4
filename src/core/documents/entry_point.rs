// The two externally invoked handlers, `do_post` and `do_get`.
//
// They take raw bytes and an optional bearer token and always return a
// `TextOutput`. Nothing escapes: parse failures and anything else unexpected
// become a 500 "Internal server error" here, after being logged.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use super::document_models::ActionRequest;
use super::document_store::DocumentStore;
use super::request_dispatcher::RequestDispatcher;
use super::response_formatter::{ResponseFormatter, TextOutput, INTERNAL_SERVER_ERROR};
use crate::core::identity::IdentityProvider;

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Malformed request body: {0}")]
    MalformedInput(#[from] serde_json::Error),
}

/// Static facts reported by the status probe.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub service_name: String,
    pub version: String,
    pub require_auth: bool,
    pub scopes: Vec<String>,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus<'a> {
    message: &'a str,
    version: &'a str,
    timestamp: String,
    authenticated: bool,
    user: String,
    endpoints: &'a [String],
    auth_info: AuthInfo<'a>,
}

#[derive(Debug, Serialize)]
struct AuthInfo<'a> {
    required: bool,
    #[serde(rename = "type")]
    kind: &'static str,
    scopes: &'a [String],
}

/// Parses an inbound body into an [`ActionRequest`].
///
/// Only invalid JSON is an error. Any valid JSON value is accepted and left
/// for the dispatcher to route, so `[1,2]` or `{"action":42}` end up as an
/// unroutable action rather than a parse failure.
pub fn parse_request_body(raw: &[u8]) -> Result<ActionRequest, EntryError> {
    let body: serde_json::Value = serde_json::from_slice(raw)?;
    Ok(ActionRequest::from_value(body))
}

pub struct DocumentApi<S: DocumentStore> {
    dispatcher: RequestDispatcher<S>,
    identity: Arc<dyn IdentityProvider>,
    settings: ApiSettings,
}

impl<S: DocumentStore> DocumentApi<S> {
    pub fn new(
        dispatcher: RequestDispatcher<S>,
        identity: Arc<dyn IdentityProvider>,
        settings: ApiSettings,
    ) -> Self {
        Self {
            dispatcher,
            identity,
            settings,
        }
    }

    pub async fn do_post(&self, raw_body: &[u8], bearer_token: Option<&str>) -> TextOutput {
        if self.settings.require_auth {
            let caller = self.identity.resolve_caller(bearer_token).await;
            if caller.is_none() {
                tracing::warn!("Rejected unauthenticated document request");
                return ResponseFormatter::error(401, AUTHENTICATION_REQUIRED);
            }
        }

        match self.handle_post(raw_body).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Error in do_post: {}", e);
                ResponseFormatter::error(500, INTERNAL_SERVER_ERROR)
            }
        }
    }

    async fn handle_post(&self, raw_body: &[u8]) -> Result<TextOutput, EntryError> {
        let request = parse_request_body(raw_body)?;
        Ok(self.dispatcher.dispatch(&request).await)
    }

    pub async fn do_get(&self, bearer_token: Option<&str>) -> TextOutput {
        let caller = self.identity.resolve_caller(bearer_token).await;

        let status = ServiceStatus {
            message: &self.settings.service_name,
            version: &self.settings.version,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            authenticated: caller.is_some(),
            user: caller.unwrap_or_else(|| "anonymous".to_string()),
            endpoints: &self.settings.endpoints,
            auth_info: AuthInfo {
                required: self.settings.require_auth,
                kind: "OAuth 2.0",
                scopes: &self.settings.scopes,
            },
        };

        ResponseFormatter::success(&status)
    }
}
