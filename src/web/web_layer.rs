// Web layer - adapts HTTP requests to the core entry points.
//
// Bodies are taken as raw bytes (not axum's `Json` extractor) so that a
// malformed body reaches the entry point and gets the same
// `{"error":"Internal server error"}` answer as any other unexpected fault.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::core::documents::response_formatter::ResponseFormatter;
use crate::core::documents::{DocumentApi, DocumentStore, TextOutput, INTERNAL_SERVER_ERROR};

/// Routes served by this process, as reported by the status probe.
pub fn endpoints() -> Vec<String> {
    vec![
        "GET /exec - API status".to_string(),
        "POST /exec - Document operations (createDocument, updateDocument, deleteDocument)"
            .to_string(),
    ]
}

pub fn router<S: DocumentStore + 'static>(api: Arc<DocumentApi<S>>) -> Router {
    Router::new()
        .route("/", get(do_get::<S>).post(do_post::<S>))
        .route("/exec", get(do_get::<S>).post(do_post::<S>))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(api)
}

/// Turns an envelope into an HTTP response. The envelope's status code is
/// used as the transport status.
pub fn build_response(output: TextOutput) -> Response {
    let status = StatusCode::from_u16(output.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, output.mime_type)],
        output.content,
    )
        .into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    build_response(ResponseFormatter::error(500, INTERNAL_SERVER_ERROR))
}

async fn do_post<S: DocumentStore + 'static>(
    State(api): State<Arc<DocumentApi<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let output = api.do_post(&body, bearer_token(&headers)).await;
    build_response(output)
}

async fn do_get<S: DocumentStore + 'static>(
    State(api): State<Arc<DocumentApi<S>>>,
    headers: HeaderMap,
) -> Response {
    let output = api.do_get(bearer_token(&headers)).await;
    build_response(output)
}
