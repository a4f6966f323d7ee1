use crate::console::{Channel, Console};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Body of every successful acknowledgment.
pub const ACK_MESSAGE: &str = "Log received successfully";

pub const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, X-Log-Level";

/// Placeholder printed for fields the producer did not send.
pub const MISSING_FIELD: &str = "<missing>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Per-router state. Holds nothing mutable; requests are independent.
#[derive(Clone)]
pub struct CollectorState {
    console: Arc<dyn Console>,
}

pub fn create_router(console: Arc<dyn Console>) -> Router {
    Router::new()
        .route("/logs", post(receive_log))
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .with_state(CollectorState { console })
}

/// Accept one event, print it, acknowledge.
///
/// Fields are not validated; anything that parses as JSON is rendered as
/// well as it can be and acknowledged. Bodies not declared as
/// `application/json` are not parsed at all and count as an empty event.
async fn receive_log(
    State(state): State<CollectorState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Ack>, CollectorError> {
    let event: Value = if !is_json(&headers) || body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body).map_err(CollectorError::MalformedBody)?
    };

    debug!(
        header_level = headers.get("x-log-level").and_then(|v| v.to_str().ok()),
        "log entry received"
    );

    state.console.write_line(Channel::Out, &render_received(&event));

    Ok(Json(Ack {
        message: ACK_MESSAGE.to_string(),
    }))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Permissive cross-origin policy; every `OPTIONS` is answered with an
/// empty `200` before routing.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST"));
    response
}

/// Human-readable block for a received event.
pub fn render_received(event: &Value) -> String {
    let mut lines = vec![
        "Received log entry:".to_string(),
        format!("Level: {}", field_text(event, "level")),
        format!("Package: {}", field_text(event, "packageName")),
        format!("Message: {}", field_text(event, "message")),
        format!("Stack: {}", field_text(event, "stack")),
        format!("Timestamp: {}", field_text(event, "timestamp")),
    ];
    if let Some(metadata) = event.get("metadata").filter(|m| is_truthy(m)) {
        let pretty =
            serde_json::to_string_pretty(metadata).unwrap_or_else(|_| metadata.to_string());
        lines.push(format!("Metadata: {}", pretty));
    }
    lines.push("-------------------".to_string());
    lines.join("\n")
}

/// `null`, `false`, zero and `""` count as "no metadata".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_text(event: &Value, name: &str) -> String {
    match event.get(name) {
        None => MISSING_FIELD.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CollectorError {
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(serde_json::Error),
}

impl IntoResponse for CollectorError {
    fn into_response(self) -> Response {
        warn!("rejecting log entry: {}", self);
        let body = Json(ErrorResponse { error: self.to_string() });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
