//! Session identification.
//!
//! Every request is tied to a session through the `x-session-id` header. A
//! request without one (or with an unusable one) gets a fresh UUIDv7, and
//! the id is echoed on the response so the client can send it next time.

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;
use wildlife_core::defaults::SESSION_HEADER;

use crate::session::SessionId;

const MAX_SESSION_ID_LEN: usize = 128;

fn usable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SESSION_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolve the session id from the request headers.
pub fn session_id_from<B>(req: &Request<B>) -> SessionId {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| usable(v))
        .map(|v| SessionId(v.to_string()))
        .unwrap_or_else(|| SessionId(Uuid::now_v7().to_string()))
}

pub async fn session_middleware(mut req: Request<Body>, next: Next) -> Response {
    let session = session_id_from(&req);
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(session.as_str()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(header: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(SESSION_HEADER, value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_existing_id_is_kept() {
        assert_eq!(session_id_from(&request(Some("abc-123"))).as_str(), "abc-123");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let id = session_id_from(&request(None));
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_unusable_id_is_replaced() {
        let id = session_id_from(&request(Some("not a valid id!")));
        assert_ne!(id.as_str(), "not a valid id!");
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
