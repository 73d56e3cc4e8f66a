//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID as early as possible for tracing
//! - Reuse a client-supplied request ID when present
//! - Provide cookie access for the admission middleware
//!
//! # Design Decisions
//! - Request ID added before any other processing so every log line
//!   can carry it
//! - Cookie parsing is tolerant: malformed pairs are skipped, never an
//!   error

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID attached to request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Layer that stamps every request with an ID.
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service wrapper applying the request ID.
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Ok(value) = HeaderValue::from_str(&id) {
            req.headers_mut().insert(X_REQUEST_ID, value);
        }
        req.extensions_mut().insert(RequestId(id));

        self.inner.call(req)
    }
}

/// Extract a named cookie's value from the Cookie header(s).
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get_all(header::COOKIE).iter().find_map(|value| {
        value.to_str().ok()?.split(';').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_cookie_value_found_among_many() {
        let headers = headers("theme=dark; session=abc.def.ghi; x-fp-id=fp-1");
        assert_eq!(cookie_value(&headers, "session").unwrap(), "abc.def.ghi");
        assert_eq!(cookie_value(&headers, "x-fp-id").unwrap(), "fp-1");
    }

    #[test]
    fn test_cookie_value_missing() {
        let headers = headers("theme=dark");
        assert!(cookie_value(&headers, "session").is_none());
        assert!(cookie_value(&HeaderMap::new(), "session").is_none());
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let headers = headers("garbage; session=ok");
        assert_eq!(cookie_value(&headers, "session").unwrap(), "ok");
    }
}
