//! Request identity resolution for rate limiting.
//!
//! The identity is the key the limiter buckets on. Extractors run in a
//! fixed precedence order and the first non-empty value wins:
//! verified user id → fingerprint cookie → forwarded-for chain →
//! real-ip header → direct peer address. A request that yields none of
//! these cannot be rate limited and is rejected by the caller.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;

use crate::http::request::cookie_value;
use crate::session::SessionClaims;

type Extractor = fn(&Request<Body>, &str) -> Option<String>;

/// The fallback chain, highest precedence first.
const EXTRACTORS: [Extractor; 5] = [user_id, fingerprint, forwarded_for, real_ip, peer_addr];

/// Resolve the rate-limit identity for a request.
///
/// `fingerprint_cookie` is the configured name of the client fingerprint
/// cookie. Returns `None` when no extractor produces a usable value.
pub fn resolve_identity(req: &Request<Body>, fingerprint_cookie: &str) -> Option<String> {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(req, fingerprint_cookie).filter(|id| !id.is_empty()))
}

/// Authenticated requests bucket on the verified user id, attached to
/// request extensions by the session gate.
fn user_id(req: &Request<Body>, _: &str) -> Option<String> {
    req.extensions()
        .get::<SessionClaims>()
        .map(|claims| claims.user_id.clone())
}

fn fingerprint(req: &Request<Body>, cookie_name: &str) -> Option<String> {
    cookie_value(req.headers(), cookie_name)
}

/// First address in the forwarded-for chain, i.e. the original client as
/// reported by the nearest proxy.
fn forwarded_for(req: &Request<Body>, _: &str) -> Option<String> {
    req.headers()
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(|addr| addr.trim().to_string())
}

fn real_ip(req: &Request<Body>, _: &str) -> Option<String> {
    req.headers()
        .get("x-real-ip")?
        .to_str()
        .ok()
        .map(|addr| addr.trim().to_string())
}

fn peer_addr(req: &Request<Body>, _: &str) -> Option<String> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FP_COOKIE: &str = "x-fp-id";

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/api/v1/factory/thing")
    }

    fn claims(user_id: &str) -> SessionClaims {
        SessionClaims {
            sub: "demouser".to_string(),
            user_id: user_id.to_string(),
            iat: 0,
            exp: usize::MAX,
        }
    }

    #[test]
    fn test_user_id_wins_over_everything() {
        let mut req = request()
            .header("cookie", "x-fp-id=fp-123")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(claims("user_001"));

        assert_eq!(resolve_identity(&req, FP_COOKIE).unwrap(), "user_001");
    }

    #[test]
    fn test_fingerprint_beats_addresses() {
        let req = request()
            .header("cookie", "theme=dark; x-fp-id=fp-123")
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(resolve_identity(&req, FP_COOKIE).unwrap(), "fp-123");
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let req = request()
            .header("x-forwarded-for", " 203.0.113.7 , 10.0.0.1, 10.0.0.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(resolve_identity(&req, FP_COOKIE).unwrap(), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(resolve_identity(&req, FP_COOKIE).unwrap(), "198.51.100.2");
    }

    #[test]
    fn test_peer_addr_is_last_resort() {
        let mut req = request().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo("192.0.2.1:54321".parse::<SocketAddr>().unwrap()));

        assert_eq!(resolve_identity(&req, FP_COOKIE).unwrap(), "192.0.2.1");
    }

    #[test]
    fn test_empty_values_do_not_win() {
        let req = request()
            .header("cookie", "x-fp-id=")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(resolve_identity(&req, FP_COOKIE).unwrap(), "198.51.100.2");
    }

    #[test]
    fn test_unresolvable_request_yields_none() {
        let req = request().body(Body::empty()).unwrap();
        assert!(resolve_identity(&req, FP_COOKIE).is_none());
    }
}
