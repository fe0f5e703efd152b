//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Three limiters, keyed by client IP:
//! - `auth_rate_limiter`: login and registration (~10/min)
//! - `checkout_rate_limiter`: order placement and payment verification (~20/min)
//! - `api_rate_limiter`: catalog, cart and wishlist (~100/min)

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers carrying the real client IP, in order of trust.
const CLIENT_IP_HEADERS: [&str; 3] = ["cf-connecting-ip", "x-real-ip", "fly-client-ip"];

/// Key extractor that reads the client IP from proxy headers.
///
/// `CF-Connecting-IP` wins, then the first hop of `X-Forwarded-For`, then
/// `X-Real-IP` and `Fly-Client-IP`. Without any proxy header the peer
/// address is used, which needs the server started with connect info.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl ClientIpKeyExtractor {
    fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    }

    fn forwarded_for<T>(req: &Request<T>) -> Option<IpAddr> {
        req.headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse().ok())
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let [cloudflare, real_ip, fly] = CLIENT_IP_HEADERS;

        Self::header_ip(req, cloudflare)
            .or_else(|| Self::forwarded_for(req))
            .or_else(|| Self::header_ip(req, real_ip))
            .or_else(|| Self::header_ip(req, fly))
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Build a limiter that replenishes one token every `seconds_per_token`.
///
/// Returns `None` if either argument is zero.
fn limiter(seconds_per_token: u64, burst: u32) -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(seconds_per_token)
        .burst_size(burst)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}

/// Rate limiter for auth endpoints: one token every 6 seconds, burst of 5.
///
/// # Panics
///
/// This function will not panic. Both arguments are non-zero constants,
/// which `GovernorConfigBuilder` always accepts.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    limiter(6, 5).expect("rate limiter config with per_second(6) and burst_size(5) is valid")
}

/// Rate limiter for checkout endpoints: one token every 3 seconds, burst of 10.
///
/// # Panics
///
/// This function will not panic. Both arguments are non-zero constants.
#[must_use]
pub fn checkout_rate_limiter() -> RateLimiterLayer {
    limiter(3, 10).expect("rate limiter config with per_second(3) and burst_size(10) is valid")
}

/// Rate limiter for the general API: one token per second, burst of 50.
///
/// # Panics
///
/// This function will not panic. Both arguments are non-zero constants.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    limiter(1, 50).expect("rate limiter config with per_second(1) and burst_size(50) is valid")
}

#[cfg(test)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/cart");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("request")
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("cf-connecting-ip", "203.0.113.9"),
        ]);
        let ip = ClientIpKeyExtractor.extract(&req).expect("ip");
        assert_eq!(ip, "203.0.113.9".parse::<IpAddr>().expect("literal"));
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let req = request(&[("x-forwarded-for", "198.51.100.4, 10.0.0.1")]);
        let ip = ClientIpKeyExtractor.extract(&req).expect("ip");
        assert_eq!(ip, "198.51.100.4".parse::<IpAddr>().expect("literal"));
    }

    #[test]
    fn test_fly_header_fallback() {
        let req = request(&[("fly-client-ip", "2001:db8::1")]);
        assert!(ClientIpKeyExtractor.extract(&req).is_ok());
    }

    #[test]
    fn test_no_headers_is_rejected() {
        let req = request(&[("x-real-ip", "not-an-ip")]);
        assert!(ClientIpKeyExtractor.extract(&req).is_err());
    }

    #[test]
    fn test_peer_address_fallback() {
        let mut req = request(&[]);
        let peer: SocketAddr = "192.0.2.7:51000".parse().expect("literal");
        req.extensions_mut().insert(ConnectInfo(peer));

        let ip = ClientIpKeyExtractor.extract(&req).expect("ip");
        assert_eq!(ip, peer.ip());
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        assert!(limiter(1, 0).is_none());
    }
}
