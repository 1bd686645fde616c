use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use tally_core::visit::UNKNOWN;

/// Forwarding headers carrying a comma-separated proxy chain; only the
/// first (client-most) entry is taken.
const FORWARDED_HEADERS: [&str; 2] = ["x-vercel-forwarded-for", "x-forwarded-for"];

/// Headers used verbatim once the forwarded variants miss.
const VERBATIM_HEADERS: [&str; 3] = ["x-real-ip", "cf-connecting-ip", "x-client-ip"];

/// Resolve the best client IP for an inbound request.
///
/// Priority reflects decreasing specificity of known proxy layers: the
/// edge-injected `x-vercel-forwarded-for`, then generic `x-forwarded-for`
/// (first entry each), then `x-real-ip`, `cf-connecting-ip`, and
/// `x-client-ip` verbatim, then the TCP peer address, then `"unknown"`.
///
/// The winning value is not validated as a syntactic IP address. These
/// headers are caller-controlled when the service is not behind a trusted
/// proxy; the resolver defends only against missing headers, not spoofed
/// ones.
pub fn resolve_client_ip(headers: &HeaderMap, remote_addr: Option<SocketAddr>) -> String {
    for name in FORWARDED_HEADERS {
        if let Some(ip) = header_value(headers, name)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return ip.to_string();
        }
    }

    // Verbatim tier: the value is used exactly as received, not trimmed.
    for name in VERBATIM_HEADERS {
        if let Some(ip) = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
        {
            return ip.to_string();
        }
    }

    match remote_addr {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Extractor producing the resolved client identity for a request.
///
/// Reads `ConnectInfo` from the request extensions (present when the server
/// is started via `into_make_service_with_connect_info`) so the transport
/// address is available as the last resort before `"unknown"`.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(resolve_client_ip(&parts.headers, remote_addr)))
    }
}

/// Header value as a non-empty trimmed string, or `None`.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
