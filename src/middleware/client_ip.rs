//! Client identity middleware
//!
//! Derives the rate-limiting key from the request's network origin and
//! stores it in request extensions for handlers.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Forwarded-for header set by reverse proxies
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Identifier used when neither a forwarded address nor a peer address is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Opaque client identifier, added to request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolve the client identifier
///
/// Prefers the first entry of `X-Forwarded-For`, then the peer socket IP.
pub fn resolve_client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientId {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ClientId(ip.to_string());
    }

    match peer {
        Some(addr) => ClientId(addr.ip().to_string()),
        None => ClientId(UNKNOWN_CLIENT.to_string()),
    }
}

/// Client identity middleware
pub async fn client_id_middleware(mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let client_id = resolve_client_id(request.headers(), peer);
    debug!(client_id = %client_id.as_str(), "Resolved client identity");

    request.extensions_mut().insert(client_id);
    next.run(request).await
}
