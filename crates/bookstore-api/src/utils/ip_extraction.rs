//! Client IP extraction
//!
//! The address is only recorded alongside contact messages, so a spoofed
//! header costs nothing but accuracy. Headers are still validated as IPs.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Best-effort client address of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let socket_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(extract_client_ip(&parts.headers, socket_addr.as_ref())))
    }
}

/// `X-Forwarded-For` (closest hop), then `X-Real-IP`, then the socket address.
pub fn extract_client_ip(headers: &HeaderMap, socket_addr: Option<&SocketAddr>) -> Option<String> {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            let closest = header_value
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .last();
            if let Some(ip) = closest.filter(|ip| is_valid_ip(ip)) {
                return Some(ip.to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(header_value) = real_ip.to_str() {
            let trimmed = header_value.trim();
            if is_valid_ip(trimmed) {
                return Some(trimmed.to_string());
            }
        }
    }

    socket_addr.map(|addr| addr.ip().to_string())
}

fn is_valid_ip(ip_str: &str) -> bool {
    ip_str.parse::<IpAddr>().is_ok()
}
