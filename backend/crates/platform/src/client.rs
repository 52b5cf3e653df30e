//! Client identification utilities
//!
//! Extracts the client IP for rate limiting and audit logging.

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Extract the client IP address.
///
/// Checks `X-Forwarded-For` first (taking the left-most hop, set by the
/// reverse proxy), then `X-Real-IP`, then falls back to the direct
/// connection IP.
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(ip) = forwarded
            .split(',')
            .next()
            .and_then(|s| s.trim().parse().ok())
        {
            return Some(ip);
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if let Ok(ip) = real_ip.trim().parse() {
            return Some(ip);
        }
    }

    peer
}

/// Client IP as a rate-limit/audit key; "unknown" when nothing is available.
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    extract_client_ip(headers, peer)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
