use axum::http::{HeaderMap, HeaderName, HeaderValue};
use std::net::SocketAddr;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-dns-prefetch-control", "on"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "origin-when-cross-origin"),
];

pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// The caller's `x-request-id` when present and non-blank, otherwise a fresh
/// v4 UUID.
pub fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub fn set_request_id(headers: &mut HeaderMap, request_id: &str) {
    headers.insert(
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderValue::from_str(request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
}

pub fn resolve_client_ip(headers: &HeaderMap, remote: Option<&SocketAddr>) -> Option<String> {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| remote.map(|addr| addr.ip().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_id_is_reused_or_generated() {
        let mut headers = HeaderMap::new();
        let generated = resolve_request_id(&headers);
        assert!(Uuid::parse_str(&generated).is_ok());

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(resolve_request_id(&headers), "abc-123");

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        assert_ne!(resolve_request_id(&headers), "   ");
    }

    #[test]
    fn forwarded_for_wins_over_socket_address() {
        let remote = SocketAddr::from(([10, 0, 0, 1], 9000));
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_client_ip(&headers, Some(&remote)).as_deref(), Some("10.0.0.1"));

        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.5"));
        assert_eq!(resolve_client_ip(&headers, Some(&remote)).as_deref(), Some("192.168.1.5"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.2"));
        assert_eq!(resolve_client_ip(&headers, Some(&remote)).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn security_headers_are_set() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers);
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
        assert_eq!(headers["referrer-policy"], "origin-when-cross-origin");
        assert_eq!(headers.len(), 4);
    }
}
