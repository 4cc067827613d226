use std::any::Any;
use std::collections::HashSet;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::errors::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Header first, then the `api_key` query parameter. Empty values count as
/// absent.
fn provided_api_key(request: &Request) -> Option<String> {
    let header = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    header.or_else(|| {
        let query = request.uri().query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == API_KEY_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    })
}

/// Rejects every request under `/api` whose key does not match, unknown
/// paths included.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match provided_api_key(&request) {
        Some(key) if key == state.settings.api_key => next.run(request).await,
        _ => {
            tracing::debug!(path = %request.uri().path(), "Rejected request without valid API key");
            ApiError::Unauthorized.into_response()
        }
    }
}

pub async fn request_timeout(limit: Duration, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_secs = limit.as_secs(), "Request timed out");
            ApiError::Timeout.into_response()
        }
    }
}

/// Renders a handler panic as an `INTERNAL_SERVER_ERROR` envelope.
pub fn panic_response(production: bool, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "Handler panicked".to_string());

    tracing::error!("Error: {detail}");
    let message = if production {
        "Internal server error".to_string()
    } else {
        detail
    };
    ApiError::InternalServerError(message).into_response()
}

/// Extracts the domain from Origin or Referer header
fn extract_domain_from_headers(headers: &HeaderMap) -> Option<String> {
    ["origin", "referer"].into_iter().find_map(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_domain)
    })
}

/// Extracts domain from a URL string
/// Examples:
/// - "https://example.com/path" -> "example.com"
/// - "http://api.example.com:8080/path" -> "api.example.com"
fn extract_domain(url: &str) -> Option<String> {
    let without_protocol = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let domain = without_protocol
        .split(&['/', ':', '?'][..])
        .next()?
        .to_lowercase();

    if domain.is_empty() { None } else { Some(domain) }
}

/// Requests from whitelisted front-ends bypass rate limiting.
pub fn is_whitelisted(headers: &HeaderMap, whitelist: &HashSet<String>) -> bool {
    if whitelist.is_empty() {
        return false;
    }
    extract_domain_from_headers(headers).is_some_and(|domain| {
        let allowed = whitelist.contains(&domain);
        if allowed {
            tracing::debug!(domain = %domain, "Request from whitelisted domain, bypassing rate limit");
        }
        allowed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(
            extract_domain("http://api.example.com:8080/path"),
            Some("api.example.com".to_string())
        );
        assert_eq!(
            extract_domain("https://EXAMPLE.COM"),
            Some("example.com".to_string())
        );
        assert_eq!(extract_domain(""), None);
    }

    #[test]
    fn test_whitelist_falls_back_to_referer() {
        let whitelist: HashSet<String> = ["app.example.com".to_string()].into();
        let mut headers = HeaderMap::new();
        headers.insert("referer", HeaderValue::from_static("https://app.example.com/positions"));
        assert!(is_whitelisted(&headers, &whitelist));

        headers.insert("origin", HeaderValue::from_static("https://evil.example.org"));
        assert!(!is_whitelisted(&headers, &whitelist));
        assert!(!is_whitelisted(&HeaderMap::new(), &whitelist));
    }

    #[test]
    fn test_api_key_sources() {
        let request = Request::builder()
            .uri("/api/wallets?api_key=from-query")
            .header(API_KEY_HEADER, "from-header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(provided_api_key(&request).as_deref(), Some("from-header"));

        let request = Request::builder()
            .uri("/api/wallets?foo=1&api_key=a%20b")
            .header(API_KEY_HEADER, "")
            .body(Body::empty())
            .unwrap();
        assert_eq!(provided_api_key(&request).as_deref(), Some("a b"));

        let request = Request::builder()
            .uri("/api/wallets")
            .body(Body::empty())
            .unwrap();
        assert_eq!(provided_api_key(&request), None);
    }

    #[test]
    fn test_panic_detail_suppressed_in_production() {
        let response = panic_response(true, Box::new("boom".to_string()));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
