//! Cross-origin policy
//!
//! Preflight `OPTIONS` requests are answered here with an empty 204 and never
//! reach a route. Allow-listed origins get the cross-origin headers. Other
//! origins get none: the request is still served, and the browser refuses to
//! hand the response to the page.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn new(origins: &[String], max_age_secs: u64) -> Self {
        let allowed_origins = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Skipping unparseable allowed origin");
                    None
                }
            })
            .collect();

        Self {
            allowed_origins,
            max_age: HeaderValue::from(max_age_secs),
        }
    }

    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// Add cross-origin headers for `origin` to a response
    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap, preflight: bool) {
        headers.append(header::VARY, HeaderValue::from_static("Origin"));

        let Some(origin) = origin else {
            return;
        };

        if !self.is_allowed(origin) {
            tracing::debug!(origin = ?origin, "Origin not allowed, omitting CORS headers");
            return;
        }

        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());

        if preflight {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            );
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        }
    }
}

/// Middleware applying [`CorsPolicy`] to every route
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        policy.apply(origin.as_ref(), response.headers_mut(), true);
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(origin.as_ref(), response.headers_mut(), false);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(&["https://app.objectionsiq.com".to_string()], 3600)
    }

    #[test]
    fn test_allowed_origin_gets_headers() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("https://app.objectionsiq.com");

        policy().apply(Some(&origin), &mut headers, false);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], origin);
        assert!(headers.get(header::ACCESS_CONTROL_MAX_AGE).is_none());
        assert_eq!(headers[header::VARY], "Origin");
    }

    #[test]
    fn test_preflight_headers() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("https://app.objectionsiq.com");

        policy().apply(Some(&origin), &mut headers, true);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
    }

    #[test]
    fn test_unlisted_origin_is_silently_omitted() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("https://evil.example");

        policy().apply(Some(&origin), &mut headers, true);

        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }

    #[test]
    fn test_no_origin_header() {
        let mut headers = HeaderMap::new();
        policy().apply(None, &mut headers, false);
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[test]
    fn test_origin_match_is_exact() {
        let policy = policy();
        assert!(policy.is_allowed(&HeaderValue::from_static("https://app.objectionsiq.com")));
        assert!(!policy.is_allowed(&HeaderValue::from_static("https://app.objectionsiq.com.evil")));
        assert!(!policy.is_allowed(&HeaderValue::from_static("http://app.objectionsiq.com")));
    }
}
