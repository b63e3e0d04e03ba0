//! # CORS and Security Headers
//!
//! The API is consumed by a browser front end on another origin, so every
//! response carries CORS headers for allowed origins and preflight requests
//! are answered here without reaching the router.

use axum::{
    body::Body,
    extract::Request,
    http::{self, HeaderMap, HeaderValue, StatusCode, header::HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Environment variable holding the comma-separated allowed origins.
pub const CORS_ORIGINS_ENV: &str = "DEVCOLLAB_CORS_ORIGINS";

/// CORS configuration for the API
#[derive(Clone, Debug)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any, `*.example.com` allows subdomains
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<http::Method>,
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age:         u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "X-Requested-With".to_string(),
                "Accept".to_string(),
                "Origin".to_string(),
                "X-Request-ID".to_string(),
            ],
            exposed_headers: vec![
                "Content-Disposition".to_string(),
                "X-Request-ID".to_string(),
            ],
            max_age:         3600,
        }
    }
}

impl CorsConfig {
    /// Defaults, with origins taken from [`CORS_ORIGINS_ENV`] when set.
    pub fn from_env() -> Self {
        match std::env::var(CORS_ORIGINS_ENV) {
            Ok(origins) if !origins.trim().is_empty() => Self::with_origins(&origins),
            _ => Self::default(),
        }
    }

    /// Defaults with the given comma-separated origin list.
    pub fn with_origins(origins: &str) -> Self {
        Self {
            allowed_origins: origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            ..Self::default()
        }
    }

    fn allows(&self, origin: &str) -> bool { is_origin_allowed(origin, &self.allowed_origins) }
}

fn is_origin_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    allowed_origins.iter().any(|allowed| {
        if allowed == "*" {
            true
        }
        else if let Some(suffix) = allowed.strip_prefix('*') {
            origin.ends_with(suffix)
        }
        else {
            origin == allowed
        }
    })
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (name.parse::<HeaderName>(), value.parse::<HeaderValue>()) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        },
        _ => tracing::warn!(name, value, "Failed to insert header"),
    }
}

/// Adds conservative security headers to every response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    insert_header(
        headers,
        "Content-Security-Policy",
        "default-src 'none'; frame-ancestors 'none'",
    );
    insert_header(headers, "X-Frame-Options", "DENY");
    insert_header(headers, "X-Content-Type-Options", "nosniff");
    insert_header(
        headers,
        "Referrer-Policy",
        "strict-origin-when-cross-origin",
    );

    // File downloads set their own caching policy
    if !headers.contains_key(http::header::CACHE_CONTROL) {
        insert_header(headers, "Cache-Control", "no-store");
    }

    response
}

/// Answers preflight requests and decorates responses for allowed origins.
pub async fn cors_middleware(request: Request, next: Next, config: CorsConfig) -> Response {
    let origin = request
        .headers()
        .get(http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if request.method() == http::Method::OPTIONS {
        return match origin {
            Some(ref origin) if config.allows(origin) => preflight_response(origin, &config),
            _ => (StatusCode::FORBIDDEN, Body::empty()).into_response(),
        };
    }

    let mut response = next.run(request).await;

    if let Some(ref origin) = origin &&
        config.allows(origin)
    {
        let headers = response.headers_mut();
        insert_header(headers, "Access-Control-Allow-Origin", origin);
        insert_header(
            headers,
            "Access-Control-Expose-Headers",
            &config.exposed_headers.join(", "),
        );
        insert_header(headers, "Vary", "Origin");
    }

    response
}

fn preflight_response(origin: &str, config: &CorsConfig) -> Response {
    let mut response = (StatusCode::NO_CONTENT, Body::empty()).into_response();
    let headers = response.headers_mut();

    let methods = config
        .allowed_methods
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    insert_header(headers, "Access-Control-Allow-Origin", origin);
    insert_header(headers, "Access-Control-Allow-Methods", &methods);
    insert_header(
        headers,
        "Access-Control-Allow-Headers",
        &config.allowed_headers.join(", "),
    );
    insert_header(
        headers,
        "Access-Control-Max-Age",
        &config.max_age.to_string(),
    );
    insert_header(headers, "Vary", "Origin");

    response
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn ok_handler() -> &'static str { "OK" }

    fn app(config: CorsConfig) -> Router {
        Router::new()
            .route("/test", get(ok_handler))
            .layer(from_fn(move |req, next| {
                cors_middleware(req, next, config.clone())
            }))
            .layer(from_fn(security_headers_middleware))
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app(CorsConfig::default()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("cache-control").unwrap(), "no-store");
        assert!(headers.contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_preflight_allowed_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/test")
            .header("Origin", "https://app.devcollab.io")
            .body(Body::empty())
            .unwrap();
        let response = app(CorsConfig::with_origins("https://app.devcollab.io"))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "https://app.devcollab.io"
        );
        let methods = response
            .headers()
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_preflight_rejected_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/test")
            .header("Origin", "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app(CorsConfig::with_origins("https://app.devcollab.io"))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_simple_request_gets_allow_origin() {
        let request = Request::builder()
            .uri("/test")
            .header("Origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app(CorsConfig::default()).oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:5173"
        );
    }

    #[test]
    fn test_wildcard_subdomain() {
        let allowed = vec!["*.devcollab.io".to_string()];
        assert!(is_origin_allowed("https://app.devcollab.io", &allowed));
        assert!(!is_origin_allowed("https://devcollab.com", &allowed));
    }

    #[test]
    fn test_with_origins_skips_blanks() {
        let config = CorsConfig::with_origins("https://a.io, ,https://b.io");
        assert_eq!(config.allowed_origins, vec![
            "https://a.io".to_string(),
            "https://b.io".to_string()
        ]);
    }
}
