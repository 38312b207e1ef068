use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer from the configured origin list.
///
/// An empty list or a `"*"` entry means permissive; otherwise only the named
/// origins are allowed.
pub fn build_cors_layer(cors_origins: &[String]) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors_origins.is_empty() || cors_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
        return layer;
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_wildcard_lists_build() {
        build_cors_layer(&[]);
        build_cors_layer(&["*".to_string()]);
    }

    #[test]
    fn test_explicit_origin_list_builds() {
        build_cors_layer(&["https://app.example.com".to_string()]);
    }
}
