use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::http::routes::{comments, health, posts};
use crate::state::AppState;

pub fn build(state: AppState) -> Router {
    let cors = build_cors(&state);
    let static_files = ServeDir::new(&state.config.static_dir);
    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/home", get(posts::list_posts))
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::edit_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/comments", post(comments::add_comment))
        .route(
            "/posts/{id}/comments/{comment_id}",
            put(comments::edit_comment).delete(comments::delete_comment),
        )
        .route(
            "/posts/{id}/comments/{comment_id}/replies",
            post(comments::reply_comment),
        )
        .nest_service("/static", static_files)
        .with_state(state);
    if let Some(cors) = cors {
        router = router.layer(cors);
    }
    router
}

fn build_cors(state: &AppState) -> Option<CorsLayer> {
    let mut origins = Vec::new();
    let mut allow_any = false;
    for origin in state.config.cors_allow_origins.iter() {
        if is_wildcard_origin(origin) {
            allow_any = true;
            break;
        }
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => origins.push(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "invalid CORS origin ignored");
            }
        }
    }

    if !allow_any && origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new().allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ]);
    if allow_any {
        Some(cors.allow_origin(Any).allow_headers(Any))
    } else {
        Some(
            cors.allow_origin(AllowOrigin::list(origins))
                .allow_headers([CONTENT_TYPE]),
        )
    }
}

fn is_wildcard_origin(origin: &str) -> bool {
    origin.trim() == "*"
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::{build, build_cors, is_wildcard_origin};
    use crate::config::AppConfig;
    use crate::wiring::build_state;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_posts_dir_and_lock_policy() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("posts");
        fs::create_dir(&posts_dir).unwrap();
        let router = build(build_state(AppConfig {
            posts_dir: posts_dir.clone(),
            ..AppConfig::default()
        }));

        let response = router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["posts"]["dir"], posts_dir.display().to_string());
        assert_eq!(body["posts"]["dir_exists"], true);
        assert_eq!(body["posts"]["locks"], "keyed");
        assert_eq!(body["posts"]["edit_applies_media"], false);
    }

    #[tokio::test]
    async fn static_mount_serves_files_from_static_dir() {
        let dir = TempDir::new().unwrap();
        let static_dir = dir.path().join("static");
        fs::create_dir(&static_dir).unwrap();
        fs::write(static_dir.join("site.css"), "body { margin: 0; }").unwrap();
        let router = build(build_state(AppConfig {
            posts_dir: dir.path().join("posts"),
            static_dir,
            ..AppConfig::default()
        }));

        let response = router.clone().oneshot(get("/static/site.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"body { margin: 0; }");

        let response = router.oneshot(get("/static/missing.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn wildcard_origin_matches_trimmed_star() {
        assert!(is_wildcard_origin("*"));
        assert!(is_wildcard_origin(" * "));
        assert!(!is_wildcard_origin("https://example.com"));
    }

    #[test]
    fn cors_requires_origin_or_wildcard() {
        let mut state = build_state(AppConfig::default());
        assert!(build_cors(&state).is_none());

        state.config = Arc::new(AppConfig {
            cors_allow_origins: vec!["https://example.com".to_string()],
            ..AppConfig::default()
        });
        assert!(build_cors(&state).is_some());

        state.config = Arc::new(AppConfig {
            cors_allow_origins: vec!["*".to_string()],
            ..AppConfig::default()
        });
        assert!(build_cors(&state).is_some());
    }
}
