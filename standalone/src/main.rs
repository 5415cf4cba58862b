use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Uri},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use relay_lib::{RelayConfig, RelayHandler, RelayRequest};
use tower_http::trace::TraceLayer;
use tracing::level_filters;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod env;

type SharedAppState = Arc<RelayHandler>;

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level_filters::LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env();
    warn_on_incomplete_config(&config);
    tracing::info!("Loaded relay config: {:?}", config);

    let app = router(Arc::new(RelayHandler::new(config)));

    let server_port = env::get_server_port();
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind port {}: {}", server_port, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Server started at localhost:{}", server_port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn router(handler: SharedAppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/", post(handle_post))
        .route("/{*path}", post(handle_post))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

fn warn_on_incomplete_config(config: &RelayConfig) {
    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set, every request will be rejected");
    }
    if config.warning_webhook_url.is_none() {
        tracing::warn!("DISCORD_WEBHOOK_URL_WARNING is not set, /warning will be rejected");
    }
    if config.critical_webhook_url.is_none() {
        tracing::warn!("DISCORD_WEBHOOK_URL_CRITICAL is not set, /critical will be rejected");
    }
}

// body stays raw so malformed json is reported by the relay itself, after the key check
async fn handle_post(
    State(handler): State<SharedAppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    handler.handle(RelayRequest::new(uri.path(), headers, body)).await
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        router(Arc::new(RelayHandler::new(RelayConfig {
            api_key: Some("s3cret".to_string()),
            warning_webhook_url: None,
            critical_webhook_url: None,
            debug_mode: false,
            auto_colors: true,
        })))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let response = app()
            .oneshot(Request::get("/healthcheck").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn post_without_key_is_unauthorized() {
        let response = app()
            .oneshot(Request::post("/warning").body(Body::from("{}")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Invalid or missing API key");
    }

    #[tokio::test]
    async fn post_to_unconfigured_channel_is_bad_request() {
        let response = app()
            .oneshot(
                Request::post("/critical")
                    .header("X-API-Key", "s3cret")
                    .body(Body::from(r#"{"embeds": [{"title": "db down"}]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid webhook path");
    }

    #[tokio::test]
    async fn post_to_root_is_bad_request() {
        let response = app()
            .oneshot(
                Request::post("/")
                    .header("X-API-Key", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
