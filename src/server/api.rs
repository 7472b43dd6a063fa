use crate::agent::OrbAgent;
use crate::cli::Args;
use crate::error::ChatError;
use crate::models::chat::{ ChatRequest, ChatResponse };
use crate::rate_limit::FixedWindowLimiter;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{ Duration, Instant };
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{ get, post },
    Json,
    Router,
};
use axum_server::Handle;
use serde_json::json;
use std::future::Future;
use tower_http::cors::{ Any, CorsLayer };
use log::{ debug, info, warn, error };
use uuid::Uuid;

pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

const FALLBACK_CLIENT_KEY: &str = "local";

/// How long in-flight HTTPS requests get to finish after shutdown starts.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<OrbAgent>,
    pub limiter: Arc<FixedWindowLimiter>,
    pub rate_limit_per_min: u32,
}

impl AppState {
    pub fn new(agent: OrbAgent, rate_limit_per_min: u32) -> Self {
        Self {
            agent: Arc::new(agent),
            limiter: Arc::new(FixedWindowLimiter::new()),
            rate_limit_per_min,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then a shared fallback key.
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    forwarded.or(real_ip).unwrap_or(FALLBACK_CLIENT_KEY).to_string()
}

async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, ChatError> {
    let request_id = Uuid::new_v4().to_string();
    let client = client_key(&headers);

    let now = Instant::now();
    let decision = state.limiter.check_at(&client, state.rate_limit_per_min, RATE_LIMIT_WINDOW, now);
    if !decision.allowed {
        warn!("[{}] Rate limit exceeded for {}", request_id, client);
        return Err(ChatError::RateLimited { retry_after: decision.retry_after(now) });
    }

    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("[{}] Unparseable body from {}: {}", request_id, client, e);
        ChatError::InvalidBody(e.to_string())
    })?;

    let messages = request.messages.unwrap_or_default();
    info!(
        "[{}] Chat request from {} (session {}, {} messages, {} remaining this window)",
        request_id,
        client,
        request.session_id.as_deref().unwrap_or("-"),
        messages.len(),
        decision.remaining
    );

    let reply = state.agent.process_chat(&request_id, &messages).await?;
    Ok(Json(reply))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn spawn_limiter_pruning(limiter: Arc<FixedWindowLimiter>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RATE_LIMIT_WINDOW);
        loop {
            ticker.tick().await;
            let removed = limiter.prune_expired(Instant::now());
            if removed > 0 {
                debug!("Pruned {} expired rate limit buckets ({} tracked)", removed, limiter.tracked_keys());
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn drain_on_signal(handle: Handle, signal: impl Future<Output = ()>) {
    signal.await;
    handle.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
}

pub async fn start_http_server(
    state: AppState,
    args: &Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;

    spawn_limiter_pruning(state.limiter.clone());
    let app = router(state);

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => (cert_path, key_path),
            _ => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err("TLS enabled without cert/key".into());
            }
        };
        info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        let handle = Handle::new();
        tokio::spawn(drain_on_signal(handle.clone(), shutdown_signal()));

        info!("Starting HTTPS server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;

        info!("Starting HTTP server on: http://{}", addr);
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    Ok(())
}
