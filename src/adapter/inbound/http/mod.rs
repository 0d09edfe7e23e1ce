//! HTTP front end for the evaluation pipeline.
//!
//! Every route answers with a JSON body and the CORS headers browsers need
//! to call the service from another origin:
//!
//! - `/evaluate` accepts any method and defers to [`Evaluator::handle`].
//! - `GET /usage` reports the caller's quota for the current day.

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use http_body_util::LengthLimitError;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::{ApiResponse, Evaluator};
use crate::domain::resolve_client_key;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::server::ServerConfig;
use crate::port::outbound::QuotaStore;

/// Largest request body read into memory.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Body returned when a request body exceeds [`MAX_BODY_BYTES`].
const BODY_TOO_LARGE: &str = "Request body exceeds maximum size of 1048576 bytes";

const ALLOWED_HEADERS: &str = "Content-Type";
const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Shared per-server state.
pub struct HttpState<S> {
    evaluator: Arc<Evaluator<S>>,
    behind_proxy: bool,
    allowed_origin: HeaderValue,
}

impl<S> Clone for HttpState<S> {
    fn clone(&self) -> Self {
        Self {
            evaluator: Arc::clone(&self.evaluator),
            behind_proxy: self.behind_proxy,
            allowed_origin: self.allowed_origin.clone(),
        }
    }
}

impl<S> HttpState<S> {
    /// Build state from the evaluator and server settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured origin is not a valid header value.
    pub fn new(evaluator: Arc<Evaluator<S>>, config: &ServerConfig) -> Result<Self> {
        let allowed_origin =
            HeaderValue::from_str(&config.allowed_origin).map_err(|_| ConfigError::InvalidValue {
                field: "allowed_origin",
                reason: format!("not a valid header value: {:?}", config.allowed_origin),
            })?;
        Ok(Self {
            evaluator,
            behind_proxy: config.behind_proxy,
            allowed_origin,
        })
    }

    /// Quota key for a request.
    ///
    /// The socket peer identifies the caller unless the server sits behind a
    /// proxy, in which case `X-Forwarded-For` is trusted.
    fn client_key(&self, peer: SocketAddr, headers: &HeaderMap) -> String {
        let peer_ip = (!self.behind_proxy).then(|| peer.ip().to_string());
        let pairs = headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)));
        resolve_client_key(peer_ip.as_deref(), pairs)
    }

    fn respond(&self, response: ApiResponse) -> Response {
        let status =
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut out = (status, response.body.to_string()).into_response();
        let headers = out.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allowed_origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        out
    }
}

/// Build the router. Requires the connect-info make-service so handlers can
/// see the peer address.
pub fn router<S>(state: HttpState<S>) -> Router
where
    S: QuotaStore + 'static,
{
    Router::new()
        .route("/evaluate", any(evaluate::<S>))
        .route("/usage", get(usage::<S>))
        .with_state(state)
}

async fn evaluate<S>(
    State(state): State<HttpState<S>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response
where
    S: QuotaStore + 'static,
{
    let method = request.method().as_str().to_owned();
    let client = state.client_key(peer, request.headers());
    let span = info_span!("request", request_id = %Uuid::new_v4(), %method, client = %client);

    async move {
        let body = match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
            Ok(bytes) if bytes.is_empty() => None,
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if exceeds_limit(&e) => {
                warn!(limit = MAX_BODY_BYTES, "Request body too large");
                return state.respond(ApiResponse::error(413, BODY_TOO_LARGE));
            }
            Err(e) => {
                warn!(error = %e, "Failed to read request body");
                return state.respond(ApiResponse::error(400, "Request body is required"));
            }
        };

        let response = state.evaluator.handle(&method, body.as_deref(), &client).await;
        info!(status = response.status, "Request finished");
        state.respond(response)
    }
    .instrument(span)
    .await
}

/// Whether a body read failed on the size limit rather than the transport.
fn exceeds_limit(error: &axum::Error) -> bool {
    let mut source = StdError::source(error);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

async fn usage<S>(
    State(state): State<HttpState<S>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response
where
    S: QuotaStore + 'static,
{
    let client = state.client_key(peer, &headers);
    let snapshot = state.evaluator.usage(&client).await;
    let body = serde_json::to_value(&snapshot).unwrap_or_default();
    state.respond(ApiResponse::ok(body))
}

/// Bind `config.bind` and serve until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve<S>(config: &ServerConfig, evaluator: Arc<Evaluator<S>>) -> Result<()>
where
    S: QuotaStore + 'static,
{
    let app = router(HttpState::new(evaluator, config)?);
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|e| Error::Connection(format!("failed to bind {}: {e}", config.bind)))?;
    let local = listener.local_addr()?;
    info!(addr = %local, behind_proxy = config.behind_proxy, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

impl<S> std::fmt::Debug for HttpState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState")
            .field("behind_proxy", &self.behind_proxy)
            .field("allowed_origin", &self.allowed_origin)
            .finish_non_exhaustive()
    }
}
