// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP server: `GET /{prefix}/kubernetes/health` and `GET /{prefix}/kubernetes/pods`.

use crate::config::Config;
use crate::error::Result;
use crate::health::HealthService;
use crate::kubernetes::PodLister;
use bytes::Bytes;
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN, VARY,
};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, Accept, Cache-Control";

/// Which request origins receive CORS headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Reflect any origin back
    AnyOrigin,
    AllowList(Vec<String>),
}

impl CorsPolicy {
    pub fn from_origins(origins: Option<&[String]>) -> Self {
        match origins {
            Some(list) => CorsPolicy::AllowList(list.to_vec()),
            None => CorsPolicy::AnyOrigin,
        }
    }

    fn allows(&self, origin: &str) -> bool {
        match self {
            CorsPolicy::AnyOrigin => true,
            CorsPolicy::AllowList(list) => list.iter().any(|o| o == origin),
        }
    }
}

/// Shared state handed to every connection
pub struct AppState {
    health: HealthService,
    pods: PodLister,
    health_path: String,
    pods_path: String,
    cors: CorsPolicy,
}

impl AppState {
    pub fn new(health: HealthService, pods: PodLister, api_prefix: &str, cors: CorsPolicy) -> Self {
        let base = if api_prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", api_prefix)
        };

        Self {
            health,
            pods,
            health_path: format!("{}/kubernetes/health", base),
            pods_path: format!("{}/kubernetes/pods", base),
            cors,
        }
    }

    pub fn from_config(health: HealthService, pods: PodLister, config: &Config) -> Self {
        Self::new(
            health,
            pods,
            &config.api_prefix,
            CorsPolicy::from_origins(config.cors_origins.as_deref()),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
}

/// Accept connections until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    info!("Server is running on {}", local_addr);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };
                let _ = stream.set_nodelay(true);
                let state = Arc::clone(&state);

                tokio::spawn(async move {
                    let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));
                    let io = TokioIo::new(stream);
                    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                        debug!("Connection from {} closed with error: {}", peer, e);
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

/// Route a single request. The body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let origin = req
        .headers()
        .get(ORIGIN)
        .filter(|o| o.to_str().is_ok_and(|o| state.cors.allows(o)))
        .cloned();
    let path = req.uri().path();

    let mut response = match (req.method(), path) {
        (&Method::OPTIONS, _) => preflight(),
        (&Method::GET, p) if p == state.health_path => {
            let health = state.health.get_health(true).await;
            json_response(StatusCode::OK, &health)
        }
        (&Method::GET, p) if p == state.pods_path => match state.pods.list_pods(None).await {
            Ok(pods) => json_response(StatusCode::OK, &pods),
            Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        },
        (method, p) => error_response(StatusCode::NOT_FOUND, &format!("Cannot {} {}", method, p)),
    };

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }

    Ok(response)
}

fn preflight() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
    response
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = Response::new(Full::new(Bytes::from(body)));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            warn!("Failed to serialize response body: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = ErrorBody {
        status_code: status.as_u16(),
        message: message.to_string(),
    };
    // ErrorBody has only a number and a string, serialization cannot fail
    let bytes = serde_json::to_vec(&body).unwrap_or_default();

    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
