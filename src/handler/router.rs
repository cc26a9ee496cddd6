//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, method checks,
//! body limits, JSON decoding, and dispatch to the calculation tools.

use crate::config::AppState;
use crate::error::ApiError;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::tools::{Payload, Tool};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Version};
use serde::Serialize;
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const HEALTH_PATH: &str = "/api/health";

/// Body error type accepted by the router
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

const HEALTHY: HealthStatus = HealthStatus { status: "healthy" };

/// Resolved route for a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Health,
    Tool(Tool),
}

impl Route {
    fn resolve(path: &str) -> Option<Self> {
        if path == HEALTH_PATH {
            return Some(Self::Health);
        }
        Tool::from_path(path).map(Self::Tool)
    }

    const fn allow(self) -> &'static str {
        match self {
            Self::Health => "GET, OPTIONS",
            Self::Tool(_) => "POST, OPTIONS",
        }
    }
}

fn endpoints() -> Vec<&'static str> {
    std::iter::once(HEALTH_PATH)
        .chain(Tool::ALL.iter().map(|tool| tool.path()))
        .collect()
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;

    let entry = access_log.then(|| {
        let mut entry = AccessLogEntry::new(
            peer_addr.to_string(),
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry
    });

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let http_config = &state.config.http;

    // CORS preflight is answered for any path
    if req.method() == Method::OPTIONS {
        return http::build_options_response(http_config);
    }

    let Some(route) = Route::resolve(req.uri().path()) else {
        logger::log_debug(&format!("No route for {} {}", req.method(), req.uri().path()));
        return http::build_404_response(&endpoints(), http_config);
    };

    let method = req.method().clone();
    match (method, route) {
        (Method::GET, Route::Health) => {
            http::build_json_response(StatusCode::OK, &HEALTHY, http_config)
        }
        (Method::POST, Route::Tool(tool)) => run_tool(req, tool, state).await,
        (method, route) => {
            logger::log_warning(&format!(
                "Method not allowed: {method} {}",
                req.uri().path()
            ));
            http::build_405_response(route.allow(), http_config)
        }
    }
}

/// Decode the body, run the tool and convert any failure into a JSON error
async fn run_tool<B>(req: Request<B>, tool: Tool, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let http_config = &state.config.http;
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let result = match read_json_object(req, http_config.max_body_size).await {
        Ok(fields) => tool.run(&Payload::new(&fields)),
        Err(e) => Err(e),
    };

    match result {
        Ok(value) => http::build_json_response(StatusCode::OK, &value, http_config),
        Err(e) => {
            let status = e.status();
            let message = e.to_string();
            logger::log_client_error(&method, &path, status.as_u16(), &message);
            http::build_error_response(status, &message, http_config)
        }
    }
}

/// Read the request body, bounded by `limit` bytes, as a JSON object
pub async fn read_json_object<B>(req: Request<B>, limit: u64) -> Result<Map<String, Value>, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    if let Some(size) = content_length(req.headers()) {
        if size > limit {
            return Err(ApiError::BodyTooLarge { limit });
        }
    }

    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), max).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(ApiError::BodyTooLarge { limit });
        }
        Err(e) => return Err(ApiError::BodyRead(e.to_string())),
    };

    if bytes.is_empty() {
        return Err(ApiError::InvalidJson("request body is empty".to_string()));
    }

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::NotAnObject),
        Err(e) => Err(ApiError::InvalidJson(e.to_string())),
    }
}

/// Parse Content-Length, ignoring values that are not a plain integer
fn content_length(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(CONTENT_LENGTH)?;
    let Ok(size_str) = value.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.trim().parse::<u64>() {
        Ok(size) => Some(size),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
