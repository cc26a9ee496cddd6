//! HTTP response building module
//!
//! JSON response builders. Every response carries the `Server` header and,
//! when CORS is enabled, `Access-Control-Allow-Origin: *`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::json;

use crate::config::HttpConfig;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Methods and headers advertised on CORS preflight
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const CORS_ALLOW_HEADERS: &str = "Content-Type";

fn base_builder(status: StatusCode, http: &HttpConfig) -> Builder {
    let builder = Response::builder()
        .status(status)
        .header("Server", http.server_name.as_str());
    if http.enable_cors {
        builder.header("Access-Control-Allow-Origin", "*")
    } else {
        builder
    }
}

/// Build JSON response
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                http,
            );
        }
    };

    base_builder(status, http)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build `{"error": message}` response
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let body = json!({ "error": message }).to_string();
    base_builder(status, http)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response listing the served endpoints
pub fn build_404_response(endpoints: &[&str], http: &HttpConfig) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::NOT_FOUND,
        &json!({ "error": "Not Found", "available_endpoints": endpoints }),
        http,
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str, http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut response =
        build_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", http);
    if let Ok(value) = allow.parse() {
        response.headers_mut().insert("Allow", value);
    }
    response
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = base_builder(StatusCode::NO_CONTENT, http).header("Allow", CORS_ALLOW_METHODS);

    if http.enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", CORS_ALLOW_METHODS)
            .header("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS)
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error(StatusCode::NO_CONTENT, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
