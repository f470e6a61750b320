//! Axum middleware running a filter pipeline in front of a service

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        uri::PathAndQuery,
        Request as HttpRequest, StatusCode, Uri,
    },
    middleware::Next,
    response::{IntoResponse, Response as HttpResponse},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::BadRequestError;
use crate::filter::{Pipeline, Request, Response};

/// Run `pipeline` and forward the (possibly rewritten) request, or answer 400 on rejection
pub async fn filter_middleware(
    State(pipeline): State<Arc<Pipeline>>,
    mut req: HttpRequest<Body>,
    next: Next,
) -> HttpResponse {
    let mut filter_req = to_filter_request(&req);
    let original_path = filter_req.path.clone();
    let mut filter_res = Response::new();

    if let Err(e) = pipeline.run(&mut filter_req, &mut filter_res) {
        return rejection_response(&e);
    }

    if filter_req.path != original_path {
        match rewrite_uri(req.uri(), &filter_req.path) {
            Ok(uri) => {
                debug!(from = %original_path, to = %uri, "Request path rewritten");
                *req.uri_mut() = uri;
            }
            Err(e) => return rejection_response(&e),
        }
    }

    let mut response = next.run(req).await;
    copy_headers(&filter_res, response.headers_mut());
    response
}

/// Build the filter view of an HTTP request
///
/// The path keeps its query string. Header lookups ignore case since `HeaderMap` already folds it.
pub fn to_filter_request(req: &HttpRequest<Body>) -> Request {
    let path = req
        .uri()
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or_else(|| req.uri().path());

    let mut filter_req = Request::new(req.method().as_str(), path).with_case_insensitive_headers();

    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            filter_req.headers.insert(name.as_str().to_string(), value.to_string());
        }
    }

    // absolute-form and HTTP/2 requests carry the host in the URI
    if filter_req.host().is_none() {
        if let Some(authority) = req.uri().authority() {
            filter_req
                .headers
                .insert(header::HOST.as_str().to_string(), authority.as_str().to_string());
        }
    }

    filter_req.cookies = parse_cookies(req.headers());
    filter_req
}

/// Render a rejection as its status code with the serialized error record
pub fn rejection_response(err: &BadRequestError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(err.to_record())).into_response()
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn rewrite_uri(uri: &Uri, path: &str) -> Result<Uri, BadRequestError> {
    let path_and_query = path
        .parse::<PathAndQuery>()
        .map_err(|e| BadRequestError::new(format!("rewritten path '{}' is invalid: {}", path, e)))?;

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts)
        .map_err(|e| BadRequestError::new(format!("rewritten uri is invalid: {}", e)))
}

fn copy_headers(filter_res: &Response, headers: &mut HeaderMap) {
    for (name, value) in &filter_res.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid response header set by filter"),
        }
    }
}
