//! HTTP response helpers.

use anyhow::{Context, Result};
use bowerstatic::PublishedFile;
use bowerstatic::utils::html::escape;
use bowerstatic::utils::mime::types::{HTML, PLAIN};
use std::fs;
use std::time::SystemTime;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a published component file and forever-cache headers.
pub fn respond_published(request: Request, file: &PublishedFile) -> Result<u16> {
    let mut headers = vec![make_header("Content-Type", file.content_type)?];
    for (key, value) in file.cache_headers(SystemTime::now()) {
        headers.push(make_header(key, &value)?);
    }

    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(200));
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
        return Ok(200);
    }

    let body = fs::read(&file.path)
        .with_context(|| format!("failed to read {}", file.path.display()))?;
    let mut response = Response::from_data(body);
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(200)
}

/// Respond with a page body (already injected).
pub fn respond_page(request: Request, content_type: &str, body: Vec<u8>) -> Result<u16> {
    send_body(request, 200, content_type, body)
}

pub fn respond_not_found(request: Request) -> Result<u16> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<u16> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with an include or render failure (500).
pub fn respond_error(request: Request, error: &anyhow::Error) -> Result<u16> {
    let error_str = format!("{error:#}");
    let msg = escape(&error_str);
    let body = format!("<html><body><h1>Include Error</h1><pre>{msg}</pre></body></html>");
    send_body(request, 500, HTML, body.into_bytes())
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<u16> {
    let response = if is_head_request(&request) {
        Response::from_data(Vec::new())
    } else {
        Response::from_data(body)
    };
    let response = response
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(status)
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid header {key}: {value}"))
}
