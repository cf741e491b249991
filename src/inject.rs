//! Splicing rendered inclusions into HTML responses.

use crate::error::Result;
use crate::include::Inclusions;
use crate::utils::mime;

/// Request methods whose responses receive inclusions.
pub const METHODS: [&str; 3] = ["GET", "POST", "HEAD"];

/// Response media types that receive inclusions.
pub const CONTENT_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];

const HEAD_CLOSE: &[u8] = b"</head>";

/// Whether a response to `method` with `content_type` is eligible.
pub fn should_inject(method: &str, content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    METHODS.iter().any(|m| m.eq_ignore_ascii_case(method))
        && CONTENT_TYPES.contains(&mime::essence(content_type).as_str())
}

/// Insert `snippets` before the first `</head>`. Without the marker the body
/// is returned unchanged.
pub fn splice(body: Vec<u8>, snippets: &str) -> Vec<u8> {
    let Some(at) = body
        .windows(HEAD_CLOSE.len())
        .position(|window| window == HEAD_CLOSE)
    else {
        return body;
    };

    let mut out = Vec::with_capacity(body.len() + snippets.len());
    out.extend_from_slice(&body[..at]);
    out.extend_from_slice(snippets.as_bytes());
    out.extend_from_slice(&body[at..]);
    out
}

/// Render `inclusions` into `body` when the response is eligible.
///
/// Ineligible responses and requests that included nothing pass through
/// untouched. Render errors propagate for eligible responses even when the
/// body has no `</head>`.
pub fn inject(
    method: &str,
    content_type: Option<&str>,
    body: Vec<u8>,
    inclusions: Option<Inclusions>,
) -> Result<Vec<u8>> {
    let Some(inclusions) = inclusions else {
        return Ok(body);
    };
    if !should_inject(method, content_type) {
        return Ok(body);
    }
    let snippets = inclusions.render()?;
    Ok(splice(body, &snippets))
}
