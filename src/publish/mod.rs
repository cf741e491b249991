//! Versioned static file publishing.
//!
//! Published addresses have the form
//! `/{signature}/{collection}/{component}/{version}/{file...}`. A request is
//! answered only when `version` is the component's current effective
//! version, so the bytes behind an address never change and can be cached
//! forever. Every mismatch is a plain not-found.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::bower::Bower;
use crate::debug;
use crate::utils::date::DateTimeUtc;
use crate::utils::mime;

/// Ten years, in seconds.
pub const FOREVER: u64 = 315_360_000;

/// A published file ready to be streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedFile {
    pub path: PathBuf,
    pub content_type: &'static str,
}

impl PublishedFile {
    /// `Cache-Control` and `Expires` headers relative to `now`.
    pub fn cache_headers(&self, now: SystemTime) -> [(&'static str, String); 2] {
        cache_headers(now)
    }
}

/// Outcome of routing a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Not a published address; hand to the host application.
    PassThrough,
    NotFound,
    File(PublishedFile),
}

/// Maps published addresses to files of registered components.
#[derive(Debug, Clone)]
pub struct Publisher {
    bower: Arc<Bower>,
}

impl Publisher {
    pub fn new(bower: Arc<Bower>) -> Self {
        Self { bower }
    }

    pub fn bower(&self) -> &Arc<Bower> {
        &self.bower
    }

    /// Route a request path (query string allowed).
    pub fn route(&self, url: &str) -> Route {
        let raw = url.split('?').next().unwrap_or_default();
        let path = decode(raw);
        let mut segments = path.trim_start_matches('/').splitn(5, '/');

        if segments.next() != Some(self.bower.signature()) {
            return Route::PassThrough;
        }

        let (Some(collection), Some(component), Some(version), Some(file)) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Route::NotFound;
        };
        if file.is_empty() {
            return Route::NotFound;
        }

        match self.bower.get_filename(collection, component, version, file) {
            Some(path) => Route::File(PublishedFile {
                content_type: mime::from_path(&path),
                path,
            }),
            None => {
                debug!("publish"; "not found: {}", path);
                Route::NotFound
            }
        }
    }
}

/// `Cache-Control: max-age` and `Expires` for a forever-cacheable response.
pub fn cache_headers(now: SystemTime) -> [(&'static str, String); 2] {
    let expires = DateTimeUtc::from_system_time(now + Duration::from_secs(FOREVER));
    [
        ("Cache-Control", format!("max-age={FOREVER}")),
        ("Expires", expires.to_http_date()),
    ]
}

fn decode(url: &str) -> Cow<'_, str> {
    percent_decode_str(url)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use std::fs;
    use std::time::UNIX_EPOCH;

    fn publisher() -> (crate::testing::Fixture, Publisher) {
        let fx = fixture();
        let publisher = Publisher::new(Arc::clone(&fx.bower));
        (fx, publisher)
    }

    fn file(route: Route) -> PublishedFile {
        match route {
            Route::File(file) => file,
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_file() {
        let (_fx, publisher) = publisher();
        let published = file(publisher.route("/bowerstatic/components/jquery/2.1.1/dist/jquery.js"));
        assert_eq!(published.content_type, mime::types::JAVASCRIPT);
        assert_eq!(fs::read_to_string(&published.path).unwrap(), "/* jquery.js 2.1.1 */\n");

        let css = file(publisher.route(
            "/bowerstatic/components/jquery-ui-bootstrap/0.2.5/jquery.ui.theme.css",
        ));
        assert_eq!(css.content_type, mime::types::CSS);
    }

    #[test]
    fn test_query_and_encoding() {
        let (_fx, publisher) = publisher();
        assert!(matches!(
            publisher.route("/bowerstatic/components/jquery/2.1.1/dist/jquery.js?v=1"),
            Route::File(_)
        ));
        assert!(matches!(
            publisher.route("/bowerstatic/components/jquery/2.1.1/dist%2Fjquery.js"),
            Route::File(_)
        ));
    }

    #[test]
    fn test_pass_through() {
        let (_fx, publisher) = publisher();
        assert_eq!(publisher.route("/"), Route::PassThrough);
        assert_eq!(publisher.route("/index.html"), Route::PassThrough);
        assert_eq!(publisher.route("/bowerstaticx/components"), Route::PassThrough);
    }

    #[test]
    fn test_not_found() {
        let (_fx, publisher) = publisher();
        let cases = [
            "/bowerstatic",
            "/bowerstatic/",
            "/bowerstatic/components",
            "/bowerstatic/components/jquery",
            "/bowerstatic/components/jquery/2.1.1",
            "/bowerstatic/components/jquery/2.1.1/",
            "/bowerstatic/components/jquery/2.1.1/dist/nonexistent.js",
            "/bowerstatic/components/jquery/2.1.0/dist/jquery.js",
            "/bowerstatic/components/nonexistent/2.1.1/dist/jquery.js",
            "/bowerstatic/nonexistent/jquery/2.1.1/dist/jquery.js",
            "/bowerstatic/components/jquery/2.1.1/../../../secret",
            "/bowerstatic/components/jquery/2.1.1/%2e%2e/%2e%2e/%2e%2e/secret",
            "/bowerstatic/components/jquery/2.1.1/dist",
        ];
        for case in cases {
            assert_eq!(publisher.route(case), Route::NotFound, "{case}");
        }
    }

    #[test]
    fn test_custom_signature() {
        let fx = fixture();
        let bower = Arc::new(Bower::with_signature("static"));
        bower.components("components", fx.dir.path()).unwrap();
        let publisher = Publisher::new(bower);

        assert!(matches!(
            publisher.route("/static/components/jquery/2.1.1/dist/jquery.js"),
            Route::File(_)
        ));
        assert_eq!(
            publisher.route("/bowerstatic/components/jquery/2.1.1/dist/jquery.js"),
            Route::PassThrough
        );
    }

    #[test]
    fn test_cache_headers() {
        let [cache_control, expires] = cache_headers(UNIX_EPOCH);
        assert_eq!(cache_control, ("Cache-Control", "max-age=315360000".to_string()));
        // 1970 + 10 * 365 days, two leap days short of ten calendar years
        assert_eq!(expires, ("Expires", "Sun, 30 Dec 1979 00:00:00 GMT".to_string()));
    }
}
