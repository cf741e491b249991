//! URL to page path resolution for the host application.

use bowerstatic::utils::fs::safe_join;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Resolve a request URL to a page under `root`, using `index.html` for
/// directories. Paths escaping `root` resolve to nothing.
pub fn resolve_page(url: &str, root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);
    if clean.is_empty() {
        return safe_join(root, "index.html");
    }
    safe_join(root, &clean).or_else(|| safe_join(root, &format!("{clean}/index.html")))
}

/// Strip query string, decode, trim slashes.
fn normalize_url(url: &str) -> String {
    let path = url.split('?').next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_default();

    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_page() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/index.html"), "<html></html>").unwrap();

        assert!(resolve_page("/", dir.path()).unwrap().ends_with("index.html"));
        assert!(resolve_page("/docs/", dir.path()).unwrap().ends_with("docs/index.html"));
        assert!(resolve_page("/docs?x=1", dir.path()).is_some());
        assert!(resolve_page("/missing.html", dir.path()).is_none());
        assert!(resolve_page("/../../etc/passwd", dir.path()).is_none());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/a/b/?q=1"), "a/b");
        assert_eq!(normalize_url("/caf%C3%A9/"), "café");
        assert_eq!(normalize_url("/why%3F.html?q=1"), "why?.html");
    }

    #[test]
    fn test_resolve_page_with_encoded_question_mark() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("why?.html"), "<html></html>").unwrap();
        let page = resolve_page("/why%3F.html?q=1", dir.path()).unwrap();
        assert!(page.ends_with("why?.html"));
    }
}
