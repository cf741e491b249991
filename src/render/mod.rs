//! Markup renderers for resources.
//!
//! A [`Render`] is either a template with `{url}` / `{content}` placeholders
//! or a function. The [`Renderer`] registry maps file extensions to the
//! default render for resources of that kind; an inclusion may carry its own
//! [`Render`] that overrides the default for that inclusion only.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::collection::Resource;
use crate::error::{Error, Result};

/// Function renderer.
pub type RenderFn = Arc<dyn Fn(&Resource) -> Result<String> + Send + Sync>;

/// Placeholder replaced with the resource URL.
const URL: &str = "{url}";

/// Placeholder replaced with the raw file content (inline variants).
const CONTENT: &str = "{content}";

/// How a resource becomes a markup snippet.
#[derive(Clone)]
pub enum Render {
    Template(String),
    Function(RenderFn),
}

impl Render {
    pub fn template(pattern: impl Into<String>) -> Self {
        Self::Template(pattern.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Resource) -> Result<String> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// `<script src>` for JavaScript.
    pub fn script() -> Self {
        Self::template(r#"<script type="text/javascript" src="{url}"></script>"#)
    }

    /// `<link rel="stylesheet">` for CSS.
    pub fn stylesheet() -> Self {
        Self::template(r#"<link rel="stylesheet" type="text/css" href="{url}">"#)
    }

    /// Script body embedded in the page.
    pub fn inline_script() -> Self {
        Self::template(r#"<script type="text/javascript">{content}</script>"#)
    }

    /// Stylesheet body embedded in the page.
    pub fn inline_style() -> Self {
        Self::template(r#"<style type="text/css">{content}</style>"#)
    }

    /// `<link rel="icon">` for favicons.
    pub fn icon() -> Self {
        Self::template(r#"<link rel="icon" href="{url}">"#)
    }

    /// `<link rel="preload" as="image">` for images.
    pub fn image() -> Self {
        Self::template(r#"<link rel="preload" as="image" href="{url}">"#)
    }

    /// Look up a ready-made render by name (`inline-script`, `icon`, ...).
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "script" => Some(Self::script()),
            "stylesheet" => Some(Self::stylesheet()),
            "inline-script" => Some(Self::inline_script()),
            "inline-style" => Some(Self::inline_style()),
            "icon" => Some(Self::icon()),
            "image" => Some(Self::image()),
            _ => None,
        }
    }

    /// Produce the snippet for `resource`.
    pub fn render(&self, resource: &Resource) -> Result<String> {
        match self {
            Self::Template(pattern) => {
                let mut out = pattern.replace(URL, &resource.url()?);
                if pattern.contains(CONTENT) {
                    out = out.replace(CONTENT, &resource.content()?);
                }
                Ok(out)
            }
            Self::Function(f) => f(resource),
        }
    }
}

impl fmt::Debug for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(pattern) => f.debug_tuple("Template").field(pattern).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for Render {
    fn from(pattern: &str) -> Self {
        Self::template(pattern)
    }
}

impl From<String> for Render {
    fn from(pattern: String) -> Self {
        Self::Template(pattern)
    }
}

/// Extension -> default render registry.
#[derive(Debug)]
pub struct Renderer {
    renderers: RwLock<FxHashMap<String, Render>>,
}

impl Default for Renderer {
    fn default() -> Self {
        let renderer = Self {
            renderers: RwLock::new(FxHashMap::default()),
        };
        renderer.register(".js", Render::script());
        renderer.register(".css", Render::stylesheet());
        renderer
    }
}

impl Renderer {
    /// Registry with the built-in `.js` and `.css` renders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the render for an extension. `js` and `.js` are
    /// equivalent.
    pub fn register(&self, ext: &str, render: impl Into<Render>) {
        self.renderers
            .write()
            .insert(normalize_ext(ext), render.into());
    }

    pub fn has(&self, ext: &str) -> bool {
        self.renderers.read().contains_key(&normalize_ext(ext))
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<String> {
        let mut exts: Vec<_> = self.renderers.read().keys().cloned().collect();
        exts.sort();
        exts
    }

    /// Render with the default for the resource's extension.
    pub fn render(&self, resource: &Resource) -> Result<String> {
        let render = self.renderers.read().get(resource.ext()).cloned();
        match render {
            Some(render) => render.render(resource),
            None => Err(Error::Render {
                ext: resource.ext().to_string(),
                url: resource.url()?,
            }),
        }
    }
}

fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
