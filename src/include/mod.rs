//! Request-scoped inclusion collection and rendering.
//!
//! An [`Includer`] resolves path specifiers against a collection and records
//! them into an [`Inclusions`] accumulator owned by the request. At response
//! time [`Inclusions::render`] expands every inclusion to its dependency
//! closure, orders it, and produces the snippet block.

pub mod toposort;

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::collection::{Collection, Resource, Target};
use crate::error::{Error, Result};
use crate::render::{Render, Renderer};
use toposort::topological_sort;

/// One "please render this resource" request.
#[derive(Debug, Clone)]
pub struct Inclusion {
    pub resource: Arc<Resource>,
    /// Overrides the registered render for this inclusion only.
    pub custom: Option<Render>,
}

/// Inclusions recorded during one request.
#[derive(Debug)]
pub struct Inclusions {
    renderer: Arc<Renderer>,
    items: Vec<Inclusion>,
}

impl Inclusions {
    pub fn new(renderer: Arc<Renderer>) -> Self {
        Self {
            renderer,
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, resource: Arc<Resource>, custom: Option<Render>) {
        self.items.push(Inclusion { resource, custom });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Inclusion> {
        self.items.iter()
    }

    /// Resources in render order: dependencies first, each resource once,
    /// independent resources in order of first inclusion.
    pub fn ordered(&self) -> Result<Vec<Arc<Resource>>> {
        topological_sort(
            self.items.iter().map(|inclusion| Arc::clone(&inclusion.resource)),
            Resource::identity,
            |resource| resource.dependencies(),
        )
        .map_err(|cycle| {
            let specs: Vec<_> = cycle.iter().map(|r| r.spec()).collect();
            Error::Cycle(specs.join(" -> "))
        })
    }

    /// Render every resource and join the snippets with `\n`.
    ///
    /// Resources pulled in only as dependencies use the registered render.
    /// When one resource was included several times, the first custom render
    /// given for it wins.
    pub fn render(self) -> Result<String> {
        let mut custom: FxHashMap<usize, &Render> = FxHashMap::default();
        for inclusion in &self.items {
            if let Some(render) = &inclusion.custom {
                custom
                    .entry(Resource::identity(&inclusion.resource))
                    .or_insert(render);
            }
        }

        let snippets = self
            .ordered()?
            .iter()
            .map(|resource| match custom.get(&Resource::identity(resource)) {
                Some(render) => render.render(resource),
                None => self.renderer.render(resource),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(snippets.join("\n"))
    }
}

/// Records inclusions from one collection into a request-scoped slot.
pub struct Includer<'a> {
    collection: &'a Collection,
    slot: &'a mut Option<Inclusions>,
}

impl<'a> Includer<'a> {
    pub(crate) fn new(collection: &'a Collection, slot: &'a mut Option<Inclusions>) -> Self {
        Self { collection, slot }
    }

    /// Resolve `target` and record one inclusion per resulting resource.
    ///
    /// Unknown components and files missing right now fail with
    /// `UnresolvedInclusion`. A component without renderable main files
    /// includes nothing.
    pub fn include(&mut self, target: impl Into<Target>, custom: Option<Render>) -> Result<()> {
        let target = target.into();
        let described = target.describe();
        let resources = self.collection.resolve(target).map_err(|e| match e {
            Error::MissingFile { .. } | Error::UnresolvedInclusion(_) => {
                Error::UnresolvedInclusion(described)
            }
            other => other,
        })?;

        let collection = self.collection;
        let inclusions = self
            .slot
            .get_or_insert_with(|| Inclusions::new(Arc::clone(collection.renderer())));
        for resource in resources.iter() {
            inclusions.add(Arc::clone(resource), custom.clone());
        }
        Ok(())
    }

    pub fn collection(&self) -> &Collection {
        self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    fn render(fx: &crate::testing::Fixture, specs: &[&str]) -> String {
        let mut slot = None;
        let mut includer = fx.components.includer(&mut slot);
        for spec in specs {
            includer.include(*spec, None).unwrap();
        }
        slot.unwrap().render().unwrap()
    }

    fn script(path: &str) -> String {
        format!(r#"<script type="text/javascript" src="/bowerstatic/components/{path}"></script>"#)
    }

    #[test]
    fn test_dependency_precedes_dependent() {
        let fx = fixture();
        assert_eq!(
            render(&fx, &["jquery-ui"]),
            [script("jquery/2.1.1/dist/jquery.js"), script("jquery-ui/1.10.4/ui/jquery-ui.js")].join("\n")
        );
    }

    #[test]
    fn test_repeated_inclusion_renders_once() {
        let fx = fixture();
        assert_eq!(render(&fx, &["jquery", "jquery"]), render(&fx, &["jquery"]));
        assert_eq!(
            render(&fx, &["jquery-ui", "jquery"]),
            render(&fx, &["jquery", "jquery-ui"])
        );
    }

    #[test]
    fn test_independent_keep_inclusion_order() {
        let fx = fixture();
        let out = render(&fx, &["jquery/dist/jquery.min.js", "jquery"]);
        assert_eq!(
            out,
            [script("jquery/2.1.1/dist/jquery.min.js"), script("jquery/2.1.1/dist/jquery.js")].join("\n")
        );
    }

    #[test]
    fn test_transitive_closure() {
        let fx = fixture();
        let out = render(&fx, &["jquery-ui-bootstrap"]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("/jquery/2.1.1/dist/jquery.js"));
        assert!(lines[1].contains("/jquery-ui/1.10.4/ui/jquery-ui.js"));
        assert!(lines[2].contains("/jquery-ui-bootstrap/0.2.5/jquery.ui.theme.css"));
    }

    #[test]
    fn test_multi_main_and_dependents() {
        let fx = fixture();
        let out = render(&fx, &["depends_on_multi_main"]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(r#"/multi_main/2.1.1/dist/jquery.js"></script>"#));
        assert!(lines[1].ends_with(r#"/multi_main/2.1.1/dist/another.js"></script>"#));
        assert!(lines[2].contains("/depends_on_multi_main/"));
    }

    #[test]
    fn test_missing_main_includes_nothing() {
        let fx = fixture();
        let mut slot = None;
        fx.components.includer(&mut slot).include("missing_main", None).unwrap();
        let inclusions = slot.unwrap();
        assert!(inclusions.is_empty());
        assert_eq!(inclusions.render().unwrap(), "");

        let out = render(&fx, &["depends_on_missing_main"]);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_unresolved_inclusion() {
        let fx = fixture();
        let mut slot = None;
        let mut includer = fx.components.includer(&mut slot);

        let err = includer.include("nonexistent/nonexistent.js", None).unwrap_err();
        assert!(matches!(err, Error::UnresolvedInclusion(ref s) if s == "nonexistent/nonexistent.js"));

        let err = includer.include("jquery/nonexistent.js", None).unwrap_err();
        assert!(matches!(err, Error::UnresolvedInclusion(_)));
        assert!(slot.is_none());
    }

    #[test]
    fn test_render_error_for_unknown_extension() {
        let fx = fixture();
        let mut slot = None;
        fx.components
            .includer(&mut slot)
            .include("jquery/dist/resource.foo", None)
            .unwrap();
        let err = slot.unwrap().render().unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
    }

    #[test]
    fn test_custom_render_overrides_inclusion_only() {
        let fx = fixture();
        let mut slot = None;
        let mut includer = fx.components.includer(&mut slot);
        includer
            .include("jquery-ui", Some(Render::from(r#"<link src="{url}">"#)))
            .unwrap();

        let out = slot.unwrap().render().unwrap();
        assert_eq!(
            out,
            [
                script("jquery/2.1.1/dist/jquery.js"),
                r#"<link src="/bowerstatic/components/jquery-ui/1.10.4/ui/jquery-ui.js">"#.to_string(),
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_first_custom_render_wins() {
        let fx = fixture();
        let mut slot = None;
        let mut includer = fx.components.includer(&mut slot);
        includer.include("jquery", Some(Render::from("<a>{url}</a>"))).unwrap();
        includer.include("jquery", Some(Render::from("<b>{url}</b>"))).unwrap();
        includer.include("jquery", None).unwrap();

        let out = slot.unwrap().render().unwrap();
        assert_eq!(out, "<a>/bowerstatic/components/jquery/2.1.1/dist/jquery.js</a>");
    }

    #[test]
    fn test_include_resource_object() {
        let fx = fixture();
        let jquery = fx.one("jquery/dist/jquery.js");
        let mut slot = None;
        fx.components.includer(&mut slot).include(&jquery, None).unwrap();
        assert_eq!(slot.unwrap().render().unwrap(), script("jquery/2.1.1/dist/jquery.js"));
    }

    #[test]
    fn test_includers_share_slot() {
        let fx = fixture();
        let local = fx.bower.local_components("local", &fx.components).unwrap();
        let mut slot = None;
        fx.components.includer(&mut slot).include("jquery", None).unwrap();
        local.includer(&mut slot).include("jquery-ui", None).unwrap();

        assert_eq!(slot.as_ref().unwrap().len(), 2);
        assert_eq!(slot.unwrap().render().unwrap().lines().count(), 2);
    }
}
