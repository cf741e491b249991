//! Shared test fixtures: an installed components directory on a `TempDir`.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::Bower;
use crate::collection::{Collection, Resource};

pub struct Fixture {
    pub dir: TempDir,
    pub bower: Arc<Bower>,
    pub components: Arc<Collection>,
}

impl Fixture {
    /// Resolve `spec` to exactly one resource.
    pub fn one(&self, spec: &str) -> Arc<Resource> {
        let resources = self.components.resource(spec).unwrap();
        assert_eq!(resources.len(), 1, "{spec} resolved to {} resources", resources.len());
        Arc::clone(&resources[0])
    }
}

/// Write a component directory: its descriptor plus `files` (relative path, content).
pub fn write_component(dir: &Path, descriptor: &str, json: &str, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(descriptor), json).unwrap();
    for (path, content) in files {
        let path = dir.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn installed(root: &Path, name: &str, json: &str, files: &[(&str, &str)]) {
    write_component(&root.join(name), ".bower.json", json, files);
}

/// `bower_components` tree registered as collection `components`.
pub fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    installed(
        root,
        "jquery",
        r#"{"name": "jquery", "version": "2.1.1", "main": "dist/jquery.js"}"#,
        &[
            ("dist/jquery.js", "/* jquery.js 2.1.1 */\n"),
            ("dist/jquery.min.js", "/* jquery.min.js 2.1.1 */\n"),
            ("dist/resource.foo", "foo\n"),
        ],
    );
    installed(
        root,
        "jquery-ui",
        r#"{"name": "jquery-ui", "version": "1.10.4", "main": ["ui/jquery-ui.js"],
            "dependencies": {"jquery": ">=1.6"}}"#,
        &[
            ("ui/jquery-ui.js", "/* jquery-ui.js 1.10.4 */\n"),
            ("ui/minified/jquery-ui.min.js", "/* jquery-ui.min.js 1.10.4 */\n"),
        ],
    );
    installed(
        root,
        "jquery-ui-bootstrap",
        r#"{"name": "jquery-ui-bootstrap", "version": "0.2.5", "main": "./jquery.ui.theme.css",
            "dependencies": {"jquery-ui": "~1.10.4"}}"#,
        &[("jquery.ui.theme.css", "/* theme */\n")],
    );
    installed(
        root,
        "multi_main",
        r#"{"name": "multi_main", "version": "2.1.1", "main": ["dist/jquery.js", "dist/another.js"]}"#,
        &[("dist/jquery.js", "/* multi jquery */\n"), ("dist/another.js", "/* another */\n")],
    );
    installed(
        root,
        "depends_on_multi_main",
        r#"{"name": "depends_on_multi_main", "version": "2.1.1", "main": "dist/resource.js",
            "dependencies": {"multi_main": "2.1.1"}}"#,
        &[("dist/resource.js", "/* resource */\n")],
    );
    installed(
        root,
        "missing_main",
        r#"{"name": "missing_main", "version": "2.1.1"}"#,
        &[("dist/jquery.js", "/* unused */\n")],
    );
    installed(
        root,
        "depends_on_missing_main",
        r#"{"name": "depends_on_missing_main", "version": "2.1.1", "main": "resource.js",
            "dependencies": {"missing_main": "2.1.1"}}"#,
        &[("resource.js", "/* resource */\n")],
    );
    installed(
        root,
        "unknown_ext_in_main",
        r#"{"name": "unknown_ext_in_main", "version": "2.1.1", "main": ["dist/jquery.js", "dist/jquery.unknown"]}"#,
        &[("dist/jquery.js", "/* jquery */\n"), ("dist/jquery.unknown", "???\n")],
    );

    let bower = Arc::new(Bower::new());
    let components = bower.components("components", root).unwrap();
    Fixture {
        dir,
        bower,
        components,
    }
}
