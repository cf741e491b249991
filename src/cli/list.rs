//! `list` command: print collections and their components.

use anyhow::Result;
use bowerstatic::Bower;
use owo_colors::OwoColorize;

/// One line per collection, then one indented line per component.
pub fn run(bower: &Bower) -> Result<()> {
    for line in lines(bower) {
        println!("{line}");
    }
    Ok(())
}

fn lines(bower: &Bower) -> Vec<String> {
    let mut out = Vec::new();
    for collection in bower.collections() {
        let header = match collection.fallback() {
            Some(fallback) => format!("{} -> {}", collection.name(), fallback.name()),
            None => collection.name().to_string(),
        };
        out.push(header.bold().to_string());

        for component in collection.components() {
            let url = component
                .url()
                .unwrap_or_else(|e| format!("{}", e.red()));
            out.push(format!(
                "  {} {:?} {}",
                component.name(),
                component.version(),
                url.dimmed()
            ));
        }
    }
    out
}
