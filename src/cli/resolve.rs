//! `resolve` command: print the include block for path specifiers.

use anyhow::{Context, Result, anyhow};
use bowerstatic::Bower;

use crate::config::BowerConfig;

/// Render `specs` as the snippet block a page including them would receive.
pub fn run(bower: &Bower, config: &BowerConfig, collection: Option<&str>, specs: &[String]) -> Result<()> {
    println!("{}", render(bower, config, collection, specs)?);
    Ok(())
}

fn render(bower: &Bower, config: &BowerConfig, collection: Option<&str>, specs: &[String]) -> Result<String> {
    let name = collection
        .or_else(|| config.default_collection())
        .ok_or_else(|| anyhow!("no collection configured"))?;
    let collection = bower.require(name)?;

    let mut slot = None;
    let mut includer = collection.includer(&mut slot);
    for spec in specs {
        includer
            .include(spec, None)
            .with_context(|| format!("cannot include `{spec}` from `{name}`"))?;
    }

    match slot {
        Some(inclusions) => Ok(inclusions.render()?),
        None => Ok(String::new()),
    }
}
