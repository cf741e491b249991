//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// bowerstatic component publisher CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: bowerstatic.toml)
    #[arg(short = 'C', long, global = true, default_value = "bowerstatic.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve pages with injected includes and published component files
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the rendered include block for path specifiers
    #[command(visible_alias = "r")]
    Resolve {
        /// Collection to resolve against (default: [serve] collection)
        #[arg(short = 'c', long)]
        collection: Option<String>,

        /// Path specifiers: `component` or `component/file`
        #[arg(required = true, value_name = "SPEC")]
        specs: Vec<String>,
    },

    /// List collections, components, versions and URLs
    #[command(visible_alias = "l")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["bowerstatic", "serve", "-p", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), interface: None }));
        assert_eq!(cli.config, PathBuf::from("bowerstatic.toml"));
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "bowerstatic", "-v", "resolve", "-c", "local", "jquery-ui", "jquery/dist/jquery.min.js",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Resolve { collection, specs } => {
                assert_eq!(collection.as_deref(), Some("local"));
                assert_eq!(specs, ["jquery-ui", "jquery/dist/jquery.min.js"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_resolve_requires_specs() {
        assert!(Cli::try_parse_from(["bowerstatic", "resolve"]).is_err());
    }
}
