#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cxlgraph_core::config::resolve_config;
use output::{CliError, OutputMode, render_error};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cxg: structural analytics for CXL concept maps",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (default: the per-user config when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Summarize a concept map",
        after_help = "EXAMPLES:\n    # Node, edge and density summary\n    cxg stats water.cxl\n\n    # Emit machine-readable output\n    cxg stats water.cxl --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Find central concepts",
        long_about = "Compute barycenter, center, eigenvector and PageRank centrality. \
                      When barycenter, center and eigenvector agree the result collapses \
                      to one set. Barycenter and center need a connected map: without \
                      --measures a disconnected map gets eigenvector and PageRank only.",
        after_help = "EXAMPLES:\n    # All measures\n    cxg centers water.cxl\n\n    # Only PageRank\n    cxg centers water.cxl --measures pagerank"
    )]
    Centers(cmd::centers::CentersArgs),

    #[command(
        about = "Detect communities",
        after_help = "EXAMPLES:\n    # Default resolution\n    cxg communities water.cxl\n\n    # Smaller communities\n    cxg communities water.cxl --resolution 1.5"
    )]
    Communities(cmd::communities::CommunitiesArgs),

    #[command(
        about = "Count depth-first link classes from a root",
        after_help = "EXAMPLES:\n    # Cross links reachable from concept c1\n    cxg links water.cxl --root c1\n\n    # Tree and reverse links, with every event\n    cxg links water.cxl --root c1 --kind tree,reverse --events"
    )]
    Links(cmd::links::LinksArgs),

    #[command(
        about = "List root and leaf concepts",
        after_help = "EXAMPLES:\n    cxg leaves water.cxl"
    )]
    Leaves(cmd::leaves::LeavesArgs),

    #[command(
        about = "Print the pairwise nearness matrix",
        after_help = "EXAMPLES:\n    cxg nearness water.cxl\n    cxg nearness water.cxl --directed --json"
    )]
    Nearness(cmd::nearness::NearnessArgs),

    #[command(
        about = "Emit node labels, layout and colors for drawing",
        after_help = "EXAMPLES:\n    cxg render water.cxl --colors --json"
    )]
    Render(cmd::render::RenderArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CXG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cxlgraph=debug,cxg=debug,info"
        } else {
            "cxlgraph=info,warn"
        })
    });

    let format = env::var("CXG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref()).context("failed to load configuration")?;
    let output = cli.output_mode();

    match &cli.command {
        Commands::Stats(args) => cmd::stats::run_stats(args, &config, output),
        Commands::Centers(args) => cmd::centers::run_centers(args, &config, output),
        Commands::Communities(args) => cmd::communities::run_communities(args, &config, output),
        Commands::Links(args) => cmd::links::run_links(args, &config, output),
        Commands::Leaves(args) => cmd::leaves::run_leaves(args, &config, output),
        Commands::Nearness(args) => cmd::nearness::run_nearness(args, &config, output),
        Commands::Render(args) => cmd::render::run_render(args, &config, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = render_error(cli.output_mode(), &CliError::from(&err)) {
                tracing::error!(%write_err, "could not write error report");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["cxg", "stats", "m.cxl", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["cxg", "stats", "m.cxl"]);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn config_flag_parsed() {
        let cli = Cli::parse_from(["cxg", "--config", "cfg.toml", "leaves", "m.cxl"]);
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
        assert!(matches!(cli.command, Commands::Leaves(_)));
    }

    #[test]
    fn links_requires_root() {
        assert!(Cli::try_parse_from(["cxg", "links", "m.cxl"]).is_err());
        let cli = Cli::parse_from(["cxg", "links", "m.cxl", "--root", "c1", "--kind", "tree,all"]);
        match cli.command {
            Commands::Links(args) => {
                assert_eq!(args.root, "c1");
                assert_eq!(args.kind.len(), 2);
            }
            other => panic!("expected links, got {other:?}"),
        }
    }

    #[test]
    fn links_kind_defaults_to_cross() {
        let cli = Cli::parse_from(["cxg", "links", "m.cxl", "--root", "c1"]);
        match cli.command {
            Commands::Links(args) => {
                assert_eq!(args.kind, vec![cmd::links::KindArg::Cross]);
            }
            other => panic!("expected links, got {other:?}"),
        }
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["cxg", "stats", "m.cxl"],
            vec!["cxg", "centers", "m.cxl", "--measures", "barycenter,center"],
            vec!["cxg", "communities", "m.cxl", "--resolution", "0.5"],
            vec!["cxg", "links", "m.cxl", "--root", "x"],
            vec!["cxg", "leaves", "m.cxl", "--fuzzy"],
            vec!["cxg", "nearness", "m.cxl", "--directed"],
            vec!["cxg", "render", "m.cxl", "--colors"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "Failed to parse: {args:?} ({:?})", result.err());
        }
    }
}
