//! webjars CLI — build, inspect and serve WebJars dependency graphs.

mod commands;
mod manifest;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use webjars_graph::MediaType;

use manifest::WebjarsManifest;

#[derive(Parser)]
#[command(name = "webjars", version, about = "WebJars dependency graphs")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Init {
        /// Project name
        name: String,
    },
    /// Inspect the configured webjars and write the dependency graph
    Build,
    /// Show the dependency tree of a webjar
    Tree {
        /// Artifact id or request path (e.g. /webjars/jquery/1.6.2/jquery.js)
        target: String,
        /// Media type (js, css); defaults to the path's extension
        #[arg(long = "type")]
        media_type: Option<MediaType>,
    },
    /// Print a webjar's content preceded by its dependencies'
    Assemble {
        /// Artifact id or request path
        target: String,
        /// Media type (js, css); defaults to the path's extension
        #[arg(long = "type")]
        media_type: Option<MediaType>,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Serve /webjars/ over HTTP
    Serve {
        /// Address to listen on (default from webjars.toml)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Build => {
            let (manifest, project_dir) = load_manifest(&cwd)?;
            commands::build::run(&project_dir, &manifest)
        }

        Commands::Tree { target, media_type } => {
            let (manifest, project_dir) = load_manifest(&cwd)?;
            commands::tree::run(&project_dir, &manifest, &target, media_type)
        }

        Commands::Assemble {
            target,
            media_type,
            output,
        } => {
            let (manifest, project_dir) = load_manifest(&cwd)?;
            commands::assemble::run(
                &project_dir,
                &manifest,
                &target,
                media_type,
                output.as_deref(),
            )
        }

        Commands::Serve { bind } => {
            let (manifest, project_dir) = load_manifest(&cwd)?;
            commands::serve::run(&project_dir, &manifest, bind)
        }
    }
}

/// Load `webjars.toml` from the current directory or a parent.
fn load_manifest(cwd: &Path) -> anyhow::Result<(WebjarsManifest, PathBuf)> {
    match WebjarsManifest::find_and_load(cwd)? {
        Some(found) => Ok(found),
        None => anyhow::bail!("no webjars.toml found (run `webjars init` first)"),
    }
}
