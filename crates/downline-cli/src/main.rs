#![deny(unsafe_code)]

//! Downline CLI — fetch, print, and search genealogy trees from the shell.

mod outline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use downline_config::AppConfig;
use downline_core::{LoadState, SearchOutcome, Severity, TreeSession, create_gateway, search_all};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Downline — browse a member's binary genealogy tree.
#[derive(Parser)]
#[command(name = "downline", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "downline.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Which subtree to fetch.
#[derive(Args)]
struct TreeTarget {
    /// Member id to root the tree at (defaults to the viewer).
    #[arg(long)]
    root: Option<String>,

    /// Fetch depth. Invalid or non-positive values become 1.
    #[arg(long, allow_hyphen_values = true)]
    depth: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a downline as an outline.
    Tree {
        #[command(flatten)]
        target: TreeTarget,

        /// Print the display tree as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Find a member by name or id in a fetched downline.
    Search {
        /// Case-insensitive name or member id fragment.
        query: String,

        #[command(flatten)]
        target: TreeTarget,

        /// List every match instead of the first one.
        #[arg(long, conflicts_with = "outline")]
        all: bool,

        /// Print the whole fetched tree with the match marked.
        #[arg(long)]
        outline: bool,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;

    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if !cli.config.exists() {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Tree { target, json } => cmd_tree(&config, &target, json).await,
        Commands::Search {
            query,
            target,
            all,
            outline,
        } => cmd_search(&config, &target, &query, all, outline).await,
        Commands::Config { show } => {
            cmd_config(&cli.config, &config, show)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn cmd_tree(config: &AppConfig, target: &TreeTarget, json: bool) -> Result<ExitCode> {
    let session = fetch_tree(config, target).await?;
    let Some(tree) = session.tree() else {
        bail!("no tree loaded");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(tree)?);
    } else {
        print!("{}", outline::render(tree, None));
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_search(
    config: &AppConfig,
    target: &TreeTarget,
    query: &str,
    all: bool,
    show_outline: bool,
) -> Result<ExitCode> {
    let mut session = fetch_tree(config, target).await?;

    if all {
        let Some(tree) = session.tree() else {
            bail!("no tree loaded");
        };
        let matches = search_all(tree, query);
        if matches.is_empty() {
            print_not_found(query, session.depth());
            return Ok(ExitCode::FAILURE);
        }
        for member in matches {
            println!("{}", outline::summary(member));
        }
        return Ok(ExitCode::SUCCESS);
    }

    match session.search(query) {
        SearchOutcome::Cleared => bail!("search query is empty"),
        SearchOutcome::NotFound => {
            print_not_found(query, session.depth());
            Ok(ExitCode::FAILURE)
        }
        SearchOutcome::Found(member_id) => {
            if let Some(report) = match_report(&session, &member_id, show_outline) {
                print!("{report}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Summary line for the matched member, or the marked outline.
fn match_report(session: &TreeSession, member_id: &str, show_outline: bool) -> Option<String> {
    let tree = session.tree()?;
    if show_outline {
        return Some(outline::render(tree, Some(member_id)));
    }
    tree.find(member_id)
        .map(|member| format!("{}\n", outline::summary(member)))
}

fn print_not_found(query: &str, depth: u32) {
    eprintln!(
        "\"{}\" not found in the tree fetched at depth {depth}; try a larger --depth",
        query.trim()
    );
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let mut shown = config.clone();
        if shown.gateway.api_token.is_some() {
            shown.gateway.api_token = Some("[REDACTED]".to_string());
        }
        let toml_str =
            toml::to_string_pretty(&shown).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Fetch the subtree `target` names and fail if the gateway did.
async fn fetch_tree(config: &AppConfig, target: &TreeTarget) -> Result<TreeSession> {
    let gateway = create_gateway(&config.gateway).await?;
    let mut session = TreeSession::from_config(config);

    let mut key = session.start();
    if let Some(raw) = &target.depth {
        key = session.apply_depth(raw);
    }
    if let Some(root) = &target.root
        && let Some(drilled) = session.drill_into(root)
    {
        key = drilled;
    }

    debug!(gateway = gateway.name(), %key, "Fetching tree");
    session.fetch_with(gateway.as_ref(), key).await;

    for note in session.notifications().iter() {
        if note.severity == Severity::Warning {
            eprintln!("warning: {}", note.message);
        }
    }
    if let LoadState::Failed { error, .. } = session.load_state() {
        bail!("failed to load tree: {error}");
    }
    Ok(session)
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path).await.map_err(|e| anyhow::anyhow!(e))
    } else {
        Ok(AppConfig::default())
    }
}
