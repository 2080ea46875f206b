//! Studio CLI Binary
//!
//! Publishes a project snapshot (the JSON node collection the workspace
//! persists) to GitHub, or lists its resolved file paths.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studio::config::StudioConfig;
use studio::logging::init_logging;
use studio::remote::GitHubClient;
use studio::sync::{build_payload, SyncEngine};
use studio::tree::{Node, ProjectTree};

/// Studio - virtual project tree and atomic GitHub publishing
#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "Publish a Studio project snapshot to GitHub")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project snapshot file (JSON node collection)
    #[arg(long, default_value = "project.json")]
    project: PathBuf,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the whole project as one commit
    Push {
        /// Repository name (overrides configuration)
        #[arg(long)]
        repo: Option<String>,

        /// Commit message (overrides configuration)
        #[arg(long)]
        message: Option<String>,
    },
    /// List every publishable file path
    Paths,
}

fn load_tree(path: &PathBuf) -> anyhow::Result<ProjectTree> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read project snapshot {:?}", path))?;
    let nodes: Vec<Node> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid project snapshot {:?}", path))?;
    let tree = ProjectTree::from_nodes(nodes)
        .with_context(|| format!("inconsistent project snapshot {:?}", path))?;
    Ok(tree)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = StudioConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(Some(&config.logging)).context("initializing logging")?;

    let tree = load_tree(&cli.project)?;

    match cli.command {
        Commands::Paths => {
            let entries = build_payload(&tree)?;
            for entry in entries {
                println!("{}", entry.path);
            }
        }
        Commands::Push { repo, message } => {
            let mut sync_config = config.sync;
            if let Some(repo) = repo {
                sync_config.repo_name = repo;
            }
            if let Some(message) = message {
                sync_config.commit_message = message;
            }

            let Some(token) = sync_config.resolve_token() else {
                bail!("no GitHub token configured; set STUDIO_GITHUB_TOKEN");
            };
            let client = GitHubClient::connect(&token, Some(&sync_config.api_base)).await?;

            let engine = SyncEngine::new(client, sync_config);
            let outcome = engine.publish(&tree, |status| println!("{}", status)).await?;
            println!(
                "{} ({}) at {}",
                outcome.repository_url,
                outcome.branch,
                outcome.pushed_at.to_rfc3339()
            );
        }
    }

    Ok(())
}
