// ghfolio command-line entry point.
// Wires configuration, storage, cache and GitHub client together.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use ghfolio::activity::{RepoRef, load_activity};
use ghfolio::github::GitHubClient;
use ghfolio::storage::{FileStore, KeyValueStore, MemoryStore};
use ghfolio::{CacheStore, CachedFetcher, Config, Result};

#[derive(Parser)]
#[command(name = "ghfolio")]
#[command(version)]
#[command(about = "Cached GitHub repository activity for portfolio pages")]
struct Cli {
    /// Keep the cache in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a branch and its head commit
    Branch {
        owner: String,
        repo: String,
        branch: String,
    },
    /// List recent commits
    Commits {
        owner: String,
        repo: String,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show one commit by its API URL
    Commit { url: String },
    /// Load project cards for several repositories (owner/repo[@branch])
    Activity {
        #[arg(required = true)]
        repos: Vec<RepoRef>,
    },
    /// Remove expired and corrupt cache entries
    Sweep,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ghfolio=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let backend = open_backend(&config, cli.memory)?;
    let cache = CacheStore::new(backend).with_key_scheme(config.key_scheme());
    let removed = cache.initialize();

    if let Command::Sweep = cli.command {
        return print(&serde_json::json!({ "removed": removed }));
    }

    let client = GitHubClient::new(config.token.as_deref())?;
    let fetcher = CachedFetcher::new(cache, Arc::new(client))
        .with_api_base(&config.api_base)
        .with_default_ttl(config.default_ttl);

    match cli.command {
        Command::Branch {
            owner,
            repo,
            branch,
        } => {
            let data: Value = fetcher.branch_info(&owner, &repo, &branch).await?;
            print(&data)
        }
        Command::Commits {
            owner,
            repo,
            per_page,
        } => {
            let per_page = per_page.unwrap_or(config.commits_per_page);
            let data: Value = fetcher.commits_list(&owner, &repo, per_page).await?;
            print(&data)
        }
        Command::Commit { url } => {
            let data: Value = fetcher.commit_details(&url).await?;
            print(&data)
        }
        Command::Activity { repos } => {
            let cards = load_activity(&fetcher, &repos, config.commits_per_page).await;
            let cards: Vec<_> = cards
                .into_iter()
                .map(|(repo, state)| serde_json::json!({ "repo": repo, "card": state }))
                .collect();
            print(&cards)
        }
        Command::Sweep => Ok(()),
    }
}

fn open_backend(config: &Config, memory: bool) -> Result<Arc<dyn KeyValueStore>> {
    if !memory {
        if let Some(dir) = &config.cache_dir {
            let store = FileStore::open(dir)?.with_capacity_bytes(config.max_store_bytes);
            return Ok(Arc::new(store));
        }
        tracing::warn!("no cache directory available, using in-memory cache");
    }
    Ok(Arc::new(MemoryStore::with_capacity_bytes(
        config.max_store_bytes,
    )))
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
