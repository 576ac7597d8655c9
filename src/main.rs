use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use postsync::client::{ClientReconciler, PostStore};
use postsync::config::PostsConfig;
use postsync::features::snapshots::{snapshot_router, AppState};
use postsync::io::local::LocalContentReader;
use postsync::services::{LocalChannel, UpdateChannel};
use postsync::PostSync;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "postsync",
    version,
    about = "Post index and live navigation sync for blog content"
)]
struct Cli {
    /// Content root (overrides POSTSYNC_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the posts directory and serve the loadable snapshots
    Serve,
    /// Print the scanned posts as JSON
    Scan,
    /// Print the navigation tree as JSON, usable as a static nav config
    Nav,
    /// Embed the current snapshot into an HTML file
    Inject {
        file: PathBuf,
        /// Write here instead of overwriting the input
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = PostsConfig::from_env();
    if let Some(root) = cli.root {
        config.root_dir = root;
    }
    // notify reports canonical paths; match them against a canonical root
    if let Ok(canonical) = config.root_dir.canonicalize() {
        config.root_dir = canonical;
    }
    let config = Arc::new(config);

    let reader = Arc::new(LocalContentReader::new(config.root_dir.clone()));
    let channel = Arc::new(LocalChannel::new());
    let mut postsync = PostSync::new(config.clone(), reader, channel.clone(), None);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Scan => {
            let snapshot = postsync.publisher().snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot.posts)?);
        }
        Command::Nav => {
            let snapshot = postsync.publisher().snapshot().await?;
            let navigation = postsync
                .publisher()
                .navigation_for(&snapshot.posts)
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&navigation)?);
        }
        Command::Inject { file, output } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let injected = postsync.publisher().embed_into(&html).await?;
            let target = output.unwrap_or(file);
            std::fs::write(&target, injected)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            info!("Embedded snapshot into {}", target.display());
        }
        Command::Serve => serve(&mut postsync, channel.as_ref()).await?,
    }

    Ok(())
}

async fn serve(postsync: &mut PostSync, channel: &dyn UpdateChannel) -> Result<()> {
    let config = postsync.config().clone();

    // in-process mirror of client state, kept current by the update channel
    let store = Arc::new(PostStore::new());
    ClientReconciler::new(store.clone(), config.nav.recent_label.clone()).attach(channel);

    // a broadcast may land before the first scan returns; seeding never overwrites it
    let snapshot = postsync.start(true).await?;
    store.seed(snapshot.posts, snapshot.navigation.unwrap_or_default());

    let state = AppState {
        publisher: postsync.publisher().clone(),
        store,
    };
    let app = Router::new().merge(snapshot_router()).with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Serving snapshots on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    postsync.stop();
    Ok(())
}
