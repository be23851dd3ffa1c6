//! graphext sample web app
//!
//! Signs the user in to Microsoft Graph and stores their color preference in
//! an open extension on their user object.
//!
//! Usage:
//!   graphext-web --client-id <app id> --client-secret <secret>
//!
//! The app registration must list `http://<host>:<port>/login/authorized`
//! as a redirect URI.

use std::{fs, path::PathBuf, sync::Arc};
use anyhow::{bail, Context, Result};
use clap::Parser;
use graphext_session::{GraphSession, GraphSessionConfig};
use graphext_web::{build_router, AppState, DEFAULT_EXTENSION_NAME};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "graphext-web")]
#[command(about = "Sample web app storing a user preference in a Graph open extension")]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// JSON file with Graph session settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application (client) ID
    #[arg(long, env = "GRAPH_CLIENT_ID")]
    client_id: Option<String>,

    /// Client secret
    #[arg(long, env = "GRAPH_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Open extension name the preference is stored under
    #[arg(long, default_value = DEFAULT_EXTENSION_NAME)]
    extension_name: String,

    /// Directory holding static assets and `templates/`
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// File to keep the signed-in session in across restarts
    #[arg(long)]
    state_cache: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .compact()
        .init();

    info!("graphext web starting...");
    let config = load_config(&args)?;
    let session = Arc::new(GraphSession::new(config).context("Failed to create Graph session")?);
    let state = AppState::new(session, args.extension_name.clone(), &args.static_dir)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", args.host, args.port))?;
    info!("Listening on http://{}:{}", args.host, args.port);
    info!("Storing preferences in extension {}", args.extension_name);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

fn load_config(args: &Args) -> Result<GraphSessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading Graph settings from {:?}", path);
            let bytes = fs::read(path).context("Failed to read config file")?;
            serde_json::from_slice(&bytes).context("Failed to parse config file")?
        }
        None => GraphSessionConfig {
            redirect_uri: format!("http://{}:{}/login/authorized", args.host, args.port),
            ..Default::default()
        },
    };

    if let Some(client_id) = &args.client_id {
        config.client_id = client_id.clone();
    }
    if let Some(client_secret) = &args.client_secret {
        config.client_secret = client_secret.clone();
    }
    if let Some(state_cache) = &args.state_cache {
        config.state_cache = Some(state_cache.clone());
    }

    if config.client_id.is_empty() {
        bail!("No client ID configured; pass --client-id or set GRAPH_CLIENT_ID");
    }

    Ok(config)
}
