use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use image_periscope::{router, AppState, BuildInfo, Config};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the build identifier file looked up next to the executable
const COMMIT_HASH_FILE: &str = "COMMIT_HASH";

#[derive(Parser, Debug)]
#[command(name = "image-periscope")]
#[command(about = "Browse a directory of images and HTML documents from a web browser")]
#[command(version)]
struct Cli {
    /// Root directory to serve images from
    #[arg(env = "PERISCOPE_ROOT")]
    directory: PathBuf,

    /// Port to listen on
    #[arg(env = "PERISCOPE_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, env = "PERISCOPE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Config file path (optional)
    #[arg(short, long, env = "PERISCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Build identifier file (defaults to COMMIT_HASH next to the executable)
    #[arg(long, env = "PERISCOPE_COMMIT_FILE")]
    commit_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "PERISCOPE_VERBOSE")]
    verbose: bool,
}

fn commit_file_path(cli: &Cli) -> Option<PathBuf> {
    cli.commit_file.clone().or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(COMMIT_HASH_FILE)))
    })
}

/// Host name of this machine and the first address it resolves to.
async fn local_host() -> (String, Option<String>) {
    let host_name = gethostname::gethostname().to_string_lossy().into_owned();
    let ip_address = match tokio::net::lookup_host((host_name.as_str(), 0)).await {
        Ok(mut addrs) => addrs.next().map(|addr| addr.ip().to_string()),
        Err(e) => {
            debug!("Failed to resolve host name {}: {}", host_name, e);
            None
        }
    };
    (host_name, ip_address)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "image_periscope=debug,tower_http=debug"
    } else {
        "image_periscope=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    let root_dir = std::path::absolute(&cli.directory)?;

    if !root_dir.exists() {
        return Err(format!("Root directory does not exist: {}", root_dir.display()).into());
    }

    if !root_dir.is_dir() {
        return Err(format!("Root path is not a directory: {}", root_dir.display()).into());
    }

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;

    let (host_name, ip_address) = local_host().await;
    let mut build = BuildInfo::default()
        .with_bind_address(addr.to_string())
        .with_host(host_name, ip_address);
    if let Some(commit_file) = commit_file_path(&cli) {
        build = build.with_commit_file(&commit_file);
    }

    info!(
        "Serving images from: {} (version {}, commit {})",
        root_dir.display(),
        build.version,
        build.commit_hash
    );

    let state = AppState::with_config(root_dir, config, build);
    let app = router(state);

    info!("Starting image-periscope on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
