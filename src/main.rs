use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use assessment_intake::auth::password;
use assessment_intake::cli::{self, Cli, Command};
use assessment_intake::config::Config;
use assessment_intake::store::{seed, MemoryStore, SubmissionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present; clap reads INTAKE_ADMIN_PASSWORD from it.
    let _ = dotenvy::dotenv();

    let args = Cli::parse_args();

    if let Command::HashPassword { password: given } = args.command() {
        let plain = match given {
            Some(p) => p.clone(),
            None => cli::read_password(std::io::stdin().lock())?,
        };
        println!("{}", password::hash(&plain)?);
        return Ok(());
    }

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting assessment intake");

    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    if config.seed_demo {
        seed::seed_demo(store.as_ref()).await?;
    }

    let addr = SocketAddr::new(config.host, config.port);
    let app = assessment_intake::build_app(config, store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
