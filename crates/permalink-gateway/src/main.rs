use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use permalink_core::{PermalinkId, PermalinkStore, Repository};
use permalink_gateway::cli::{Command, ServeArgs, StorageBackendArg, CLI};
use permalink_gateway::{App, AppState};
use permalink_service::PermalinkService;
use permalink_storage::{InMemoryRepository, MySqlRepository, SqliteRepository};
use permalink_telemetry::TelemetryConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = permalink_telemetry::init(
        TelemetryConfig::builder()
            .service_name("permalink")
            .format(config.log_format.into())
            .default_filter(config.log_level.clone())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    let store = open_store(&config).await?;

    match config.command {
        Command::Serve(args) => serve(args, store).await?,
        Command::Make { url } => {
            let id = store.get_or_create(&url).await?;
            println!("{id}");
        }
        Command::Resolve { id } => {
            let id: PermalinkId = id.parse()?;
            println!("{}", store.resolve(id).await?);
        }
    }

    Ok(())
}

fn service<R: Repository>(repository: R) -> Arc<dyn PermalinkStore> {
    Arc::new(PermalinkService::new(repository))
}

async fn open_store(config: &CLI) -> anyhow::Result<Arc<dyn PermalinkStore>> {
    info!(storage_backend = %config.storage, "opening permalink store");

    let store = match config.storage {
        StorageBackendArg::InMemory => service(InMemoryRepository::new()),
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(dsn).await?;
            repository.ensure_schema().await?;
            service(repository)
        }
        StorageBackendArg::Sqlite => {
            let url = config
                .sqlite_url
                .as_deref()
                .context("sqlite url is required when storage backend is sqlite")?;
            let repository = SqliteRepository::connect(url).await?;
            repository.ensure_schema().await?;
            service(repository)
        }
    };

    Ok(store)
}

async fn serve(args: ServeArgs, store: Arc<dyn PermalinkStore>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(args.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        base_url = %args.base_url,
        "starting permalink gateway"
    );

    let router = App::router(AppState::new(store, args.base_url));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("permalink gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
