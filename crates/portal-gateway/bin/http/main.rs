mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use portal_core::{Codec, HashidsCodec, ObfuscatedCodec, Obfuscator};
use portal_gateway::{App, AppState};
use portal_shortener::ShortenerService;
use portal_storage::{InMemoryRepository, PostgresRepository, Repository};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{CodecArg, StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;

    init_tracing(config.log_json);

    info!(
        listen_addr = %config.listen_addr,
        shorten_prefix = %config.shorten_prefix,
        storage_backend = %config.storage,
        codec = %config.codec,
        "starting gateway server"
    );

    let codec = build_codec(config.codec, config.codec_salt.as_deref().unwrap_or_default())?;

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                config.shorten_prefix,
                InMemoryRepository::new(),
                codec,
            )
            .await?;
        }
        StorageBackendArg::Postgres => {
            let postgres_dsn = config
                .postgres_dsn
                .context("postgres dsn is required when storage backend is postgres")?;
            let repository = PostgresRepository::connect(&postgres_dsn).await?;
            if config.run_migrations {
                repository.migrate().await?;
                info!("applied database migrations");
            }
            run_server(
                config.listen_addr,
                config.shorten_prefix,
                repository,
                codec,
            )
            .await?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_codec(kind: CodecArg, salt: &str) -> anyhow::Result<Box<dyn Codec>> {
    let codec: Box<dyn Codec> = match kind {
        CodecArg::Hashids => Box::new(HashidsCodec::new(salt, 0)?),
        CodecArg::Obfuscated => {
            if !salt.is_empty() {
                warn!("codec salt is ignored by the obfuscated codec");
            }
            Box::new(ObfuscatedCodec::new(Obfuscator::builder().build())?)
        }
    };
    Ok(codec)
}

async fn run_server<R: Repository>(
    listen_addr: SocketAddr,
    shorten_prefix: String,
    repository: R,
    codec: Box<dyn Codec>,
) -> anyhow::Result<()> {
    let shortener = Arc::new(ShortenerService::new(repository, codec));
    let app = App::router(AppState::new(shortener, shorten_prefix));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
