//! Medisae server
//!
//! Serves the medication search, ingredient pages and accounts.

use std::sync::Arc;

use clap::Parser;
use medisae_persistence::backends::memory::{MemoryBackend, MemoryDocumentStore};
use medisae_persistence::core::DynDocumentStore;
use medisae_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        similarity_threshold = config.similarity_threshold,
        "Starting Medisae"
    );

    let documents = create_document_store(&config).await?;

    match backend_mode {
        StorageBackendMode::Memory => {
            start_memory(config, documents).await?;
        }
        StorageBackendMode::Postgres => {
            start_postgres(config, documents).await?;
        }
    }

    Ok(())
}

/// Connects the ingredient document store, or falls back to an empty one.
#[cfg(feature = "mongodb")]
async fn create_document_store(config: &ServerConfig) -> anyhow::Result<DynDocumentStore> {
    use medisae_persistence::backends::mongodb::{MongoConfig, MongoDocumentStore};

    let Some(url) = config.mongodb_url.clone() else {
        info!("No MongoDB URL configured, ingredient pages will have no details");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    };

    let mongo_config = MongoConfig {
        uri: url,
        database: config.mongodb_database.clone(),
        ..Default::default()
    };
    info!(database = %mongo_config.database, "Initializing MongoDB document store");
    Ok(Arc::new(MongoDocumentStore::connect(&mongo_config).await?))
}

/// Without the mongodb feature the document store is always empty.
#[cfg(not(feature = "mongodb"))]
async fn create_document_store(config: &ServerConfig) -> anyhow::Result<DynDocumentStore> {
    if config.mongodb_url.is_some() {
        anyhow::bail!(
            "A MongoDB URL was configured but the 'mongodb' feature is not enabled. \
             Build with: cargo build -p medisae --features mongodb"
        );
    }
    Ok(Arc::new(MemoryDocumentStore::new()))
}

/// Starts the server over the in-memory demonstration catalog.
async fn start_memory(config: ServerConfig, documents: DynDocumentStore) -> anyhow::Result<()> {
    info!("Initializing in-memory backend with sample data");
    let backend = MemoryBackend::with_sample_data();
    let app = create_app_with_config(backend, documents, config.clone())?;
    serve(app, &config).await
}

/// Starts the server with PostgreSQL backend.
#[cfg(feature = "postgres")]
async fn start_postgres(config: ServerConfig, documents: DynDocumentStore) -> anyhow::Result<()> {
    use medisae_persistence::backends::postgres::PostgresBackend;

    let backend = if let Some(ref url) = config.database_url {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresBackend::from_connection_string(url).await?
        } else {
            info!("Initializing PostgreSQL backend from environment variables");
            PostgresBackend::from_env().await?
        }
    } else {
        info!("Initializing PostgreSQL backend from environment variables");
        PostgresBackend::from_env().await?
    };

    backend.init_schema().await?;

    let app = create_app_with_config(backend, documents, config.clone())?;
    serve(app, &config).await
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(_config: ServerConfig, _documents: DynDocumentStore) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p medisae --features postgres"
    )
}
