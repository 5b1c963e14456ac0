//! MCP server initialization for stdio and SSE transports.
//!
//! Provides [`serve_stdio`] and [`serve_sse`] entry points that wire up the record
//! store, journal service and reply selector into a running server.

use crate::tools::{JournalTools, SharedJournal, SharedSelector};
use anyhow::Result;
use lifecapsule::companion::ResponseSelector;
use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::journal::Journal;
use lifecapsule::store::{InMemoryStore, RecordStore, SqliteStore};
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: open the store (SQLite, or memory when `ephemeral`) and
/// build the journal and reply selector.
fn setup_shared_state(
    config: &LifeCapsuleConfig,
    ephemeral: bool,
) -> Result<(SharedJournal, SharedSelector)> {
    let user_id = config.storage.user_id.clone();
    let store: Box<dyn RecordStore> = if ephemeral {
        tracing::warn!("using in-memory store, nothing will be persisted");
        Box::new(InMemoryStore::new(user_id))
    } else {
        let db_path = config.resolved_db_path();
        let store = SqliteStore::open(&db_path, user_id)?;
        tracing::info!(db = %db_path.display(), "database ready");
        Box::new(store)
    };

    let journal = Arc::new(Mutex::new(Journal::new(store, config)));
    let selector = Arc::new(Mutex::new(ResponseSelector::from_config(
        config.companion.clone(),
    )));

    Ok((journal, selector))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: LifeCapsuleConfig, ephemeral: bool) -> Result<()> {
    tracing::info!("starting LifeCapsule MCP server on stdio");

    let (journal, selector) = setup_shared_state(&config, ephemeral)?;

    let tools = JournalTools::new(journal, selector);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP (SSE) transport.
pub async fn serve_sse(config: LifeCapsuleConfig, ephemeral: bool) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting LifeCapsule MCP server on SSE/HTTP");

    let (journal, selector) = setup_shared_state(&config, ephemeral)?;

    // Every session shares one journal so profile writes stay serialized.
    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(JournalTools::new(journal.clone(), selector.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down SSE server");
        })
        .await?;

    Ok(())
}
