// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use notes_server::{
    api::router,
    auth::TokenCodec,
    config::ServerConfig,
    logging::init_tracing,
    state::AppState,
    storage::NoteDatabase,
};

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let db = match NoteDatabase::open(&config.database_path()) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, path = %config.database_path().display(), "Failed to open database");
            return ExitCode::FAILURE;
        }
    };

    let tokens = match &config.token_secret {
        Some(secret) => TokenCodec::new(secret, config.token_ttl),
        None => match TokenCodec::ephemeral(config.token_ttl) {
            Ok(codec) => {
                tracing::warn!(
                    "ACCESS_TOKEN_SECRET not set; using an ephemeral signing key, tokens will not survive a restart"
                );
                codec
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate signing key");
                return ExitCode::FAILURE;
            }
        },
    };

    let app = router(AppState::new(db, tokens));

    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    let addr = config.bind_addr;
    let served = match &config.tls {
        Some(tls) => {
            let tls_config = match RustlsConfig::from_pem_file(&tls.cert, &tls.key).await {
                Ok(tls_config) => tls_config,
                Err(e) => {
                    tracing::error!(error = %e, cert = %tls.cert.display(), "Failed to load TLS credentials");
                    return ExitCode::FAILURE;
                }
            };
            tracing::info!(%addr, "Notes server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            tracing::info!(%addr, "Notes server listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    };

    match served {
        Ok(()) => {
            tracing::info!("Notes server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

/// Wait for SIGINT or SIGTERM, then drain connections.
async fn shutdown_on_signal(handle: Handle<std::net::SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
