//! # TCP Transport
//!
//! Socket setup and the fixed-size worker pool.
//!
//! Concurrency is bounded up front: `max_clients` workers share one
//! listener and each serves a single rover at a time. There is no
//! per-connection spawn, so a flood of rovers queues at the socket instead
//! of exhausting the process.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::mpsc;
use tracing::{error, info, info_span, instrument, warn, Instrument};

use crate::config::ServerConfig;
use crate::error::{ProtocolError, Result};
use crate::protocol::Session;

/// Resolve the configured address and bind the listening socket.
///
/// `SO_REUSEADDR` is set so a restart does not trip over sockets lingering
/// in TIME_WAIT. The accept backlog stays at zero: workers take
/// connections straight off the socket and excess attempts wait at the
/// kernel.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = resolve(config).await?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(0)?;

    info!(addr = %addr, "Listening");
    Ok(listener)
}

async fn resolve(config: &ServerConfig) -> Result<SocketAddr> {
    let spec = config.listen_addr();
    tokio::net::lookup_host(&spec)
        .await?
        .next()
        .ok_or_else(|| ProtocolError::ConfigError(format!("cannot resolve {spec}")))
}

/// Serve rovers until the shutdown channel fires.
///
/// The listener is shared by exactly `max_clients` workers, so at most
/// that many sessions run concurrently. Shutdown aborts the workers;
/// in-flight sessions are cut, rovers reconnect on their own.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    config: &ServerConfig,
    mut shutdown_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let listener = Arc::new(listener);
    let mut workers = Vec::with_capacity(config.max_clients);

    for worker_id in 0..config.max_clients {
        let listener = Arc::clone(&listener);
        let command_limit = config.command_limit;
        workers.push(tokio::spawn(worker_loop(worker_id, listener, command_limit)));
    }
    info!(workers = config.max_clients, "Worker pool started");

    let _ = shutdown_rx.recv().await;
    info!("Shutting down server");

    for worker in &workers {
        worker.abort();
    }
    let _ = futures::future::join_all(workers).await;
    Ok(())
}

async fn worker_loop(worker_id: usize, listener: Arc<TcpListener>, command_limit: u32) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                info!(worker = worker_id, peer = %peer, "Rover connected");
                let outcome = Session::new(stream, command_limit)
                    .run()
                    .instrument(info_span!("session", peer = %peer))
                    .await;
                match outcome {
                    Ok(()) => info!(worker = worker_id, peer = %peer, "Session completed"),
                    Err(e) => warn!(worker = worker_id, peer = %peer, error = %e, "Session failed"),
                }
            }
            Err(e) => {
                error!(worker = worker_id, error = %e, "Error accepting connection");
            }
        }
    }
}

/// Bind the configured address and serve until CTRL+C.
#[instrument(skip(config), fields(addr = %config.listen_addr()))]
pub async fn start_server(config: &ServerConfig) -> Result<()> {
    // Create internal shutdown channel
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

    // Set up ctrl-c handler that sends to our internal shutdown channel
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received CTRL+C signal, shutting down");
            let _ = shutdown_tx_clone.send(()).await;
        }
    });

    let listener = bind(config).await?;
    serve_with_shutdown(listener, config, shutdown_rx).await
}
