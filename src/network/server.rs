//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io::{BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver};

use crate::config::Config;
use crate::directory::Directory;
use crate::error::{BookError, Result};
use crate::protocol::{write_response, Response, Status};

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for the address book
///
/// ## Threading
/// - `run` is the acceptor loop; it polls a nonblocking listener so it can
///   notice shutdown
/// - `worker_threads` workers pull accepted streams off a bounded channel
/// - at most `max_connections` streams are queued or being served; extra
///   clients get an error frame and are closed
/// - on shutdown each connection finishes its current command and closes;
///   an idle one closes at its read timeout
pub struct Server {
    config: Config,
    directory: Arc<Directory>,
    listener: Option<TcpListener>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

/// Cloneable handle that stops a running [`Server`]
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Server {
    /// Create a new server with the given config and directory
    pub fn new(config: Config, directory: Arc<Directory>) -> Self {
        Self {
            config,
            directory,
            listener: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bind the listen address (idempotent) and return the bound address
    ///
    /// Useful with port 0 to learn the port before calling `run`.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            BookError::Network(format!("failed to bind {}: {}", self.config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&mut self) -> Result<()> {
        self.config.validate()?;
        let addr = self.bind()?;
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Err(BookError::Network("listener not bound".to_string())),
        };

        tracing::info!(
            "Listening on {} ({} workers, max {} connections)",
            addr,
            self.config.worker_threads,
            self.config.max_connections
        );

        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);
        let workers = (0..self.config.worker_threads)
            .map(|id| self.spawn_worker(id, rx.clone()))
            .collect::<Result<Vec<_>>>()?;
        drop(rx);

        while !self.shutdown.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Failed to configure stream from {}: {}", peer, e);
                        continue;
                    }

                    if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
                        tracing::warn!("Rejecting {}: connection limit reached", peer);
                        reject(stream);
                        continue;
                    }

                    self.active.fetch_add(1, Ordering::SeqCst);
                    if tx.send(stream).is_err() {
                        self.active.fetch_sub(1, Ordering::SeqCst);
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::warn!("Worker thread panicked");
            }
        }

        Ok(())
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let directory = Arc::clone(&self.directory);
        let shutdown = self.shutdown_handle();
        let active = Arc::clone(&self.active);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let handle = thread::Builder::new()
            .name(format!("addressbook-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    if !shutdown.is_shutdown() {
                        serve(stream, &directory, &shutdown, read_ms, write_ms);
                    }
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            })?;

        Ok(handle)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// A handle that can stop the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Connections currently queued or being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

fn serve(
    stream: TcpStream,
    directory: &Arc<Directory>,
    shutdown: &ShutdownHandle,
    read_ms: u64,
    write_ms: u64,
) {
    let mut connection = match Connection::new(stream, Arc::clone(directory), shutdown.clone()) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("Failed to set up connection: {}", e);
            return;
        }
    };

    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
        return;
    }

    if let Err(e) = connection.handle() {
        tracing::debug!("Connection {} closed with error: {}", connection.peer_addr(), e);
    }
}

fn reject(stream: TcpStream) {
    let mut writer = BufWriter::new(stream);
    let response = Response::error(Status::Error, "too many connections");
    let _ = write_response(&mut writer, &response);
}
