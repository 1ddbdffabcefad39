//! Binds console endpoints and hands accepted connections to session threads.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use armory_config::SocketEndpoint;

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

#[cfg(unix)]
use std::os::unix::net::UnixListener;

/// Sleep between polls while no operator is connecting.
const IDLE_POLL: Duration = Duration::from_millis(25);
/// Sleep after a failed accept before polling again.
const FAULT_POLL: Duration = Duration::from_millis(150);

/// A bound, not yet serving, console socket.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: SocketEndpoint,
    acceptor: Acceptor,
}

impl SocketListener {
    /// Binds `endpoint`. A stale Unix socket file left by a previous run is
    /// replaced; one with a live server behind it is refused.
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        let acceptor = Acceptor::open(endpoint)?;
        Ok(Self {
            endpoint: endpoint.clone(),
            acceptor,
        })
    }

    /// TCP address the socket is bound to. `None` for Unix sockets.
    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.acceptor.tcp_addr()
    }

    /// Endpoint as actually served, with an ephemeral TCP port filled in.
    pub(crate) fn bound_endpoint(&self) -> SocketEndpoint {
        if let (SocketEndpoint::Tcp { host, .. }, Some(addr)) = (&self.endpoint, self.local_addr())
        {
            return SocketEndpoint::tcp(host.clone(), addr.port());
        }
        self.endpoint.clone()
    }

    /// Starts the accept thread. Every connection is passed to `handler` on
    /// a thread of its own.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        if let Err(source) = self.acceptor.set_nonblocking() {
            release_socket_path(&self.endpoint);
            return Err(ListenerError::NonBlocking { source });
        }

        let endpoint = self.bound_endpoint();
        let stop = Arc::new(AtomicBool::new(false));
        let worker = AcceptLoop {
            listener: self,
            stop: Arc::clone(&stop),
            handler,
            sessions: 0,
        };
        let thread = thread::Builder::new()
            .name("armory-listener".to_owned())
            .spawn(move || worker.run())
            .map_err(|source| ListenerError::Spawn { source })?;

        Ok(ListenerHandle {
            endpoint,
            stop,
            thread: Some(thread),
        })
    }
}

/// Controls a running accept thread.
///
/// Dropping the handle asks the thread to stop but does not wait for it.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    endpoint: SocketEndpoint,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Stops accepting. Open sessions keep running until the operator leaves.
    pub(crate) fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        thread.join().map_err(|_| ListenerError::ThreadPanic)
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug)]
enum Acceptor {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Acceptor {
    fn open(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        match endpoint {
            SocketEndpoint::Tcp { host, port } => open_tcp(host, *port).map(Self::Tcp),
            #[cfg(unix)]
            SocketEndpoint::Unix { path } => unix::open(path.as_std_path()).map(Self::Unix),
            #[cfg(not(unix))]
            SocketEndpoint::Unix { .. } => Err(ListenerError::UnsupportedUnix {
                endpoint: endpoint.to_string(),
            }),
        }
    }

    fn tcp_addr(&self) -> Option<SocketAddr> {
        match self {
            Self::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            Self::Unix(_) => None,
        }
    }

    fn set_nonblocking(&self) -> io::Result<()> {
        match self {
            Self::Tcp(listener) => listener.set_nonblocking(true),
            #[cfg(unix)]
            Self::Unix(listener) => listener.set_nonblocking(true),
        }
    }

    /// Takes one pending connection, if any. Accepted streams are switched
    /// back to blocking mode for the session thread.
    fn poll(&self) -> io::Result<Option<ConnectionStream>> {
        let accepted = match self {
            Self::Tcp(listener) => listener.accept().and_then(|(stream, _)| {
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Tcp(stream))
            }),
            #[cfg(unix)]
            Self::Unix(listener) => listener.accept().and_then(|(stream, _)| {
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Unix(stream))
            }),
        };
        match accepted {
            Ok(stream) => Ok(Some(stream)),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(error) => Err(error),
        }
    }
}

struct AcceptLoop {
    listener: SocketListener,
    stop: Arc<AtomicBool>,
    handler: Arc<dyn ConnectionHandler>,
    sessions: u64,
}

impl AcceptLoop {
    fn run(mut self) {
        info!(
            target: LISTENER_TARGET,
            endpoint = %self.listener.endpoint,
            "console accepting connections"
        );
        // Repeated failures of the same kind are logged once.
        let mut reported: Option<io::ErrorKind> = None;
        while !self.stop.load(Ordering::SeqCst) {
            match self.listener.acceptor.poll() {
                Ok(Some(stream)) => {
                    reported = None;
                    self.open_session(stream);
                }
                Ok(None) => thread::sleep(IDLE_POLL),
                Err(error) => {
                    if reported != Some(error.kind()) {
                        warn!(target: LISTENER_TARGET, %error, "accept failed");
                        reported = Some(error.kind());
                    }
                    thread::sleep(FAULT_POLL);
                }
            }
        }
        debug!(
            target: LISTENER_TARGET,
            sessions = self.sessions,
            "console no longer accepting"
        );
        release_socket_path(&self.listener.endpoint);
    }

    fn open_session(&mut self, stream: ConnectionStream) {
        self.sessions += 1;
        let handler = Arc::clone(&self.handler);
        let name = format!("armory-session-{}", self.sessions);
        if let Err(error) = thread::Builder::new()
            .name(name)
            .spawn(move || handler.handle(stream))
        {
            warn!(
                target: LISTENER_TARGET,
                %error,
                "could not start session thread; dropping connection"
            );
        }
    }
}

fn open_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?
        .next()
        .ok_or_else(|| ListenerError::ResolveEmpty {
            host: host.to_owned(),
            port,
        })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}

#[cfg(unix)]
fn release_socket_path(endpoint: &SocketEndpoint) {
    if let SocketEndpoint::Unix { path } = endpoint {
        unix::remove(path.as_std_path());
    }
}

#[cfg(not(unix))]
fn release_socket_path(_endpoint: &SocketEndpoint) {}

#[cfg(unix)]
mod unix {
    use std::fs;
    use std::io;
    use std::os::unix::fs::FileTypeExt;
    use std::os::unix::net::{UnixListener, UnixStream};
    use std::path::Path;

    use tracing::warn;

    use super::{LISTENER_TARGET, ListenerError};

    pub(super) fn open(path: &Path) -> Result<UnixListener, ListenerError> {
        let shown = || path.display().to_string();
        match fs::symlink_metadata(path) {
            Ok(metadata) if !metadata.file_type().is_socket() => {
                return Err(ListenerError::UnixNotSocket { path: shown() });
            }
            Ok(_) => reclaim(path)?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ListenerError::UnixMetadata {
                    path: shown(),
                    source,
                });
            }
        }
        UnixListener::bind(path).map_err(|source| ListenerError::BindUnix {
            path: shown(),
            source,
        })
    }

    /// Removes a socket file nobody is listening on.
    fn reclaim(path: &Path) -> Result<(), ListenerError> {
        let shown = || path.display().to_string();
        match UnixStream::connect(path) {
            Ok(_) => Err(ListenerError::UnixInUse { path: shown() }),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
                ) =>
            {
                fs::remove_file(path).map_err(|source| ListenerError::UnixCleanup {
                    path: shown(),
                    source,
                })
            }
            Err(source) => Err(ListenerError::UnixConnect {
                path: shown(),
                source,
            }),
        }
    }

    pub(super) fn remove(path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!(
                target: LISTENER_TARGET,
                %error,
                path = %path.display(),
                "could not remove console socket file"
            ),
        }
    }
}
