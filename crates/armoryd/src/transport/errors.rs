//! Listener failures.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// The console socket could not be bound or served.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Name lookup for the listen host failed.
    #[error("cannot resolve listen address {host}:{port}: {source}")]
    Resolve {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// Name lookup returned no addresses.
    #[error("listen address {host}:{port} resolved to nothing")]
    ResolveEmpty {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
    },
    /// `bind(2)` on the TCP address failed.
    #[error("cannot listen on {addr}: {source}")]
    BindTcp {
        /// First resolved address.
        addr: SocketAddr,
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// The socket refused non-blocking mode.
    #[error("cannot switch console socket to non-blocking mode: {source}")]
    NonBlocking {
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// No thread could be spawned for the accept loop.
    #[error("cannot start the accept thread: {source}")]
    Spawn {
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// A `unix://` endpoint on a host without Unix sockets.
    #[cfg(not(unix))]
    #[error("{endpoint}: unix sockets are not available on this platform")]
    UnsupportedUnix {
        /// Endpoint as configured.
        endpoint: String,
    },
    /// `bind(2)` on the socket path failed.
    #[cfg(unix)]
    #[error("cannot listen on {path}: {source}")]
    BindUnix {
        /// Socket path.
        path: String,
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// Something already accepts connections on the path.
    #[cfg(unix)]
    #[error("{path} is served by another process")]
    UnixInUse {
        /// Socket path.
        path: String,
    },
    /// The path holds something other than a socket.
    #[cfg(unix)]
    #[error("{path} exists and is not a socket")]
    UnixNotSocket {
        /// Socket path.
        path: String,
    },
    /// `lstat(2)` on the path failed.
    #[cfg(unix)]
    #[error("cannot inspect {path}: {source}")]
    UnixMetadata {
        /// Socket path.
        path: String,
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// Probing an existing socket gave an unexpected error.
    #[cfg(unix)]
    #[error("cannot probe existing socket {path}: {source}")]
    UnixConnect {
        /// Socket path.
        path: String,
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// A dead socket file could not be unlinked.
    #[cfg(unix)]
    #[error("cannot remove stale socket {path}: {source}")]
    UnixCleanup {
        /// Socket path.
        path: String,
        /// OS error.
        #[source]
        source: io::Error,
    },
    /// The accept thread panicked.
    #[error("accept thread panicked")]
    ThreadPanic,
}
