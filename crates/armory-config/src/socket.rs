use std::fmt;
use std::fs::DirBuilder;
use std::io;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

/// Where the console listens for operators.
///
/// Written as a URL, `tcp://host:port` or `unix:///path`. Configuration
/// files may instead use a table tagged by `transport`, for example
/// `{ transport = "tcp", host = "127.0.0.1", port = 2323 }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEndpoint {
    /// TCP listener.
    Tcp {
        /// Interface name or address.
        host: String,
        /// Port number. Zero lets the OS pick one.
        port: u16,
    },
    /// Unix domain socket.
    Unix {
        /// Socket file location.
        path: Utf8PathBuf,
    },
}

impl SocketEndpoint {
    /// TCP endpoint on `host:port`.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self::Tcp { host, port }
    }

    /// Unix socket endpoint at `path`.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        Self::Unix { path }
    }

    /// Socket file location, for Unix endpoints only.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        if let Self::Unix { path } = self {
            Some(path)
        } else {
            None
        }
    }

    /// Creates the directory holding a Unix socket, owner-only on Unix
    /// hosts. An existing directory is left alone. TCP endpoints are a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Fails when the socket path has no parent or the directory cannot be
    /// created.
    pub fn prepare_filesystem(&self) -> Result<(), SocketPreparationError> {
        match self.unix_path() {
            Some(path) => create_socket_dir(path),
            None => Ok(()),
        }
    }
}

fn create_socket_dir(socket: &Utf8Path) -> Result<(), SocketPreparationError> {
    let dir = socket
        .parent()
        .ok_or_else(|| SocketPreparationError::NoParent {
            path: socket.to_owned(),
        })?;

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    std::os::unix::fs::DirBuilderExt::mode(&mut builder, 0o700);

    match builder.create(dir) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(SocketPreparationError::Directory {
            path: dir.to_owned(),
            source,
        }),
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            Self::Unix { path } => write!(f, "unix://{path}"),
        }
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(text)?;
        let missing = |what| SocketParseError::Missing {
            what,
            input: text.to_owned(),
        };
        match url.scheme() {
            "tcp" => {
                let host = url.host_str().ok_or_else(|| missing("TCP host"))?;
                let port = url.port().ok_or_else(|| missing("TCP port"))?;
                Ok(Self::tcp(host, port))
            }
            "unix" if url.path().is_empty() => Err(missing("Unix socket path")),
            "unix" => Ok(Self::unix(url.path())),
            scheme => Err(SocketParseError::Scheme(scheme.to_owned())),
        }
    }
}

impl Serialize for SocketEndpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Table form accepted in configuration files.
#[derive(Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
enum EndpointTable {
    Tcp { host: String, port: u16 },
    Unix { path: Utf8PathBuf },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointInput {
    Url(String),
    Table(EndpointTable),
}

impl<'de> Deserialize<'de> for SocketEndpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match EndpointInput::deserialize(deserializer)? {
            EndpointInput::Url(text) => text.parse().map_err(serde::de::Error::custom)?,
            EndpointInput::Table(EndpointTable::Tcp { host, port }) => Self::tcp(host, port),
            EndpointInput::Table(EndpointTable::Unix { path }) => Self::unix(path),
        })
    }
}

/// Text that does not describe a [`SocketEndpoint`].
#[derive(Debug, Error)]
pub enum SocketParseError {
    /// Neither `tcp` nor `unix`.
    #[error("unsupported socket scheme '{0}'")]
    Scheme(String),
    /// A required URL component is absent.
    #[error("missing {what} in '{input}'")]
    Missing {
        /// The absent component.
        what: &'static str,
        /// Text as given.
        input: String,
    },
    /// Not a URL at all.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Failure to set up the directory of a Unix socket.
#[derive(Debug, Error)]
pub enum SocketPreparationError {
    /// The socket path is a bare root or empty.
    #[error("socket path '{path}' has no parent directory")]
    NoParent {
        /// Socket path as configured.
        path: Utf8PathBuf,
    },
    /// `mkdir -p` failed.
    #[error("failed to create socket directory '{path}': {source}")]
    Directory {
        /// Directory being created.
        path: Utf8PathBuf,
        /// OS error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SocketEndpoint::unix("/tmp/armoryd.sock"), "unix:///tmp/armoryd.sock")]
    #[case(SocketEndpoint::tcp("0.0.0.0", 22), "tcp://0.0.0.0:22")]
    fn renders_as_url(#[case] endpoint: SocketEndpoint, #[case] expected: &str) {
        assert_eq!(endpoint.to_string(), expected);
    }

    #[rstest]
    #[case("tcp://127.0.0.1:2323", SocketEndpoint::tcp("127.0.0.1", 2323))]
    #[case("unix:///run/armoryd.sock", SocketEndpoint::unix("/run/armoryd.sock"))]
    fn parses_endpoint_urls(#[case] input: &str, #[case] expected: SocketEndpoint) {
        let endpoint: SocketEndpoint = input.parse().expect("parse endpoint");
        assert_eq!(endpoint, expected);
    }

    #[rstest]
    #[case("invalid://socket")]
    #[case("tcp://127.0.0.1")]
    #[case("not a url")]
    fn rejects_malformed_endpoints(#[case] input: &str) {
        assert!(input.parse::<SocketEndpoint>().is_err());
    }

    #[test]
    fn missing_port_names_the_component() {
        let error = "tcp://127.0.0.1"
            .parse::<SocketEndpoint>()
            .expect_err("port is required");
        assert_eq!(error.to_string(), "missing TCP port in 'tcp://127.0.0.1'");
    }

    #[test]
    fn creates_the_socket_directory() {
        let scratch = tempfile::tempdir().expect("scratch dir");
        let run_dir = scratch.path().join("run").join("armory");
        let socket = run_dir.join("armoryd.sock");
        let endpoint = SocketEndpoint::unix(socket.to_str().expect("utf8 path"));

        endpoint.prepare_filesystem().expect("prepare filesystem");
        endpoint.prepare_filesystem().expect("second call is a no-op");
        assert!(run_dir.is_dir());
    }

    #[test]
    fn tcp_endpoints_need_no_preparation() {
        assert!(
            SocketEndpoint::tcp("127.0.0.1", 0)
                .prepare_filesystem()
                .is_ok()
        );
    }
}
