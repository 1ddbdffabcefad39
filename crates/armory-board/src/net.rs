//! Name resolution and HTTP retrieval.

use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;
use url::{Host, Url};

/// Errors raised by the network capability.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The name is empty or otherwise unusable.
    #[error("invalid domain name {name:?}")]
    InvalidName {
        /// Name as supplied.
        name: String,
    },
    /// The resolver failed.
    #[error("lookup {name}: {source}")]
    Lookup {
        /// Fully qualified name that was looked up.
        name: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// The resolver returned no addresses.
    #[error("failed to resolve A records for host {name:?}")]
    NoRecords {
        /// Host that produced no records.
        name: String,
    },
    /// The URL could not be parsed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    /// The URL does not name a host and port.
    #[error("expected host:port but got {url:?}")]
    MissingHost {
        /// URL as supplied.
        url: String,
    },
    /// The HTTP exchange failed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// No network is attached.
    #[error("network unreachable: {reason}")]
    Unreachable {
        /// Why the network is unavailable.
        reason: String,
    },
}

/// Addresses returned for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Fully qualified name, with the trailing dot.
    pub name: String,
    /// Resolved addresses in resolver order.
    pub addresses: Vec<IpAddr>,
}

impl fmt::Display for Resolution {
    /// Renders one answer record per line, zone file style.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, address) in self.addresses.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            let kind = if address.is_ipv4() { "A" } else { "AAAA" };
            write!(f, "{}\tIN\t{kind}\t{address}", self.name)?;
        }
        Ok(())
    }
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Canonical reason phrase, empty when the code has none.
    pub reason: String,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns the status code followed by its reason phrase.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.reason.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.reason)
        }
    }
}

/// Network stack.
pub trait Network: Send + Sync {
    /// Resolves `name` to its addresses.
    ///
    /// # Errors
    ///
    /// Returns an error when the name cannot be resolved.
    fn resolve(&self, name: &str) -> Result<Resolution, NetworkError>;

    /// Fetches `url` with an HTTP GET.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is malformed, its host cannot be
    /// resolved or the exchange fails. Non-success status codes are not
    /// errors.
    fn get(&self, url: &str) -> Result<HttpResponse, NetworkError>;
}

/// Network capability backed by the host's resolver and sockets.
#[derive(Debug, Clone)]
pub struct HostNetwork {
    timeout: Duration,
}

impl HostNetwork {
    /// Creates a network handle whose requests give up after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Network for HostNetwork {
    fn resolve(&self, name: &str) -> Result<Resolution, NetworkError> {
        let host = name.trim_end_matches('.');
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(NetworkError::InvalidName {
                name: name.to_owned(),
            });
        }
        let fqdn = format!("{host}.");

        let resolved = (host, 0)
            .to_socket_addrs()
            .map_err(|source| NetworkError::Lookup {
                name: fqdn.clone(),
                source,
            })?;

        let mut addresses: Vec<IpAddr> = Vec::new();
        for address in resolved.map(|socket| socket.ip()) {
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }

        if addresses.is_empty() {
            return Err(NetworkError::NoRecords {
                name: host.to_owned(),
            });
        }

        Ok(Resolution {
            name: fqdn,
            addresses,
        })
    }

    fn get(&self, url: &str) -> Result<HttpResponse, NetworkError> {
        let parsed = Url::parse(url)?;
        let missing_host = || NetworkError::MissingHost {
            url: url.to_owned(),
        };
        let port = parsed.port_or_known_default().ok_or_else(missing_host)?;

        let mut builder = reqwest::blocking::Client::builder().timeout(self.timeout);
        match parsed.host().ok_or_else(missing_host)? {
            Host::Domain(domain) => {
                let resolution = self.resolve(domain)?;
                let address = resolution
                    .addresses
                    .first()
                    .copied()
                    .ok_or_else(|| NetworkError::NoRecords {
                        name: domain.to_owned(),
                    })?;
                builder = builder.resolve(domain, SocketAddr::new(address, port));
            }
            Host::Ipv4(_) | Host::Ipv6(_) => {}
        }

        let client = builder.build()?;
        let response = client.get(parsed).send()?;
        let status = response.status();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "test code uses expect for clarity")]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use rstest::rstest;

    use super::*;

    #[test]
    fn renders_records_per_address() {
        let resolution = Resolution {
            name: "example.test.".to_owned(),
            addresses: vec![
                IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)),
                IpAddr::V6(Ipv6Addr::LOCALHOST),
            ],
        };

        assert_eq!(
            resolution.to_string(),
            "example.test.\tIN\tA\t192.0.2.1\nexample.test.\tIN\tAAAA\t::1"
        );
    }

    #[rstest]
    #[case(200, "OK", "200 OK")]
    #[case(404, "Not Found", "404 Not Found")]
    #[case(599, "", "599")]
    fn formats_status_lines(#[case] status: u16, #[case] reason: &str, #[case] expected: &str) {
        let response = HttpResponse {
            status,
            reason: reason.to_owned(),
            body: Vec::new(),
        };
        assert_eq!(response.status_line(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("bad name")]
    fn rejects_unusable_names(#[case] name: &str) {
        let network = HostNetwork::new(Duration::from_secs(1));
        let error = network.resolve(name).expect_err("name must be rejected");
        assert!(matches!(error, NetworkError::InvalidName { .. }));
    }

    #[test]
    fn resolves_localhost_with_trailing_dot() {
        let network = HostNetwork::new(Duration::from_secs(1));
        let resolution = network.resolve("localhost").expect("localhost resolves");
        assert_eq!(resolution.name, "localhost.");
        assert!(resolution.addresses.iter().all(IpAddr::is_loopback));
    }

    #[rstest]
    #[case("not a url")]
    #[case("http://")]
    fn rejects_malformed_urls(#[case] url: &str) {
        let network = HostNetwork::new(Duration::from_secs(1));
        assert!(network.get(url).is_err());
    }

    #[test]
    fn rejects_urls_without_host() {
        let network = HostNetwork::new(Duration::from_secs(1));
        let error = network
            .get("unix:/run/socket")
            .expect_err("url without host must be rejected");
        assert!(matches!(error, NetworkError::MissingHost { .. }));
    }

    #[test]
    fn https_urls_open_a_tls_handshake() {
        use std::io::Read;
        use std::net::TcpListener;
        use std::time::Instant;

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        listener.set_nonblocking(true).expect("non-blocking listener");
        let port = listener.local_addr().expect("local address").port();

        let client = std::thread::spawn(move || {
            HostNetwork::new(Duration::from_secs(2)).get(&format!("https://127.0.0.1:{port}/"))
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut stream = loop {
            match listener.accept() {
                Ok((stream, _)) => break stream,
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(20));
                }
                Err(error) => panic!("client never connected: {error}"),
            }
        };
        stream.set_nonblocking(false).expect("blocking stream");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("read timeout");
        let mut record_type = [0_u8; 1];
        stream.read_exact(&mut record_type).expect("client hello");
        drop(stream);

        // 0x16 opens a TLS handshake record.
        assert_eq!(record_type, [0x16]);
        assert!(client.join().expect("client thread").is_err());
    }
}
