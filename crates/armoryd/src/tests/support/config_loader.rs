//! Configuration loaders for bootstrap tests.

use std::sync::Arc;

use armory_config::{Config, SocketEndpoint};
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use crate::bootstrap::ConfigLoader;

/// Loads default configuration with the console socket moved somewhere
/// private to the test.
#[derive(Clone)]
pub struct TestConfigLoader {
    endpoint: SocketEndpoint,
    // Keeps the socket directory alive for as long as any clone exists.
    _scratch: Option<Arc<TempDir>>,
}

impl TestConfigLoader {
    /// Unix socket `armoryd.sock` in a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        let scratch = TempDir::new().expect("socket scratch directory");
        let socket = scratch.path().join("armoryd.sock");
        let socket = socket.to_str().expect("utf-8 socket path").to_owned();
        Self {
            endpoint: SocketEndpoint::unix(socket),
            _scratch: Some(Arc::new(scratch)),
        }
    }

    /// Loopback TCP on a port picked by the OS.
    #[must_use]
    pub fn tcp() -> Self {
        Self {
            endpoint: SocketEndpoint::tcp("127.0.0.1", 0),
            _scratch: None,
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let mut config = Config::default();
        config.console_socket = self.endpoint.clone();
        Ok(config)
    }
}

/// Fails the way a mistyped `--console-socket` flag does.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter(["armoryd", "--console-socket", "invalid://socket"])
    }
}
