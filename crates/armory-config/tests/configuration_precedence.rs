//! Behaviour tests for configuration layering.

use std::cell::RefCell;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use armory_config::{
    Config, DEFAULT_I2C_BUSES, DEFAULT_OTP_BANKS, SocketEndpoint, default_console_socket,
    default_log_filter, default_log_format,
};

const SOCKET_VAR: &str = "ARMORY_CONSOLE_SOCKET";

// Process environment is shared by every test thread.
static ENVIRONMENT: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Environment variables set by a scenario, put back on drop.
struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    fn acquire() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENVIRONMENT.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn set(&mut self, name: &'static str, value: &str) {
        self.saved.push((name, std::env::var_os(name)));
        // SAFETY: `_lock` serialises every scenario touching the environment.
        unsafe { std::env::set_var(name, value) };
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (name, previous) in self.saved.drain(..).rev() {
            // SAFETY: the lock is still held until this struct is gone.
            match previous {
                Some(value) => unsafe { std::env::set_var(name, value) },
                None => unsafe { std::env::remove_var(name) },
            }
        }
    }
}

struct LayersWorld {
    scratch: TempDir,
    env: ScopedEnv,
    config_file: Option<PathBuf>,
    flags: Vec<String>,
    outcome: Option<Result<Config, String>>,
}

impl LayersWorld {
    fn argv(&self) -> Vec<OsString> {
        let mut argv = vec![OsString::from("armoryd")];
        if let Some(path) = &self.config_file {
            argv.push("--config-path".into());
            argv.push(path.clone().into_os_string());
        }
        argv.extend(self.flags.iter().map(OsString::from));
        argv
    }

    fn config(&mut self) -> &Config {
        let argv = self.argv();
        let outcome = self
            .outcome
            .get_or_insert_with(|| Config::load_from_iter(argv).map_err(|e| e.to_string()));
        match outcome {
            Ok(config) => config,
            Err(error) => panic!("configuration failed to load: {error}"),
        }
    }
}

fn endpoint(text: &str) -> SocketEndpoint {
    text.parse()
        .unwrap_or_else(|error| panic!("invalid socket '{text}': {error}"))
}

/// Renders the endpoint in the tagged table form.
fn socket_table(endpoint: &SocketEndpoint) -> String {
    match endpoint {
        SocketEndpoint::Tcp { host, port } => {
            format!(r#"{{ transport = "tcp", host = "{host}", port = {port} }}"#)
        }
        SocketEndpoint::Unix { path } => format!(r#"{{ transport = "unix", path = "{path}" }}"#),
    }
}

#[fixture]
fn world() -> RefCell<LayersWorld> {
    RefCell::new(LayersWorld {
        scratch: TempDir::new().expect("scratch directory"),
        env: ScopedEnv::acquire(),
        config_file: None,
        flags: Vec::new(),
        outcome: None,
    })
}

#[given("a configuration file setting the console socket to \"{socket}\"")]
fn configuration_file(world: &RefCell<LayersWorld>, socket: String) {
    let mut world = world.borrow_mut();
    let path = world.scratch.path().join("armory.toml");
    let body = format!("console_socket = {}\n", socket_table(&endpoint(&socket)));
    std::fs::write(&path, body).expect("write configuration file");
    world.config_file = Some(path);
}

#[given("the environment overrides the console socket to \"{socket}\"")]
fn environment_override(world: &RefCell<LayersWorld>, socket: String) {
    world.borrow_mut().env.set(SOCKET_VAR, &socket);
}

#[when("the CLI sets the console socket to \"{socket}\"")]
fn cli_socket(world: &RefCell<LayersWorld>, socket: String) {
    let mut world = world.borrow_mut();
    world.flags.extend(["--console-socket".to_owned(), socket]);
}

#[when("the CLI sets the I2C bus count to {count}")]
fn cli_bus_count(world: &RefCell<LayersWorld>, count: u8) {
    let mut world = world.borrow_mut();
    world
        .flags
        .extend(["--i2c-buses".to_owned(), count.to_string()]);
}

#[when("the configuration loads without overrides")]
fn no_overrides(world: &RefCell<LayersWorld>) {
    world.borrow_mut().config();
}

#[then("loading the configuration resolves the console socket to \"{socket}\"")]
fn resolved_socket(world: &RefCell<LayersWorld>, socket: String) {
    let mut world = world.borrow_mut();
    assert_eq!(world.config().console_socket(), &endpoint(&socket));
}

#[then("loading the configuration reports {count} I2C buses")]
fn reported_buses(world: &RefCell<LayersWorld>, count: u8) {
    let mut world = world.borrow_mut();
    let config = world.config();
    assert_eq!(config.i2c_buses, count);
    assert_eq!(config.otp_banks, DEFAULT_OTP_BANKS);
}

#[then("loading the configuration applies the built-in defaults")]
fn built_in_defaults(world: &RefCell<LayersWorld>) {
    let mut world = world.borrow_mut();
    let config = world.config();
    assert_eq!(config.console_socket(), &default_console_socket());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert_eq!(config.i2c_buses, DEFAULT_I2C_BUSES);
    assert_eq!(config, &Config::default());
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(world)] world: RefCell<LayersWorld>) {
    drop(world);
}
