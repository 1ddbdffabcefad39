//! Process-wide `tracing` setup.
//!
//! Events go to stderr, either as one JSON object per line or in the compact
//! human format. Timestamps are RFC 3339 in UTC and every event carries its
//! thread name, so `armory-session-N` identifies the operator session.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use time::format_description::well_known::Rfc3339;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{
    self,
    format::{DefaultFields, Format, Full},
    time::UtcTime,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use armory_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Telemetry could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls succeed without reinstalling. A bad filter is reported on
/// each attempt until one succeeds.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config))?;
    Ok(TelemetryHandle)
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    let output = match config.log_format() {
        LogFormat::Json => stderr_layer().json().flatten_event(true).boxed(),
        LogFormat::Compact => stderr_layer().compact().boxed(),
    };
    let subscriber = tracing_subscriber::registry().with(filter).with(output);
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

type StderrWriter = fn() -> io::Stderr;

fn stderr_layer<S>() -> fmt::Layer<S, DefaultFields, Format<Full, UtcTime<Rfc3339>>, StderrWriter>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(io::stderr as StderrWriter)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_names(true)
}
