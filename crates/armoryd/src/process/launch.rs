//! Supervises console launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::info;

use crate::board::{BoardProvider, SimulatedBoardProvider};
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the console runtime.
pub(crate) struct LaunchPlan<L, P, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) provider: P,
    pub(crate) shutdown: S,
}

/// Runs the console using the production collaborators.
///
/// Blocks until a termination signal arrives.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, the listener or signal
/// installation fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    let plan = LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        provider: SimulatedBoardProvider,
        shutdown: SystemShutdownSignal::new(),
    };
    run_daemon_with(plan)
}

/// Runs the console with injected collaborators.
pub(crate) fn run_daemon_with<L, P, S>(plan: LaunchPlan<L, P, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    P: BoardProvider,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        reporter,
        provider,
        shutdown,
    } = plan;

    let console = bootstrap_with(&loader, Arc::clone(&reporter), &provider)?;
    info!(target: PROCESS_TARGET, "starting console runtime");
    let running = console.start()?;
    shutdown.wait()?;
    reporter.shutdown_requested();
    running.stop()?;
    info!(
        target: PROCESS_TARGET,
        "shutdown sequence completed"
    );
    Ok(())
}
