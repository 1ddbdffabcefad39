//! Launch supervision: bootstrap, serve, wait for shutdown, stop.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use crate::health::HealthReporter;
use crate::process::launch::{LaunchPlan, run_daemon_with};
use crate::process::{LaunchError, ShutdownError, ShutdownSignal};
use crate::tests::support::{
    FailingConfigLoader, HealthEvent, RecordingHealthReporter, StubBoardProvider,
    TestConfigLoader,
};

const PATIENCE: Duration = Duration::from_secs(2);

/// Stop request sent by the test body over a channel.
#[derive(Clone)]
struct ChannelShutdown {
    stop: mpsc::Sender<()>,
    stopped: Arc<Mutex<mpsc::Receiver<()>>>,
}

impl ChannelShutdown {
    fn armed() -> Self {
        let (stop, stopped) = mpsc::channel();
        Self {
            stop,
            stopped: Arc::new(Mutex::new(stopped)),
        }
    }

    fn already_requested() -> Self {
        let shutdown = Self::armed();
        shutdown.request();
        shutdown
    }

    fn request(&self) {
        self.stop.send(()).expect("shutdown receiver is alive");
    }
}

impl ShutdownSignal for ChannelShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        let stopped = self.stopped.lock().expect("shutdown receiver lock");
        stopped.recv().expect("shutdown sender is alive");
        Ok(())
    }
}

/// Polls the reporter until the TCP listener announces its address.
fn tcp_listener_address(reporter: &RecordingHealthReporter) -> Option<String> {
    let give_up = Instant::now() + PATIENCE;
    loop {
        let address = reporter.events().into_iter().find_map(|event| {
            let HealthEvent::ListenerReady(endpoint) = event else {
                return None;
            };
            endpoint.strip_prefix("tcp://").map(ToOwned::to_owned)
        });
        if address.is_some() || Instant::now() >= give_up {
            return address;
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn pending_shutdown_stops_the_console_after_start() {
    let reporter = Arc::new(RecordingHealthReporter::default());
    let plan = LaunchPlan {
        loader: TestConfigLoader::tcp(),
        reporter: Arc::clone(&reporter) as Arc<dyn HealthReporter>,
        provider: StubBoardProvider,
        shutdown: ChannelShutdown::already_requested(),
    };

    run_daemon_with(plan).expect("launch should succeed");

    let events = reporter.events();
    assert_eq!(events.first(), Some(&HealthEvent::BootstrapStarting));
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::ListenerReady(_)))
    );
    assert_eq!(events.last(), Some(&HealthEvent::ShutdownRequested));
}

#[test]
fn configuration_failure_aborts_launch() {
    let reporter = Arc::new(RecordingHealthReporter::default());
    let plan = LaunchPlan {
        loader: FailingConfigLoader,
        reporter: Arc::clone(&reporter) as Arc<dyn HealthReporter>,
        provider: StubBoardProvider,
        shutdown: ChannelShutdown::armed(),
    };

    let error = run_daemon_with(plan).expect_err("launch should fail");

    assert!(matches!(error, LaunchError::Bootstrap { .. }));
    assert!(
        !reporter
            .events()
            .iter()
            .any(|event| matches!(event, HealthEvent::ListenerReady(_)))
    );
}

#[test]
fn console_serves_sessions_until_shutdown() {
    let reporter = Arc::new(RecordingHealthReporter::default());
    let shutdown = ChannelShutdown::armed();
    let plan = LaunchPlan {
        loader: TestConfigLoader::tcp(),
        reporter: Arc::clone(&reporter) as Arc<dyn HealthReporter>,
        provider: StubBoardProvider,
        shutdown: shutdown.clone(),
    };
    let daemon = thread::spawn(move || run_daemon_with(plan));

    let address = tcp_listener_address(&reporter).expect("listener should become ready");
    let mut stream = TcpStream::connect(address.as_str()).expect("connect to console");
    stream
        .set_read_timeout(Some(PATIENCE))
        .expect("set read timeout");
    stream.write_all(b"otp 4 2\nquit\n").expect("send commands");

    let mut replies = BufReader::new(stream).lines();
    let first = replies.next().and_then(Result::ok);
    let second = replies.next().and_then(Result::ok);
    assert_eq!(first.as_deref(), Some("OTP bank:4 word:2 val:0x89a26941"));
    assert_eq!(second.as_deref(), Some("logout"));

    shutdown.request();
    let result = daemon.join().expect("daemon thread panicked");
    assert!(result.is_ok(), "launch failed: {result:?}");
}
