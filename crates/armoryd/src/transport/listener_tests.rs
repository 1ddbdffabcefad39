//! Socket listener tests.

use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};

use armory_config::SocketEndpoint;

use super::listener::SocketListener;
use super::{ListenerError, RecordingHandler};

const PATIENCE: Duration = Duration::from_secs(2);

#[fixture]
fn loopback() -> SocketListener {
    SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0)).expect("bind loopback")
}

#[rstest]
fn each_connection_gets_a_numbered_session_thread(loopback: SocketListener) {
    let addr = loopback.local_addr().expect("tcp address");
    let handler = Arc::new(RecordingHandler::default());
    let running = loopback.start(handler.clone()).expect("start listener");

    let _first = TcpStream::connect(addr).expect("first operator");
    let _second = TcpStream::connect(addr).expect("second operator");

    let mut served_by = handler.wait_for(2, PATIENCE);
    served_by.sort();
    assert_eq!(served_by, ["armory-session-1", "armory-session-2"]);

    running.shutdown();
    running.join().expect("listener thread exits");
}

#[rstest]
fn ephemeral_port_is_reported_in_the_bound_endpoint(loopback: SocketListener) {
    let port = loopback.local_addr().expect("tcp address").port();
    assert_ne!(port, 0);
    assert_eq!(
        loopback.bound_endpoint(),
        SocketEndpoint::tcp("127.0.0.1", port)
    );
}

#[cfg(unix)]
mod unix_sockets {
    use std::os::unix::net::{UnixListener, UnixStream};
    use std::path::Path;

    use super::*;

    #[fixture]
    fn scratch() -> tempfile::TempDir {
        tempfile::tempdir().expect("scratch dir")
    }

    fn endpoint_at(path: &Path) -> SocketEndpoint {
        SocketEndpoint::unix(path.to_str().expect("utf-8 path"))
    }

    #[rstest]
    fn stale_socket_is_replaced_and_removed_on_shutdown(scratch: tempfile::TempDir) {
        let path = scratch.path().join("armoryd.sock");
        drop(UnixListener::bind(&path).expect("leave a stale socket"));
        assert!(path.exists());

        let listener = SocketListener::bind(&endpoint_at(&path)).expect("reclaim stale socket");
        let handler = Arc::new(RecordingHandler::default());
        let running = listener.start(handler.clone()).expect("start listener");
        let _operator = UnixStream::connect(&path).expect("operator connects");
        assert_eq!(handler.wait_for(1, PATIENCE).len(), 1);

        running.shutdown();
        running.join().expect("listener thread exits");
        assert!(!path.exists(), "socket file outlived the listener");
    }

    #[rstest]
    fn live_socket_is_left_alone(scratch: tempfile::TempDir) {
        let path = scratch.path().join("armoryd.sock");
        let _owner = UnixListener::bind(&path).expect("another console");

        let error = SocketListener::bind(&endpoint_at(&path)).expect_err("socket is in use");
        assert!(matches!(error, ListenerError::UnixInUse { .. }));
        assert!(path.exists());
    }

    #[rstest]
    fn regular_file_is_never_deleted(scratch: tempfile::TempDir) {
        let path = scratch.path().join("armoryd.sock");
        std::fs::write(&path, b"operator notes").expect("write file");

        let error = SocketListener::bind(&endpoint_at(&path)).expect_err("not a socket");
        assert!(matches!(error, ListenerError::UnixNotSocket { .. }));
        assert_eq!(std::fs::read(&path).expect("file kept"), b"operator notes");
    }
}
