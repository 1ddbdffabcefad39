//! Sessions share one dispatcher without serialising commands.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use armory_board::{AccessError, Board, Memory};

use crate::dispatch::Outcome;
use crate::tests::support::{dispatcher_for, sim_board};

const RENDEZVOUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Memory that answers a read only once `expected` reads are in flight at
/// the same time.
struct RendezvousMemory {
    expected: usize,
    inside: Mutex<usize>,
    arrived: Condvar,
}

impl RendezvousMemory {
    fn new(expected: usize) -> Self {
        Self {
            expected,
            inside: Mutex::new(0),
            arrived: Condvar::new(),
        }
    }
}

impl Memory for RendezvousMemory {
    fn read(&self, _address: u32, len: usize) -> Result<Vec<u8>, AccessError> {
        let mut inside = self.inside.lock().expect("rendezvous mutex poisoned");
        *inside += 1;
        self.arrived.notify_all();
        let (inside, timeout) = self
            .arrived
            .wait_timeout_while(inside, RENDEZVOUS_TIMEOUT, |count| *count < self.expected)
            .expect("rendezvous mutex poisoned");
        drop(inside);
        if timeout.timed_out() {
            return Err(AccessError::Unsupported {
                operation: "overlapping reads",
            });
        }
        Ok(vec![0x5a; len])
    }

    fn write(&self, _address: u32, _data: &[u8]) -> Result<(), AccessError> {
        Ok(())
    }
}

#[test]
fn commands_from_different_sessions_run_concurrently() {
    let board = Board {
        memory: Arc::new(RendezvousMemory::new(2)),
        ..sim_board()
    };
    let dispatcher = Arc::new(dispatcher_for(board));

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || dispatcher.dispatch("md 0 4"))
        })
        .collect();

    for worker in workers {
        let outcome = worker.join().expect("dispatch thread panicked");
        match outcome {
            Outcome::Reply(text) => assert!(
                text.starts_with("00000000  5a 5a 5a 5a"),
                "reads did not overlap: {text:?}"
            ),
            Outcome::Terminate(text) => panic!("md ended the session with {text:?}"),
        }
    }
}

#[test]
fn state_written_by_one_session_is_visible_to_another() {
    let dispatcher = Arc::new(dispatcher_for(sim_board()));

    let writer = {
        let dispatcher = Arc::clone(&dispatcher);
        thread::spawn(move || dispatcher.dispatch("mw 40 cafef00d"))
    };
    assert_eq!(
        writer.join().expect("writer thread panicked"),
        Outcome::Reply(String::new())
    );

    let reader = {
        let dispatcher = Arc::clone(&dispatcher);
        thread::spawn(move || dispatcher.dispatch("md 40 4"))
    };
    let outcome = reader.join().expect("reader thread panicked");
    assert!(outcome.text().starts_with("00000000  ca fe f0 0d"));
}
