//! Line-oriented console command dispatch.
//!
//! This module turns one line of operator input into one reply. The
//! [`Router`](router::Router) matches the line against a static command
//! table, the matched handler validates every argument into a typed request,
//! and only then calls the board capability it needs. Failures never close
//! a session; they become the reply text.
//!
//! ## Protocol
//!
//! Sessions are plain text. Each line is one command and each reply ends
//! with a single newline:
//!
//! ```text
//! > otp 4 2
//! OTP bank:4 word:2 val:0x89a26941
//! > md 1001 4
//! please only perform 32-bit aligned accesses
//! > exit
//! logout
//! ```
//!
//! Lines longer than [`MAX_LINE_BYTES`] are discarded and answered with an
//! error, and the session continues.

mod arguments;
mod dispatcher;
mod errors;
mod handler;
mod handlers;
mod hexdump;
mod response;
mod router;
mod session;
mod signature;

pub use self::dispatcher::{Dispatcher, LOGOUT, Outcome};
pub use self::errors::{DispatchError, FailureCategory};
pub use self::handler::{ConsoleConnectionHandler, MAX_LINE_BYTES};
pub use self::session::{SessionGuard, SessionRecord, SessionRegistry, SessionState};
