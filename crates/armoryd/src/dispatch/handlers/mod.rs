//! Command handlers, one module per command family.
//!
//! Each handler validates all of its tokens into a typed request before it
//! touches a capability, then renders the result as the reply text.

pub(crate) mod bus;
pub(crate) mod clock;
pub(crate) mod crypto;
pub(crate) mod diagnostics;
pub(crate) mod fuse;
pub(crate) mod led;
pub(crate) mod memory;
pub(crate) mod network;
pub(crate) mod storage;
pub(crate) mod system;
