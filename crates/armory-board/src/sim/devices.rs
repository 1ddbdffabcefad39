use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use time::{Duration, OffsetDateTime};

use crate::board::BoardInfo;
use crate::capability::{Clock, Led, Leds, Soc};
use crate::error::AccessError;
use crate::net::{HttpResponse, Network, NetworkError, Resolution};

/// LED pair that records its state.
#[derive(Debug, Default)]
pub struct SimLeds {
    white: AtomicBool,
    blue: AtomicBool,
}

impl SimLeds {
    /// Returns whether `led` is lit.
    #[must_use]
    pub fn is_on(&self, led: Led) -> bool {
        self.line(led).load(Ordering::SeqCst)
    }

    fn line(&self, led: Led) -> &AtomicBool {
        match led {
            Led::White => &self.white,
            Led::Blue => &self.blue,
        }
    }
}

impl Leds for SimLeds {
    fn set(&self, led: Led, on: bool) -> Result<(), AccessError> {
        self.line(led).store(on, Ordering::SeqCst);
        Ok(())
    }
}

/// Processor that counts reset requests instead of resetting.
#[derive(Debug)]
pub struct SimSoc {
    info: BoardInfo,
    resets: AtomicUsize,
}

impl SimSoc {
    /// Creates a processor describing itself with `info`.
    #[must_use]
    pub const fn new(info: BoardInfo) -> Self {
        Self {
            info,
            resets: AtomicUsize::new(0),
        }
    }

    /// Number of resets requested so far.
    #[must_use]
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl Soc for SimSoc {
    fn describe(&self) -> BoardInfo {
        self.info.clone()
    }

    fn reset(&self) -> Result<(), AccessError> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Host clock shifted by an adjustable offset.
///
/// Setting the time records the difference from the host clock; the
/// reported time keeps advancing from the new value. The offset spans any
/// pair of representable dates, so every accepted timestamp is kept exactly.
#[derive(Debug, Default)]
pub struct OffsetClock {
    offset: Mutex<Duration>,
}

impl OffsetClock {
    fn offset(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> OffsetDateTime {
        // Time past year 9999 stops at the last representable instant.
        OffsetDateTime::now_utc().saturating_add(self.offset())
    }

    fn set(&self, instant: OffsetDateTime) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset = instant - OffsetDateTime::now_utc();
    }
}

/// Network stack with no link.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNetwork;

impl OfflineNetwork {
    fn unreachable() -> NetworkError {
        NetworkError::Unreachable {
            reason: "no network interface".to_owned(),
        }
    }
}

impl Network for OfflineNetwork {
    fn resolve(&self, _name: &str) -> Result<Resolution, NetworkError> {
        Err(Self::unreachable())
    }

    fn get(&self, _url: &str) -> Result<HttpResponse, NetworkError> {
        Err(Self::unreachable())
    }
}
