use std::ops::Range;
use std::sync::{Mutex, PoisonError};

use crate::capability::Memory;
use crate::error::AccessError;

/// Flat memory window starting at address zero.
#[derive(Debug)]
pub struct SimMemory {
    bytes: Mutex<Vec<u8>>,
}

impl SimMemory {
    /// Creates a zero-filled window of `size` bytes.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            bytes: Mutex::new(vec![0; size as usize]),
        }
    }
}

fn span(address: u32, len: usize) -> Option<Range<usize>> {
    let start = address as usize;
    Some(start..start.checked_add(len)?)
}

fn outside_window(address: u32, len: usize, size: usize) -> AccessError {
    AccessError::MemoryRange {
        address,
        len,
        size: size as u64,
    }
}

impl Memory for SimMemory {
    fn read(&self, address: u32, len: usize) -> Result<Vec<u8>, AccessError> {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        span(address, len)
            .and_then(|range| bytes.get(range))
            .map(<[u8]>::to_vec)
            .ok_or_else(|| outside_window(address, len, bytes.len()))
    }

    fn write(&self, address: u32, data: &[u8]) -> Result<(), AccessError> {
        let mut bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        let size = bytes.len();
        let target = span(address, data.len())
            .and_then(|range| bytes.get_mut(range))
            .ok_or_else(|| outside_window(address, data.len(), size))?;
        target.copy_from_slice(data);
        Ok(())
    }
}
