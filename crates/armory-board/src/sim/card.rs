use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::capability::{Card, CardInfo};
use crate::error::AccessError;

const BLOCK_SIZE: u32 = 512;
const BOOT_SIGNATURE_OFFSET: usize = 0x1fe;

/// Removable card whose contents live in memory.
///
/// New cards carry a boot sector signature (`55 aa`) at the end of their
/// first block. Reads are refused until the card has been detected, and
/// ejecting or inserting the card clears detection.
#[derive(Debug)]
pub struct SimCard {
    contents: Vec<u8>,
    present: AtomicBool,
    detected: AtomicBool,
    detections: AtomicUsize,
}

impl SimCard {
    /// Creates an inserted, undetected card of `capacity` bytes.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        let mut contents = vec![0; usize::try_from(capacity).unwrap_or(usize::MAX)];
        if let Some(signature) =
            contents.get_mut(BOOT_SIGNATURE_OFFSET..BOOT_SIGNATURE_OFFSET + 2)
        {
            signature.copy_from_slice(&[0x55, 0xaa]);
        }
        Self {
            contents,
            present: AtomicBool::new(true),
            detected: AtomicBool::new(false),
            detections: AtomicUsize::new(0),
        }
    }

    /// Removes the card from its slot.
    pub fn eject(&self) {
        self.present.store(false, Ordering::SeqCst);
        self.detected.store(false, Ordering::SeqCst);
    }

    /// Puts the card back in its slot.
    pub fn insert(&self) {
        self.present.store(true, Ordering::SeqCst);
        self.detected.store(false, Ordering::SeqCst);
    }

    /// Number of successful detections so far.
    #[must_use]
    pub fn detections(&self) -> usize {
        self.detections.load(Ordering::SeqCst)
    }

    fn capacity(&self) -> u64 {
        self.contents.len() as u64
    }
}

impl Card for SimCard {
    fn detect(&self) -> Result<CardInfo, AccessError> {
        if !self.present.load(Ordering::SeqCst) {
            return Err(AccessError::NoCard);
        }
        self.detected.store(true, Ordering::SeqCst);
        self.detections.fetch_add(1, Ordering::SeqCst);
        Ok(CardInfo {
            capacity: self.capacity(),
            block_size: BLOCK_SIZE,
        })
    }

    fn read(&self, offset: u64, size: usize) -> Result<Vec<u8>, AccessError> {
        if !self.present.load(Ordering::SeqCst) {
            return Err(AccessError::NoCard);
        }
        if !self.detected.load(Ordering::SeqCst) {
            return Err(AccessError::NotDetected);
        }

        let out_of_range = || AccessError::CardRange {
            offset,
            size,
            capacity: self.capacity(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_range())?;
        let end = start.checked_add(size).ok_or_else(out_of_range)?;
        self.contents
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_reads_before_detection() {
        let card = SimCard::new(4096);
        assert_eq!(card.read(0, 16), Err(AccessError::NotDetected));
    }

    #[test]
    fn detected_card_exposes_boot_signature() {
        let card = SimCard::new(4096);
        let info = card.detect();
        assert_eq!(
            info,
            Ok(CardInfo {
                capacity: 4096,
                block_size: 512
            })
        );
        assert_eq!(card.read(0x1fe, 2), Ok(vec![0x55, 0xaa]));
        assert_eq!(card.detections(), 1);
    }

    #[test]
    fn reinsertion_clears_detection() {
        let card = SimCard::new(4096);
        assert!(card.detect().is_ok());
        card.eject();
        assert_eq!(card.detect(), Err(AccessError::NoCard));
        card.insert();
        assert_eq!(card.read(0, 1), Err(AccessError::NotDetected));
    }

    #[test]
    fn rejects_reads_past_capacity() {
        let card = SimCard::new(1024);
        assert!(card.detect().is_ok());
        assert_eq!(
            card.read(1000, 100),
            Err(AccessError::CardRange {
                offset: 1000,
                size: 100,
                capacity: 1024
            })
        );
    }
}
