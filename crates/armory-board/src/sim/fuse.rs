use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::capability::Fuses;
use crate::error::AccessError;

/// Fuse array of `banks` × `words` words, unprogrammed words reading zero.
#[derive(Debug)]
pub struct SimFuses {
    banks: u32,
    words: u32,
    programmed: Mutex<HashMap<(u32, u32), u32>>,
}

impl SimFuses {
    /// Creates an unprogrammed array.
    #[must_use]
    pub fn new(banks: u32, words: u32) -> Self {
        Self {
            banks,
            words,
            programmed: Mutex::new(HashMap::new()),
        }
    }

    /// Blows the bits of `value` into a word. Words outside the array are
    /// ignored.
    pub fn program(&self, bank: u32, word: u32, value: u32) {
        if bank >= self.banks || word >= self.words {
            return;
        }
        let mut programmed = self.programmed.lock().unwrap_or_else(PoisonError::into_inner);
        *programmed.entry((bank, word)).or_insert(0) |= value;
    }
}

impl Fuses for SimFuses {
    fn read(&self, bank: u32, word: u32) -> Result<u32, AccessError> {
        if bank >= self.banks {
            return Err(AccessError::FuseBank {
                bank,
                banks: self.banks,
            });
        }
        if word >= self.words {
            return Err(AccessError::FuseWord {
                word,
                words: self.words,
            });
        }
        let programmed = self.programmed.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(programmed.get(&(bank, word)).copied().unwrap_or(0))
    }
}
