use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::capability::{AES_BLOCK_SIZE, CipherEngine, EntropySource};
use crate::error::AccessError;

/// AES engine implemented in software.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareAes;

impl CipherEngine for SoftwareAes {
    fn encrypt_cbc(
        &self,
        key: &[u8; AES_BLOCK_SIZE],
        iv: &[u8; AES_BLOCK_SIZE],
        data: &mut [u8],
    ) -> Result<(), AccessError> {
        if data.len() % AES_BLOCK_SIZE != 0 {
            return Err(AccessError::cipher(format!(
                "{} bytes is not a multiple of the {AES_BLOCK_SIZE} byte block",
                data.len()
            )));
        }
        let len = data.len();
        cbc::Encryptor::<Aes128>::new(key.into(), iv.into())
            .encrypt_padded_mut::<NoPadding>(data, len)
            .map(|_| ())
            .map_err(|error| AccessError::cipher(error.to_string()))
    }
}

/// Entropy drawn from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AccessError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|error| AccessError::entropy(error.to_string()))
    }
}
