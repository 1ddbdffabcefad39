//! `dcp`: AES-128-CBC throughput benchmark.

use std::time::{Duration, Instant};

use armory_board::{AES_BLOCK_SIZE, Board};
use tracing::info;

use crate::dispatch::arguments::{self, SIZE_LIMIT};
use crate::dispatch::errors::DispatchError;
use crate::dispatch::router::DISPATCH_TARGET;

/// Largest buffer, in blocks, encrypted per iteration.
pub(crate) const MAX_BLOCKS: usize = SIZE_LIMIT / AES_BLOCK_SIZE;
/// Longest benchmark run in seconds.
pub(crate) const MAX_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Benchmark {
    pub(crate) blocks: usize,
    pub(crate) duration: Duration,
}

impl Benchmark {
    /// Validates `dcp <blocks> <seconds>`.
    pub(crate) fn parse(tokens: &[&str]) -> Result<Self, DispatchError> {
        let [blocks, seconds] = tokens else {
            return Err(DispatchError::UnknownCommand);
        };
        let blocks = arguments::dec_u32(blocks, "size")?;
        let seconds = arguments::dec_u32(seconds, "duration")?;
        let blocks = usize::try_from(blocks)
            .ok()
            .filter(|blocks| (1..=MAX_BLOCKS).contains(blocks))
            .ok_or_else(|| {
                DispatchError::invalid_argument(
                    "size",
                    format!("must be between 1 and {MAX_BLOCKS} blocks"),
                )
            })?;
        if seconds > MAX_SECONDS {
            return Err(DispatchError::invalid_argument(
                "duration",
                format!("must be at most {MAX_SECONDS} seconds"),
            ));
        }
        Ok(Self {
            blocks,
            duration: Duration::from_secs(u64::from(seconds)),
        })
    }
}

/// Encrypts a zeroed buffer in place until the duration has elapsed.
///
/// At least one pass always runs, so a zero duration measures one pass.
pub(crate) fn benchmark(board: &Board, tokens: &[&str]) -> Result<String, DispatchError> {
    let request = Benchmark::parse(tokens)?;
    let key = [0_u8; AES_BLOCK_SIZE];
    let iv = [0_u8; AES_BLOCK_SIZE];
    let mut buffer = vec![0_u8; request.blocks * AES_BLOCK_SIZE];

    let started = Instant::now();
    let mut passes: u64 = 0;
    let elapsed = loop {
        board.cipher.encrypt_cbc(&key, &iv, &mut buffer)?;
        passes += 1;
        let elapsed = started.elapsed();
        if elapsed >= request.duration {
            break elapsed;
        }
    };

    info!(
        target: DISPATCH_TARGET,
        blocks = request.blocks,
        passes,
        elapsed_ms = elapsed.as_millis(),
        "cipher benchmark finished"
    );
    Ok(format!("{passes} aes-128 cbc's in {elapsed:?}"))
}
