//! `help`, `info`, `rand`, `reboot` and `test`.

use std::env::consts::{ARCH, OS};
use std::fmt::Write as _;
use std::time::Duration;

use armory_board::{AES_BLOCK_SIZE, Board};

use crate::dispatch::errors::DispatchError;

/// The command reference shown by `help`.
pub(crate) const HELP: &str = "
  help                                   # this help
  exit, quit                             # close session
  info                                   # SoC/board information
  rand                                   # gather 32 bytes from TRNG
  reboot                                 # reset the SoC/board
  stack                                  # stack trace of current session
  stackall                               # all sessions and current stack trace
  date                                   # show   runtime date and time
  date <time in RFC3339 format>          # change runtime date and time
  dns  <fqdn>                            # resolve domain (requires routing)
  curl <url>                             # HTTP GET (requires routing)

  test                                   # run board self-test

  i2c <n> <hex slave> <hex addr> <size>  # I2C bus read
  mmc <n> <hex offset> <size>            # internal MMC/SD card read
  md  <hex offset> <size>                # memory display (use with caution)
  mw  <hex offset> <hex value>           # memory write   (use with caution)
  led (white|blue) (on|off)              # LED control
  dcp <size> <sec>                       # benchmark hardware encryption
  otp <bank> <word>                      # OTP fuse display
";

const RANDOM_BYTES: usize = 32;

const KAT_KEY: [u8; AES_BLOCK_SIZE] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];
const KAT_PLAINTEXT: [u8; AES_BLOCK_SIZE] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];
const KAT_CIPHERTEXT: [u8; AES_BLOCK_SIZE] = [
    0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5, 0x5a,
];

pub(crate) fn info(board: &Board, uptime: Duration) -> String {
    let description = board.soc.describe();
    let leds = if board.leds.is_some() { "present" } else { "absent" };
    [
        format!(
            "Runtime ......: {} {} ({OS}/{ARCH})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
        format!("Board ........: {}", description.board),
        format!("SoC ..........: {}", description.soc),
        format!("Memory .......: {} bytes", description.memory_bytes),
        format!("I2C buses ....: {}", board.i2c.len()),
        format!("MMC cards ....: {}", board.cards.len()),
        format!("LEDs .........: {leds}"),
        format!(
            "Uptime .......: {:?}",
            Duration::from_secs(uptime.as_secs())
        ),
    ]
    .join("\n")
}

pub(crate) fn random(board: &Board) -> Result<String, DispatchError> {
    let mut buf = [0_u8; RANDOM_BYTES];
    board.entropy.fill(&mut buf)?;
    Ok(hex::encode(buf))
}

pub(crate) fn reboot(board: &Board) -> Result<String, DispatchError> {
    board.soc.reset()?;
    Ok(String::new())
}

/// Exercises the cipher, the entropy source and every card slot.
///
/// Failures are reported in the output, one line per check, and never
/// abort the remaining checks.
pub(crate) fn self_test(board: &Board) -> String {
    let mut report = String::new();

    let mut block = KAT_PLAINTEXT;
    let aes = match board
        .cipher
        .encrypt_cbc(&KAT_KEY, &[0; AES_BLOCK_SIZE], &mut block)
    {
        Ok(()) if block == KAT_CIPHERTEXT => "ok".to_owned(),
        Ok(()) => format!("FAILED (got {})", hex::encode(block)),
        Err(error) => format!("FAILED ({error})"),
    };
    let _ = writeln!(report, "aes-128 cbc known answer: {aes}");

    let mut sample = [0_u8; RANDOM_BYTES];
    let entropy = match board.entropy.fill(&mut sample) {
        Ok(()) => format!("ok ({RANDOM_BYTES} bytes)"),
        Err(error) => format!("FAILED ({error})"),
    };
    let _ = writeln!(report, "entropy: {entropy}");

    for (index, card) in board.cards.iter().enumerate() {
        let _ = match card.detect() {
            Ok(detected) => writeln!(
                report,
                "mmc {index}: {} bytes, {} byte blocks",
                detected.capacity, detected.block_size
            ),
            Err(error) => writeln!(report, "mmc {index}: {error}"),
        };
    }
    report
}
