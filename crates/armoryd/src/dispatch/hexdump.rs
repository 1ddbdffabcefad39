//! Canonical hex and ASCII dump rendering.

use std::fmt::Write as _;

const BYTES_PER_LINE: usize = 16;

/// Renders `data` as offset, hex and ASCII columns, sixteen bytes per line.
///
/// Offsets count from the start of `data`. Bytes outside printable ASCII
/// show as `.` in the right-hand column. Empty input renders nothing.
pub(crate) fn dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(BYTES_PER_LINE) * 79);
    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        // Writing into a String cannot fail.
        let _ = write!(out, "{:08x}  ", line * BYTES_PER_LINE);
        for column in 0..BYTES_PER_LINE {
            match chunk.get(column) {
                Some(byte) => {
                    let _ = write!(out, "{byte:02x} ");
                }
                None => out.push_str("   "),
            }
            if column == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(chunk.iter().map(|byte| printable(*byte)));
        out.push_str("|\n");
    }
    out
}

fn printable(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        char::from(byte)
    } else {
        '.'
    }
}
