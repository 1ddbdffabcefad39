//! Reply framing for console sessions.

use std::io::{self, Write};

/// Writes command replies, each terminated by exactly one newline.
pub(crate) struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `text` with trailing newlines collapsed into one terminator,
    /// then flushes so the operator sees the reply before the next prompt.
    pub(crate) fn write_reply(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.trim_end_matches(['\n', '\r']).as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}
