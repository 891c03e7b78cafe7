//! Byte scanner over a buffered trace stream.
//!
//! XTR is whitespace separated integers with `.` terminator lines. The
//! scanner peeks single bytes straight out of the reader's buffer, so the
//! stream is never read ahead further than one buffer.

use std::io::BufRead;
use tracer_core::{TracerError, TracerResult};

/// Scanner position and lookahead over a trace stream
pub struct Scanner<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> Scanner<R> {
    /// Create a scanner at the start of a stream
    pub fn new(reader: R) -> Self {
        Self { reader, line: 1 }
    }

    /// One-based line number of the next byte
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Look at the next byte without consuming it
    ///
    /// # Errors
    ///
    /// Returns error if the underlying stream fails
    pub fn peek(&mut self) -> TracerResult<Option<u8>> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    /// Consume the next byte
    ///
    /// # Errors
    ///
    /// Returns error if the underlying stream fails
    pub fn bump(&mut self) -> TracerResult<Option<u8>> {
        let byte = self.peek()?;
        if let Some(b) = byte {
            self.reader.consume(1);
            if b == b'\n' {
                self.line += 1;
            }
        }
        Ok(byte)
    }

    /// Skip blanks (spaces and tabs) on the current line
    ///
    /// # Errors
    ///
    /// Returns error if the underlying stream fails
    pub fn skip_blanks(&mut self) -> TracerResult<()> {
        while matches!(self.peek()?, Some(b' ' | b'\t')) {
            self.bump()?;
        }
        Ok(())
    }

    /// Skip all whitespace, newlines included
    ///
    /// # Errors
    ///
    /// Returns error if the underlying stream fails
    pub fn skip_whitespace(&mut self) -> TracerResult<()> {
        while self.peek()?.is_some_and(|b| b.is_ascii_whitespace() || b == 0x0b) {
            self.bump()?;
        }
        Ok(())
    }

    /// Read an integer after optional whitespace.
    ///
    /// Returns `None` when no digits follow. The whitespace and a lone `+`
    /// or `-` are consumed in that case.
    ///
    /// # Errors
    ///
    /// Returns error if the stream fails or the value overflows
    pub fn read_int(&mut self) -> TracerResult<Option<i32>> {
        self.skip_whitespace()?;
        self.read_int_here()
    }

    /// Read an integer starting exactly at the next byte
    ///
    /// # Errors
    ///
    /// Returns error if the stream fails or the value overflows
    pub fn read_int_here(&mut self) -> TracerResult<Option<i32>> {
        let mut text = String::new();
        if let Some(sign @ (b'-' | b'+')) = self.peek()? {
            self.bump()?;
            text.push(char::from(sign));
        }
        while let Some(digit @ b'0'..=b'9') = self.peek()? {
            self.bump()?;
            text.push(char::from(digit));
        }
        if text.is_empty() || text == "-" || text == "+" {
            return Ok(None);
        }
        text.parse().map(Some).map_err(|_| {
            TracerError::invalid_trace(self.line, format!("integer '{}' out of range", text))
        })
    }

    /// Read a mandatory integer
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEndOfInput` at the end of the stream and
    /// `InvalidTraceFormat` when something else is found
    pub fn expect_int(&mut self, what: &str) -> TracerResult<i32> {
        if let Some(value) = self.read_int()? {
            return Ok(value);
        }
        match self.peek()? {
            None => Err(TracerError::end_of_input(what)),
            Some(b) => Err(TracerError::invalid_trace(
                self.line,
                format!("expected {} but found '{}'", what, char::from(b).escape_default()),
            )),
        }
    }

    /// Read the rest of the current line without its `\n`
    ///
    /// # Errors
    ///
    /// Returns error if the underlying stream fails
    pub fn read_line(&mut self) -> TracerResult<Option<String>> {
        let mut bytes = Vec::new();
        let read = self.reader.read_until(b'\n', &mut bytes)?;
        if read == 0 {
            return Ok(None);
        }
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            self.line += 1;
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Consume a terminator line consisting of a lone `.`.
    ///
    /// Blank lines before it are skipped, which includes the remainder of
    /// the line the previous record ended on.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEndOfInput` if the stream ends first and
    /// `InvalidTraceFormat` if any other text is found
    pub fn expect_dot(&mut self, context: &str) -> TracerResult<()> {
        loop {
            let line_number = self.line;
            let Some(line) = self.read_line()? else {
                return Err(TracerError::end_of_input(format!("'.' after {}", context)));
            };
            if line.trim().is_empty() {
                continue;
            }
            if line == "." {
                return Ok(());
            }
            return Err(TracerError::invalid_trace(
                line_number,
                format!(
                    "expected a line with '.' after {} but got '{}'",
                    context,
                    line.escape_default()
                ),
            ));
        }
    }
}
