//! Line-oriented console primitives
//!
//! Every interactive loop in the crate talks to the terminal through a
//! [`Console`], which pairs a buffered reader with a writer. The binary uses
//! locked stdin/stdout; tests drive the same loops from in-memory buffers.

use std::fmt;
use std::io::{self, BufRead, Write};

/// Failures while talking to the user.
#[derive(Debug)]
pub enum UiError {
    /// The input stream reached end-of-file; no further answers can arrive.
    InputClosed,
    /// Reading from or writing to the terminal failed.
    Io(io::Error),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::InputClosed => write!(f, "input stream closed"),
            UiError::Io(err) => write!(f, "terminal I/O failed: {err}"),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::InputClosed => None,
            UiError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for UiError {
    fn from(err: io::Error) -> Self {
        UiError::Io(err)
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process's standard input and output.
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `message` on its own line, then read one line of input.
    ///
    /// The answer is returned with surrounding whitespace removed. End of
    /// input is reported as [`UiError::InputClosed`].
    pub fn prompt(&mut self, message: &str) -> Result<String, UiError> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(UiError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    pub fn say(&mut self, line: impl fmt::Display) -> Result<(), UiError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
impl<R> Console<R, Vec<u8>> {
    /// Everything written so far, for assertions in tests.
    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}
