use std::io::{self, BufRead, Write};
use crate::console::ConsoleTrait;
use crate::model::error::ActionError;

/// Console backed by a line reader and a writer, stdin and stdout by default.
pub struct StdConsole<R: BufRead, W: Write> {
    input: R,
    output: W
}

impl StdConsole<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process' standard input and output
    pub fn stdio() -> Self {
        StdConsole::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StdConsole { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> ConsoleTrait for StdConsole<R, W> {
    fn write_line(&mut self, text: &str) -> Result<(), ActionError> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    // Flushed right away so a prompt shows up before a blocking read
    fn write(&mut self, text: &str) -> Result<(), ActionError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ActionError> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        // a CRLF file may end on a bare `\r`
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// ===============
/// |    TESTS    |
/// ===============
