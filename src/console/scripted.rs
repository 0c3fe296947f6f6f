use std::collections::VecDeque;
use crate::console::ConsoleTrait;
use crate::model::error::ActionError;

/// In-memory console: a queue of input lines and a transcript of everything written.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    transcript: String
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        ScriptedConsole {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: String::new()
        }
    }

    /// **@summary** - Builds a console whose input is the given text, one line per input line
    ///
    /// **@param** text: &str - Newline separated input, a trailing newline does not add an empty line
    pub fn from_text(text: &str) -> Self {
        ScriptedConsole::new(text.lines())
    }

    /// Everything written so far
    pub fn output(&self) -> &str {
        &self.transcript
    }

    pub fn written_lines(&self) -> Vec<&str> {
        self.transcript.lines().collect()
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl ConsoleTrait for ScriptedConsole {
    fn write_line(&mut self, text: &str) -> Result<(), ActionError> {
        self.transcript.push_str(text);
        self.transcript.push('\n');
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), ActionError> {
        self.transcript.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ActionError> {
        Ok(self.input.pop_front())
    }
}

/// ===============
/// |    TESTS    |
/// ===============
