pub mod scripted;
pub mod stdio;

use mockall::automock;
use crate::model::error::ActionError;

/// The console is the only thing actions can act upon.
/// The engine borrows it for the whole run, nothing else writes or reads it meanwhile.
#[automock]
pub trait ConsoleTrait {
    /// **@summary** - Writes the text followed by a newline
    ///
    /// **@param** text: &str - The text to write
    ///
    /// **@returns** - An error only if the underlying console failed
    fn write_line(&mut self, text: &str) -> Result<(), ActionError>;

    /// **@summary** - Writes the text as is, without a newline
    ///
    /// **@param** text: &str - The text to write
    ///
    /// **@returns** - An error only if the underlying console failed
    fn write(&mut self, text: &str) -> Result<(), ActionError>;

    /// **@summary** - Reads the next input line, without its line terminator
    ///
    /// **@returns** - `Ok(None)` once the input is exhausted
    fn read_line(&mut self) -> Result<Option<String>, ActionError>;
}
