pub mod cancel;

use log::{debug, info, trace};
use cancel::CancelToken;
use crate::console::ConsoleTrait;
use crate::model::action::{Action, Continuation};
use crate::model::error::ActionError;
use crate::model::value::Value;

/// Work left pending while a child action runs
enum Frame {
    // bind: waits for the yield of its first action
    Continue(Continuation),

    Collect { values: Vec<Value>, rest: std::vec::IntoIter<Action> },

    Discard { rest: std::vec::IntoIter<Action> },

    Repeat { body: Action, iterations: u64 }
}

enum Step {
    Run(Action),
    Yield(Value)
}

/// The engine is the one place where actions turn into console effects.
/// Evaluation is depth-first and strictly in construction order.
pub struct ActionEngine {
    cancel_token: CancelToken
}

impl Default for ActionEngine {
    fn default() -> Self {
        ActionEngine::new()
    }
}

impl ActionEngine {
    /// Engine with its own token, nothing outside can stop its `Forever` loops
    pub fn new() -> Self {
        ActionEngine {
            cancel_token: CancelToken::new()
        }
    }

    pub fn with_cancel_token(cancel_token: CancelToken) -> Self {
        ActionEngine { cancel_token }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel_token.clone()
    }

    /// **@summary** - Runs an action against the console
    ///
    /// **@param** action: Action - The root action, consumed by the run
    ///
    /// **@param** console: &mut dyn ConsoleTrait - The console the effects are applied to
    ///
    /// **@returns** - The yield of the root action, or the first error met
    ///
    /// Pending work lives in an explicit frame stack, never on the native one: a bind
    /// pushes its continuation and descends into its first action, sequences and
    /// forever loops push their remaining work. Nesting depth costs heap, not stack.
    pub fn run(&self, action: Action, console: &mut dyn ConsoleTrait) -> Result<Value, ActionError> {
        let mut frames: Vec<Frame> = Vec::new();
        let res = self.run_frames(action, &mut frames, console);
        if let Err(e) = &res {
            debug!("run stopped with {} pending frames: {}", frames.len(), e);
        }
        res
    }

    fn run_frames(&self, action: Action, frames: &mut Vec<Frame>, console: &mut dyn ConsoleTrait) -> Result<Value, ActionError> {
        let mut step = self.descend(action, frames, console)?;
        loop {
            step = match step {
                Step::Run(next) => self.descend(next, frames, console)?,
                Step::Yield(value) => match frames.pop() {
                    None => return Ok(value),
                    Some(frame) => self.resume(frame, value, frames)?
                }
            };
        }
    }

    /// Runs a primitive, or pushes the work a composite leaves for later and hands back its first child.
    fn descend(&self, mut action: Action, frames: &mut Vec<Frame>, console: &mut dyn ConsoleTrait) -> Result<Step, ActionError> {
        trace!("{}", action.kind());
        match &mut action {
            Action::Print(text) => {
                console.write_line(text)?;
                Ok(Step::Yield(Value::Unit))
            },
            Action::Write(text) => {
                console.write(text)?;
                Ok(Step::Yield(Value::Unit))
            },
            Action::ReadLine => self.run_read_line(console).map(Step::Yield),
            Action::Pure(value) => Ok(Step::Yield(std::mem::replace(value, Value::Unit))),
            Action::Bind(first, continuation) => {
                // first's effects are all issued before the continuation builds anything
                frames.push(Frame::Continue(continuation.clone()));
                Ok(Step::Run(first.take()))
            },
            Action::Sequence(actions) => {
                let mut rest = std::mem::take(actions).into_iter();
                match rest.next() {
                    Some(next) => {
                        frames.push(Frame::Collect { values: Vec::with_capacity(rest.len() + 1), rest });
                        Ok(Step::Run(next))
                    },
                    None => Ok(Step::Yield(Value::List(Vec::new())))
                }
            },
            Action::SequenceDiscard(actions) => {
                let mut rest = std::mem::take(actions).into_iter();
                match rest.next() {
                    Some(next) => {
                        frames.push(Frame::Discard { rest });
                        Ok(Step::Run(next))
                    },
                    None => Ok(Step::Yield(Value::Unit))
                }
            },
            Action::Forever(body) => self.repeat(body.take(), 0, frames)
        }
    }

    /// Hands a yield to the innermost pending frame.
    fn resume(&self, frame: Frame, value: Value, frames: &mut Vec<Frame>) -> Result<Step, ActionError> {
        match frame {
            // tail position: the frame is gone before the next action starts
            Frame::Continue(continuation) => Ok(Step::Run(continuation(value))),
            Frame::Collect { mut values, mut rest } => {
                values.push(value);
                match rest.next() {
                    Some(next) => {
                        frames.push(Frame::Collect { values, rest });
                        Ok(Step::Run(next))
                    },
                    None => Ok(Step::Yield(Value::List(values)))
                }
            },
            Frame::Discard { mut rest } => match rest.next() {
                Some(next) => {
                    frames.push(Frame::Discard { rest });
                    Ok(Step::Run(next))
                },
                None => Ok(Step::Yield(Value::Unit))
            },
            Frame::Repeat { body, iterations } => {
                debug!("forever iteration {}", iterations + 1);
                self.repeat(body, iterations + 1, frames)
            }
        }
    }

    /// Starts one more round of a forever loop, unless the token fired meanwhile.
    fn repeat(&self, body: Action, iterations: u64, frames: &mut Vec<Frame>) -> Result<Step, ActionError> {
        if self.cancel_token.is_cancelled() {
            info!("forever loop cancelled after {} iterations", iterations);
            return Err(ActionError::Cancelled);
        }
        let next = body.clone();
        frames.push(Frame::Repeat { body, iterations });
        Ok(Step::Run(next))
    }

    fn run_read_line(&self, console: &mut dyn ConsoleTrait) -> Result<Value, ActionError> {
        match console.read_line()? {
            Some(line) => Ok(Value::Text(line)),
            None => {
                debug!("readline hit the end of input");
                Err(ActionError::EndOfInput)
            }
        }
    }
}

/// ===============
/// |    TESTS    |
/// ===============
