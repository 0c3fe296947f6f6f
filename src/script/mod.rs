pub mod parser;

use std::sync::Arc;
use log::debug;
use parser::{parse_script, ScriptExpr};
use crate::demo::reverse_words;
use crate::model::action::{self, Action, Continuation};
use crate::model::error::ScriptError;
use crate::model::value::Value;

/// Continuation names a script may bind to
pub const CONTINUATIONS: &[&str] = &["echo", "shout", "reverse", "show", "ignore"];

fn continuation(name: &str) -> Result<Continuation, ScriptError> {
    let k: Continuation = match name {
        "echo" => Arc::new(|value: Value| action::print(value.to_string())),
        "shout" => Arc::new(|value: Value| action::print(value.to_string().to_uppercase())),
        "reverse" => Arc::new(|value: Value| action::print(reverse_words(&value.to_string()))),
        "show" => Arc::new(|value: Value| action::print_value(&value)),
        "ignore" => Arc::new(|_: Value| action::unit()),
        other => return Err(ScriptError::UnknownContinuation(other.to_string()))
    };
    Ok(k)
}

/// **@summary** - Turns a parsed script into the action it describes
///
/// **@param** expr: ScriptExpr - The script AST
///
/// **@returns** - The action, or an error naming the first unknown continuation
pub fn compile(expr: ScriptExpr<'_>) -> Result<Action, ScriptError> {
    match expr {
        ScriptExpr::Print(text) => Ok(action::print(text)),
        ScriptExpr::Write(text) => Ok(action::write(text)),
        ScriptExpr::Pure(text) => Ok(action::pure(text)),
        ScriptExpr::ReadLine => Ok(action::read_line()),
        ScriptExpr::Forever(body) => Ok(action::forever(compile(*body)?)),
        ScriptExpr::Bind(first, names) => {
            let first = compile(*first)?;
            names.into_iter().try_fold(first, |bound, name| -> Result<Action, ScriptError> {
                Ok(Action::Bind(Box::new(bound), continuation(name)?))
            })
        },
        ScriptExpr::Sequence(exprs) => {
            let actions = exprs.into_iter().map(compile).collect::<Result<Vec<Action>, ScriptError>>()?;
            Ok(action::sequence_(actions))
        }
    }
}

/// Parses then compiles a script.
pub fn load(source: &str) -> Result<Action, ScriptError> {
    let expr = parse_script(source)?;
    debug!("parsed script: {:?}", expr);
    compile(expr)
}

/// ===============
/// |    TESTS    |
/// ===============
