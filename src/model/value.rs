use std::fmt;

/// The value an action yields once it has been run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unit,

    Text(String),

    // yield of a collecting sequence, one element per action, in order
    List(Vec<Value>)
}

impl Value {
    /// **@summary** - Renders the value the way `print` shows it
    ///
    /// **@returns** - `()` for unit, a quoted and escaped string for text, `[a,b]` for lists
    pub fn show(&self) -> String {
        match self {
            Value::Unit => String::from("()"),
            Value::Text(text) => {
                let mut shown = String::with_capacity(text.len() + 2);
                shown.push('"');
                for c in text.chars() {
                    match c {
                        '"' => shown.push_str("\\\""),
                        '\\' => shown.push_str("\\\\"),
                        '\n' => shown.push_str("\\n"),
                        _ => shown.push(c)
                    }
                }
                shown.push('"');
                shown
            },
            Value::List(values) => {
                let items: Vec<String> = values.iter().map(Value::show).collect();
                format!("[{}]", items.join(","))
            }
        }
    }

    /// Borrow the text of a `Text` value, `None` otherwise.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{}", text),
            other => write!(f, "{}", other.show())
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

/// ===============
/// |    TESTS    |
/// ===============
