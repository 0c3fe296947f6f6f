use std::fmt;
use std::sync::Arc;
use super::value::Value;

/// Function from the value yielded by a bound action to the action to run next.
/// Shared so that a tree holding it can be cloned and re-run by `Forever`.
pub type Continuation = Arc<dyn Fn(Value) -> Action + Send + Sync>;

/// An action is a description of a deferred console effect and of the value it yields.
/// Building one never touches the console, only the engine runs it.
///
/// Trees can nest as deep as the caller folds them (`fold(unit(), then)`), so
/// cloning and dropping walk them with an explicit worklist instead of recursing.
pub enum Action {
    // putStrLn: text then a newline, yields unit
    Print(String),

    // putStr: text without a newline, yields unit
    Write(String),

    // getLine: yields the next input line
    ReadLine,

    Pure(Value),

    Bind(Box<Action>, Continuation),

    // sequence: yields the list of every yield, in order
    Sequence(Vec<Action>),

    // sequence_: same effects, yields unit
    SequenceDiscard(Vec<Action>),

    Forever(Box<Action>)
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Print(text) => f.debug_tuple("Print").field(text).finish(),
            Action::Write(text) => f.debug_tuple("Write").field(text).finish(),
            Action::ReadLine => write!(f, "ReadLine"),
            Action::Pure(value) => f.debug_tuple("Pure").field(value).finish(),
            Action::Bind(first, _) => f.debug_tuple("Bind").field(first).field(&"<continuation>").finish(),
            Action::Sequence(actions) => f.debug_tuple("Sequence").field(actions).finish(),
            Action::SequenceDiscard(actions) => f.debug_tuple("SequenceDiscard").field(actions).finish(),
            Action::Forever(body) => f.debug_tuple("Forever").field(body).finish()
        }
    }
}

enum CloneStep<'a> {
    Visit(&'a Action),
    Build(&'a Action)
}

impl Clone for Action {
    fn clone(&self) -> Self {
        let mut steps = vec![CloneStep::Visit(self)];
        let mut built: Vec<Action> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                CloneStep::Visit(action) => match action {
                    Action::Bind(first, _) | Action::Forever(first) => {
                        steps.push(CloneStep::Build(action));
                        steps.push(CloneStep::Visit(first));
                    },
                    Action::Sequence(actions) | Action::SequenceDiscard(actions) => {
                        steps.push(CloneStep::Build(action));
                        steps.extend(actions.iter().rev().map(CloneStep::Visit));
                    },
                    leaf => built.push(leaf.clone_leaf())
                },
                // children are on top of `built`, in order
                CloneStep::Build(action) => {
                    let node = match action {
                        Action::Bind(_, continuation) => Action::Bind(Box::new(pop_built(&mut built)), continuation.clone()),
                        Action::Forever(_) => Action::Forever(Box::new(pop_built(&mut built))),
                        Action::Sequence(actions) => Action::Sequence(built.split_off(built.len() - actions.len())),
                        Action::SequenceDiscard(actions) => Action::SequenceDiscard(built.split_off(built.len() - actions.len())),
                        leaf => leaf.clone_leaf()
                    };
                    built.push(node);
                }
            }
        }
        pop_built(&mut built)
    }
}

fn pop_built(built: &mut Vec<Action>) -> Action {
    built.pop().unwrap_or_else(unit)
}

impl Drop for Action {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut action) = pending.pop() {
            action.detach_children(&mut pending);
            // `action` goes out of scope childless, its own drop has nothing to walk
        }
    }
}

impl Action {
    /// Moves the action out, leaving a childless unit action in its place.
    pub fn take(&mut self) -> Action {
        std::mem::replace(self, Action::Pure(Value::Unit))
    }

    fn detach_children(&mut self, pending: &mut Vec<Action>) {
        match self {
            Action::Bind(first, _) | Action::Forever(first) => pending.push(first.take()),
            Action::Sequence(actions) | Action::SequenceDiscard(actions) => pending.append(actions),
            _ => {}
        }
    }

    fn clone_leaf(&self) -> Action {
        match self {
            Action::Print(text) => Action::Print(text.clone()),
            Action::Write(text) => Action::Write(text.clone()),
            Action::ReadLine => Action::ReadLine,
            Action::Pure(value) => Action::Pure(value.clone()),
            // only reached for leaves, composites go through `Clone::clone`
            composite => composite.clone()
        }
    }

    /// Short name of the variant, used when tracing evaluation.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Print(_) => "print",
            Action::Write(_) => "write",
            Action::ReadLine => "readline",
            Action::Pure(_) => "pure",
            Action::Bind(_, _) => "bind",
            Action::Sequence(_) => "sequence",
            Action::SequenceDiscard(_) => "sequence_",
            Action::Forever(_) => "forever"
        }
    }
}

pub fn print(text: impl Into<String>) -> Action {
    Action::Print(text.into())
}

pub fn write(text: impl Into<String>) -> Action {
    Action::Write(text.into())
}

pub fn read_line() -> Action {
    Action::ReadLine
}

pub fn pure(value: impl Into<Value>) -> Action {
    Action::Pure(value.into())
}

pub fn unit() -> Action {
    Action::Pure(Value::Unit)
}

/// **@summary** - Chains two actions, the second one being built from the first one's yield
///
/// **@param** first: Action - The action run first
///
/// **@param** continuation: Fn(Value) -> Action - Builds the next action once `first` has yielded
///
/// **@returns** - The bound action, yielding what the continuation's action yields
pub fn bind<F>(first: Action, continuation: F) -> Action
where
    F: Fn(Value) -> Action + Send + Sync + 'static
{
    Action::Bind(Box::new(first), Arc::new(continuation))
}

/// `first >> next`: runs `first`, drops its yield, then runs `next`.
pub fn then(first: Action, next: Action) -> Action {
    bind(first, move |_| next.clone())
}

/// Replaces the yield of `action` with unit.
pub fn discard(action: Action) -> Action {
    bind(action, |_| unit())
}

/// Applies a pure function to the yield of `action`.
pub fn map<F>(action: Action, f: F) -> Action
where
    F: Fn(Value) -> Value + Send + Sync + 'static
{
    bind(action, move |value| Action::Pure(f(value)))
}

pub fn sequence(actions: Vec<Action>) -> Action {
    Action::Sequence(actions)
}

pub fn sequence_(actions: Vec<Action>) -> Action {
    Action::SequenceDiscard(actions)
}

/// mapM: one action per item, run in order, yields the list of yields
pub fn map_m<T, F>(f: F, items: impl IntoIterator<Item = T>) -> Action
where
    F: FnMut(T) -> Action
{
    Action::Sequence(items.into_iter().map(f).collect())
}

/// mapM_: like [map_m] but yields unit
pub fn map_m_<T, F>(f: F, items: impl IntoIterator<Item = T>) -> Action
where
    F: FnMut(T) -> Action
{
    Action::SequenceDiscard(items.into_iter().map(f).collect())
}

/// forM: [map_m] with the items first
pub fn for_m<T, F>(items: impl IntoIterator<Item = T>, f: F) -> Action
where
    F: FnMut(T) -> Action
{
    map_m(f, items)
}

pub fn forever(body: Action) -> Action {
    Action::Forever(Box::new(body))
}

/// Picks `action` when `condition` holds, a do-nothing unit action otherwise.
pub fn when(condition: bool, action: Action) -> Action {
    if condition { action } else { unit() }
}

pub fn unless(condition: bool, action: Action) -> Action {
    when(!condition, action)
}

/// print: writes the shown form of a value on its own line
pub fn print_value(value: &Value) -> Action {
    Action::Print(value.show())
}

/// ===============
/// |    TESTS    |
/// ===============
