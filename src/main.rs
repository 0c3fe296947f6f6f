use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use clap::{Parser as ClapParser, Subcommand};
use log::{debug, error, info, warn};
use tokio::task::JoinError;
use ioaction::console::ConsoleTrait;
use ioaction::console::stdio::StdConsole;
use ioaction::demo::{self, DEMOS};
use ioaction::engine::ActionEngine;
use ioaction::model::action::Action;
use ioaction::model::error::ActionError;
use ioaction::model::value::Value;
use ioaction::script;

/// How long a Ctrl-C waits for the running program to reach a loop boundary
const CANCEL_GRACE_PERIOD: Duration = Duration::from_millis(500);

const EXIT_OK: u8 = 0;
const EXIT_FAILED: u8 = 1;
const EXIT_UNKNOWN_DEMO: u8 = 2;
const EXIT_INTERRUPTED: i32 = 130;

#[derive(ClapParser)]
#[command(name = "ioaction")]
#[command(about = "Run console actions built as values")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one of the built-in programs
    Demo {
        /// Name of the program, see `list`
        name: String,
        /// Read console input from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// List the built-in programs
    List,
    /// Run an inline action script
    Eval {
        /// The script, e.g. 'print("name?"); readline >>= echo'
        script: String,
        /// Read console input from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Run an action script file
    Run {
        /// Path to the script
        file: PathBuf,
        /// Read console input from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

/// What is left to do once a command's arguments are checked
enum Prepared {
    Run(Action, Option<PathBuf>),
    Done(u8)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match prepare(cli.command) {
        Prepared::Run(action, input) => {
            debug!("running a {} action", action.kind());
            ExitCode::from(run_action(action, input).await)
        }
        Prepared::Done(status) => ExitCode::from(status)
    }
}

/// **@summary** - Resolves a command into the action it runs
///
/// **@param** command: Commands - The parsed subcommand
///
/// **@returns** - The action and its input file, or the exit status when there is nothing to run
fn prepare(command: Commands) -> Prepared {
    match command {
        Commands::List => {
            for demo in DEMOS {
                println!("{:<12}{}", demo.name, demo.description);
            }
            Prepared::Done(EXIT_OK)
        }
        Commands::Demo { name, input } => match demo::find(&name) {
            Some(demo) => Prepared::Run((demo.build)(), input),
            None => {
                eprintln!("Unknown demo '{}', run 'list' to see the available ones", name);
                Prepared::Done(EXIT_UNKNOWN_DEMO)
            }
        },
        Commands::Eval { script, input } => match script::load(&script) {
            Ok(action) => Prepared::Run(action, input),
            Err(e) => {
                eprintln!("{}", e);
                Prepared::Done(EXIT_FAILED)
            }
        },
        Commands::Run { file, input } => {
            let source = match fs::read_to_string(&file) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("Error reading file: {}", e);
                    return Prepared::Done(EXIT_FAILED);
                }
            };
            match script::load(&source) {
                Ok(action) => Prepared::Run(action, input),
                Err(e) => {
                    eprintln!("{}: {}", file.display(), e);
                    Prepared::Done(EXIT_FAILED)
                }
            }
        }
    }
}

/// Console over stdin, or over a file of input lines. Output always goes to stdout.
fn open_console(input: Option<PathBuf>) -> Result<Box<dyn ConsoleTrait>, ActionError> {
    match input {
        Some(path) => {
            let file = File::open(&path)?;
            info!("reading input from {}", path.display());
            Ok(Box::new(StdConsole::new(BufReader::new(file), io::stdout())))
        }
        None => Ok(Box::new(StdConsole::stdio())),
    }
}

/// **@summary** - Runs the action on a blocking thread while listening for Ctrl-C
///
/// **@param** action: Action - The program to run
///
/// **@param** input: Option<PathBuf> - Optional input file replacing stdin
///
/// **@returns** - The process exit status
async fn run_action(action: Action, input: Option<PathBuf>) -> u8 {
    let engine = ActionEngine::new();
    let token = engine.cancel_token();

    // The console is opened on the blocking thread, stdin's lock can't move across threads
    let mut handle = tokio::task::spawn_blocking(move || -> Result<Value, ActionError> {
        let mut console = open_console(input)?;
        engine.run(action, console.as_mut())
    });

    let outcome = tokio::select! {
        joined = &mut handle => joined,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    info!("interrupt received, cancelling");
                    token.cancel();
                    match tokio::time::timeout(CANCEL_GRACE_PERIOD, &mut handle).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            // Blocked on a read: the thread can't be joined, leave right away
                            warn!("program still blocked after {:?}, exiting", CANCEL_GRACE_PERIOD);
                            std::process::exit(EXIT_INTERRUPTED);
                        }
                    }
                }
                Err(e) => {
                    warn!("unable to listen for Ctrl-C: {}", e);
                    handle.await
                }
            }
        }
    };
    report(outcome)
}

/// Maps how the engine thread ended to an exit status. A non-unit yield is printed shown.
fn report(outcome: Result<Result<Value, ActionError>, JoinError>) -> u8 {
    match outcome {
        Ok(Ok(value)) => {
            if let Some(line) = final_line(&value) {
                println!("{}", line);
            }
            EXIT_OK
        }
        Ok(Err(ActionError::Cancelled)) => {
            info!("program cancelled");
            EXIT_OK
        }
        Ok(Err(e)) => {
            eprintln!("{}", e);
            EXIT_FAILED
        }
        Err(e) => {
            error!("engine thread failed: {}", e);
            EXIT_FAILED
        }
    }
}

fn final_line(value: &Value) -> Option<String> {
    (!value.is_unit()).then(|| value.show())
}

/// ===============
/// |    TESTS    |
/// ===============

#[cfg(test)]
mod tests {
    use super::*;
    use ioaction::model::action::{pure, read_line};

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ioaction-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn the_report_should_succeed_on_a_yield_or_a_cancellation() {
        assert_eq!(report(Ok(Ok(Value::Unit))), EXIT_OK);
        assert_eq!(report(Ok(Ok(Value::from("kept")))), EXIT_OK);
        assert_eq!(report(Ok(Err(ActionError::Cancelled))), EXIT_OK);
    }

    #[test]
    fn the_report_should_fail_on_an_action_error() {
        assert_eq!(report(Ok(Err(ActionError::EndOfInput))), EXIT_FAILED);
        assert_eq!(report(Ok(Err(ActionError::Console("broken pipe".to_string())))), EXIT_FAILED);
    }

    #[tokio::test]
    async fn the_report_should_fail_when_the_engine_thread_panics() {
        let joined = tokio::task::spawn_blocking(|| -> Result<Value, ActionError> {
            panic!("engine thread died")
        }).await;
        assert!(joined.is_err());
        assert_eq!(report(joined), EXIT_FAILED);
    }

    #[test]
    fn only_a_non_unit_yield_should_be_printed() {
        assert_eq!(final_line(&Value::Unit), None);
        assert_eq!(final_line(&Value::from("a\"b")), Some("\"a\\\"b\"".to_string()));
        assert_eq!(final_line(&Value::List(vec![])), Some(Value::List(vec![]).show()));
    }

    #[test]
    fn an_unknown_demo_should_exit_with_its_own_status() {
        let prepared = prepare(Commands::Demo { name: "nope".to_string(), input: None });
        assert!(matches!(prepared, Prepared::Done(EXIT_UNKNOWN_DEMO)));
    }

    #[test]
    fn a_known_demo_and_a_valid_script_should_be_run() {
        let prepared = prepare(Commands::Demo { name: "hello".to_string(), input: None });
        assert!(matches!(prepared, Prepared::Run(_, None)));

        let input = PathBuf::from("lines.txt");
        let prepared = prepare(Commands::Eval { script: "readline >>= echo".to_string(), input: Some(input.clone()) });
        assert!(matches!(prepared, Prepared::Run(_, Some(path)) if path == input));
    }

    #[test]
    fn the_list_command_should_finish_right_away() {
        assert!(matches!(prepare(Commands::List), Prepared::Done(EXIT_OK)));
    }

    #[test]
    fn a_bad_script_should_fail_before_running() {
        let prepared = prepare(Commands::Eval { script: "print(hi)".to_string(), input: None });
        assert!(matches!(prepared, Prepared::Done(EXIT_FAILED)));

        let prepared = prepare(Commands::Run { file: PathBuf::from("/no/such/script.io"), input: None });
        assert!(matches!(prepared, Prepared::Done(EXIT_FAILED)));
    }

    #[test]
    fn a_script_file_should_be_loaded() {
        let file = temp_file("script.io", "print(\"from a file\")\n");
        let prepared = prepare(Commands::Run { file: file.clone(), input: None });
        fs::remove_file(&file).unwrap();
        assert!(matches!(prepared, Prepared::Run(_, None)));
    }

    #[tokio::test]
    async fn running_an_action_should_map_its_outcome_to_a_status() {
        let input = temp_file("input.txt", "");
        assert_eq!(run_action(pure("done"), Some(input.clone())).await, EXIT_OK);
        assert_eq!(run_action(read_line(), Some(input.clone())).await, EXIT_FAILED);
        fs::remove_file(&input).unwrap();

        assert_eq!(run_action(pure("never"), Some(PathBuf::from("/no/such/input.txt"))).await, EXIT_FAILED);
    }
}
