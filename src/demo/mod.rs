use crate::model::action::*;
use crate::model::value::Value;

/// Line that ends the echo program
pub const QUIT_WORD: &str = "quit";

/// A named program the CLI can run.
pub struct Demo {
    pub name: &'static str,
    pub description: &'static str,
    pub build: fn() -> Action
}

pub const DEMOS: &[Demo] = &[
    Demo { name: "hello", description: "print a greeting", build: hello },
    Demo { name: "greet", description: "ask for a name and greet it", build: greet },
    Demo { name: "reverse", description: "reverse every word of each line until an empty line", build: reverse },
    Demo { name: "sequence", description: "read three lines and print them as a list", build: read_three },
    Demo { name: "colors", description: "ask for a color per number, then list them", build: colors },
    Demo { name: "capslocker", description: "upper-case every line, forever", build: capslocker },
    Demo { name: "echo", description: "echo lines until 'quit'", build: echo },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

/// **@summary** - Reverses the characters of every word, keeping the words in place
///
/// **@param** line: &str - The line to transform
///
/// **@returns** - The reversed words joined by a single space
pub fn reverse_words(line: &str) -> String {
    line.split_whitespace()
        .map(|word| word.chars().rev().collect::<String>())
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn hello() -> Action {
    print("hello, world")
}

pub fn greet() -> Action {
    then(
        print("Hello, what's your name?"),
        bind(read_line(), |name| print(format!("Hey {}, you rock!", name)))
    )
}

/// Loops through bind: each non empty line schedules the next read
pub fn reverse() -> Action {
    bind(read_line(), |line| {
        let text = line.as_text().unwrap_or_default();
        if text.is_empty() {
            unit()
        } else {
            then(print(reverse_words(text)), reverse())
        }
    })
}

pub fn read_three() -> Action {
    bind(sequence(vec![read_line(); 3]), |lines| print_value(&lines))
}

pub fn colors() -> Action {
    let questions = for_m(1..=4, |n: u32| {
        then(print(format!("Which color do you associate with the number {}?", n)), read_line())
    });
    bind(questions, |answers| {
        let answers = match answers {
            Value::List(values) => values,
            other => vec![other]
        };
        then(
            print("The colors that you associate with 1, 2, 3 and 4 are: "),
            map_m_(|color: Value| print(color.to_string()), answers)
        )
    })
}

pub fn capslocker() -> Action {
    forever(bind(read_line(), |line| print(line.to_string().to_uppercase())))
}

pub fn echo() -> Action {
    bind(read_line(), |line| {
        let text = line.to_string();
        let quit = text == QUIT_WORD;
        unless(quit, then(print(text), echo()))
    })
}

/// ===============
/// |    TESTS    |
/// ===============

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;
    use super::*;
    use crate::console::MockConsoleTrait;
    use crate::console::scripted::ScriptedConsole;
    use crate::engine::ActionEngine;
    use crate::model::error::ActionError;

    fn run_with_input(action: Action, input: &[&str]) -> (Result<Value, ActionError>, ScriptedConsole) {
        let mut console = ScriptedConsole::new(input.iter().copied());
        let res = ActionEngine::new().run(action, &mut console);
        (res, console)
    }

    #[test]
    fn reverse_words_should_reverse_each_word_in_place() {
        assert_eq!(reverse_words("hey pal"), "yeh lap");
        assert_eq!(reverse_words("  spaced   out "), "decaps tuo");
        assert_eq!(reverse_words(""), "");
    }

    #[test]
    fn every_demo_should_be_found_by_name() {
        for demo in DEMOS {
            assert!(find(demo.name).is_some());
        }
        assert!(find("missing").is_none());
    }

    #[test]
    fn the_hello_demo_should_print_a_greeting() {
        let (res, console) = run_with_input(hello(), &[]);
        assert_eq!(res, Ok(Value::Unit));
        assert_eq!(console.output(), "hello, world\n");
    }

    #[test]
    fn the_greet_demo_should_greet_the_name_read() {
        let (res, console) = run_with_input(greet(), &["Ada"]);
        assert_eq!(res, Ok(Value::Unit));
        assert_eq!(console.written_lines(), vec!["Hello, what's your name?", "Hey Ada, you rock!"]);
    }

    #[test]
    fn the_reverse_demo_should_stop_on_an_empty_line_without_reading_further() {
        let mut console = MockConsoleTrait::new();
        let mut seq = Sequence::new();
        console.expect_read_line().times(1).in_sequence(&mut seq).returning(|| Ok(Some("Hello mate".into())));
        console.expect_write_line().with(eq("olleH etam")).times(1).in_sequence(&mut seq).returning(|_| Ok(()));
        console.expect_read_line().times(1).in_sequence(&mut seq).returning(|| Ok(Some(String::new())));
        let res = ActionEngine::new().run(reverse(), &mut console);
        assert_eq!(res, Ok(Value::Unit));
    }

    #[test]
    fn the_reverse_demo_should_leave_lines_after_the_empty_one_unread() {
        let (res, console) = run_with_input(reverse(), &["hey pal", "", "never read"]);
        assert_eq!(res, Ok(Value::Unit));
        assert_eq!(console.written_lines(), vec!["yeh lap"]);
        assert_eq!(console.remaining_input(), 1);
    }

    #[test]
    fn the_reverse_demo_should_fail_when_input_ends_before_an_empty_line() {
        let (res, console) = run_with_input(reverse(), &["one"]);
        assert_eq!(res, Err(ActionError::EndOfInput));
        assert_eq!(console.written_lines(), vec!["eno"]);
    }

    #[test]
    fn the_sequence_demo_should_print_the_lines_as_a_list() {
        let (res, console) = run_with_input(read_three(), &["a", "b", "c"]);
        assert_eq!(res, Ok(Value::Unit));
        assert_eq!(console.output(), "[\"a\",\"b\",\"c\"]\n");
    }

    #[test]
    fn the_colors_demo_should_ask_four_times_then_list_the_answers() {
        let mut console = ScriptedConsole::from_text("white\nblue\nred\norange\n");
        let res = ActionEngine::new().run(colors(), &mut console);
        assert_eq!(res, Ok(Value::Unit));
        assert_eq!(console.remaining_input(), 0);
        assert_eq!(console.written_lines(), vec![
            "Which color do you associate with the number 1?",
            "Which color do you associate with the number 2?",
            "Which color do you associate with the number 3?",
            "Which color do you associate with the number 4?",
            "The colors that you associate with 1, 2, 3 and 4 are: ",
            "white",
            "blue",
            "red",
            "orange",
        ]);
    }

    #[test]
    fn the_capslocker_demo_should_shout_until_the_end_of_input() {
        let (res, console) = run_with_input(capslocker(), &["hey there", "yo"]);
        assert_eq!(res, Err(ActionError::EndOfInput));
        assert_eq!(console.written_lines(), vec!["HEY THERE", "YO"]);
    }

    #[test]
    fn the_echo_demo_should_stop_on_the_quit_word() {
        let (res, console) = run_with_input(echo(), &["one", "two", QUIT_WORD, "three"]);
        assert_eq!(res, Ok(Value::Unit));
        assert_eq!(console.written_lines(), vec!["one", "two"]);
        assert_eq!(console.remaining_input(), 1);
    }
}
