use std::sync::LazyLock;
use nom::{
    IResult, Parser, Err,
    error::{Error, ErrorKind},
    sequence::{delimited, preceded}, bytes::complete::tag,
    character::complete::multispace0,
    multi::{many0, separated_list1},
    combinator::all_consuming
};
use regex::Regex;
use crate::model::error::ScriptError;

/// Deepest parenthesis nesting a script may use, `forever(` included
pub const MAX_NESTING: usize = 64;

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"(?:[^"\\]|\\["\\n])*""#).expect("string literal pattern")
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z_]*").expect("identifier pattern")
});

/// Script AST, one node per action it stands for
#[derive(Debug, PartialEq, Clone)]
pub enum ScriptExpr<'s> {
    Print(String),
    Write(String),
    Pure(String),
    ReadLine,

    Forever(Box<ScriptExpr<'s>>),

    // action >>= name >>= name ..., the names are resolved when compiling
    Bind(Box<ScriptExpr<'s>>, Vec<&'s str>),

    // `;` separated actions, their yields are dropped
    Sequence(Vec<ScriptExpr<'s>>)
}

fn ws<'s, O, P>(parser: P) -> impl Parser<&'s str, Output = O, Error = Error<&'s str>>
where
    P: Parser<&'s str, Output = O, Error = Error<&'s str>>
{
    delimited(multispace0, parser, multispace0)
}

fn keyword<'s>(word: &'static str) -> impl Parser<&'s str, Output = &'s str, Error = Error<&'s str>> {
    ws(tag(word))
}

fn unescape(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some(escaped) => text.push(escaped),
            None => {}
        }
    }
    text
}

/// Parses a double quoted string. Only `\"`, `\\` and `\n` escapes are accepted.
///
/// ### Returns
///
/// * `IResult<&str, String>` - The remaining input and the unescaped text between the quotes
fn string_literal(input: &str) -> IResult<&str, String> {
    STRING_LITERAL.find(input).map(|m| {
        let quoted = m.as_str();
        (&input[m.end()..], unescape(&quoted[1..quoted.len() - 1]))
    }).ok_or(Err::Error(Error::new(input, ErrorKind::RegexpFind)))
}

/// Parses the name of a continuation: lowercase letters and underscores.
fn identifier(input: &str) -> IResult<&str, &str> {
    IDENTIFIER.find(input).map(
        |m| (&input[m.end()..], m.as_str())
    ).ok_or(Err::Error(Error::new(input, ErrorKind::RegexpFind)))
}

/// `name ( body )`, spaces allowed between every token
fn call<'s, O, P>(name: &'static str, body: P) -> impl Parser<&'s str, Output = O, Error = Error<&'s str>>
where
    P: Parser<&'s str, Output = O, Error = Error<&'s str>>
{
    delimited((keyword(name), keyword("(")), body, keyword(")"))
}

fn primitive(input: &str) -> IResult<&str, ScriptExpr<'_>> {

    call("print", ws(string_literal)).parse(input).map(
        |(next_input, text)| (next_input, ScriptExpr::Print(text))

    ).or_else(|_| call("write", ws(string_literal)).parse(input).map(
        |(next_input, text)| (next_input, ScriptExpr::Write(text)))

    ).or_else(|_| call("pure", ws(string_literal)).parse(input).map(
        |(next_input, text)| (next_input, ScriptExpr::Pure(text)))

    ).or_else(|_| keyword("readline").parse(input).map(
        |(next_input, _)| (next_input, ScriptExpr::ReadLine))

    ).or_else(|_| call("forever", sequence_expr).parse(input).map(
        |(next_input, body)| (next_input, ScriptExpr::Forever(Box::new(body))))
    )
}

fn simple_expr(input: &str) -> IResult<&str, ScriptExpr<'_>> {
    primitive(input).or_else(|_| parenthesized_expr(input))
}

fn parenthesized_expr(input: &str) -> IResult<&str, ScriptExpr<'_>> {
    delimited(keyword("("), sequence_expr, keyword(")")).parse(input)
}

/// `a >>= f >>= g` keeps the names in order, `(a >>= f) >>= g` once compiled
fn bind_expr(input: &str) -> IResult<&str, ScriptExpr<'_>> {
    (simple_expr, many0(preceded(keyword(">>="), ws(identifier)))).parse(input).map(
        |(next_input, (first, names))| {
            if names.is_empty() {
                (next_input, first)
            } else {
                (next_input, ScriptExpr::Bind(Box::new(first), names))
            }
        }
    )
}

fn sequence_expr(input: &str) -> IResult<&str, ScriptExpr<'_>> {
    separated_list1(keyword(";"), bind_expr).parse(input).map(
        |(next_input, mut exprs)| match exprs.len() {
            1 => (next_input, exprs.remove(0)),
            _ => (next_input, ScriptExpr::Sequence(exprs))
        }
    )
}

/// **@summary** - Finds where the parentheses of a script nest deeper than `MAX_NESTING`
///
/// **@param** input: &str - The script text
///
/// **@returns** - The byte offset of the first parenthesis past the limit, if any. Parentheses inside string literals don't count
fn nesting_overflow(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Some(i);
                }
            },
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// **@summary** - Parses a whole action script
///
/// **@param** input: &str - The script text, it must be consumed entirely
///
/// **@returns** - The script AST, or a syntax error holding the input left where parsing stopped
/// (or from the first parenthesis nested deeper than `MAX_NESTING`)
pub fn parse_script(input: &str) -> Result<ScriptExpr<'_>, ScriptError> {
    // the grammar recurses once per parenthesis, so the depth is bounded before parsing
    if let Some(offset) = nesting_overflow(input) {
        return Err(ScriptError::Syntax { remaining: input[offset..].to_string() });
    }
    match all_consuming(ws(sequence_expr)).parse(input) {
        Ok((_, expr)) => Ok(expr),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(ScriptError::Syntax { remaining: e.input.to_string() }),
        Err(Err::Incomplete(_)) => Err(ScriptError::Syntax { remaining: String::new() })
    }
}

/// ===============
/// |    TESTS    |
/// ===============
