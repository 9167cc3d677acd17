use crate::utils::error::{MiscError, Result};
use std::fmt::Display;
use std::str::FromStr;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

pub fn quote(value: &str, quote_char: &str) -> String {
    format!("{quote_char}{value}{quote_char}")
}

fn terminate(value: &str, terminator: char) -> String {
    let mut output = value.trim_end_matches(TERMINATORS).to_string();
    output.push(terminator);
    output
}

/// `"Hello world?"` becomes `"Hello world."`.
pub fn sentence(value: &str) -> String {
    terminate(value, '.')
}

pub fn exclamation(value: &str) -> String {
    terminate(value, '!')
}

pub fn question(value: &str) -> String {
    terminate(value, '?')
}

/// Splits on commas with shell-style quoting.
///
/// Single quotes keep everything literally, double quotes allow `\"` and `\\`,
/// a backslash outside quotes escapes the next character. Empty fields are
/// dropped unless they were written as a quoted empty string.
fn split_commas(value: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ',' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(lex_error("No closing quotation")),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(lex_error("No closing quotation")),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err(lex_error("No closing quotation")),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(lex_error("No escaped character")),
                }
            }
            other => {
                in_token = true;
                current.push(other);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn lex_error(message: &str) -> MiscError {
    MiscError::LexError {
        message: message.to_string(),
    }
}

/// Builds a parser for comma separated values such as `a,"b,c",d`.
///
/// Each field is trimmed, parsed as `T` and collected into `C`, so the same
/// splitter can produce a `Vec<i32>`, a `BTreeSet<String>` and so on.
pub fn make_lex_separator<C, T>() -> impl Fn(&str) -> Result<C>
where
    C: FromIterator<T>,
    T: FromStr,
    T::Err: Display,
{
    |value: &str| -> Result<C> {
        split_commas(value)?
            .iter()
            .map(|token| {
                let token = token.trim();
                token.parse::<T>().map_err(|err| MiscError::ParseError {
                    value: token.to_string(),
                    message: err.to_string(),
                })
            })
            .collect()
    }
}

pub fn comma_separator(value: &str) -> Result<Vec<String>> {
    make_lex_separator::<Vec<String>, String>()(value)
}
