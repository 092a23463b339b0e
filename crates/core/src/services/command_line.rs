//! Splitting a command line into program and arguments.
//!
//! Handles the POSIX shell quoting a user types at a prompt: single quotes
//! are literal, double quotes allow `\"` and `\\`, and a backslash outside
//! quotes escapes the next character. No expansion of any kind happens.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandLineError {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    #[error("trailing backslash")]
    TrailingEscape,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Split `line` into words.
///
/// # Example
///
/// ```
/// use ep_core::services::command_line::split_command;
///
/// let words = split_command(r#"echo "Hello Extendipede!" 'a b'"#).unwrap();
/// assert_eq!(words, vec!["echo", "Hello Extendipede!", "a b"]);
/// ```
pub fn split_command(line: &str) -> Result<Vec<String>, CommandLineError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // Distinguishes `''` (an empty word) from no word at all
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    current.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\' | '$' | '`')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => return Err(CommandLineError::UnterminatedQuote('"')),
                },
                _ => current.push(c),
            },
            Quote::None => match c {
                '\'' => {
                    quote = Quote::Single;
                    in_word = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_word = true;
                }
                '\\' => {
                    let next = chars.next().ok_or(CommandLineError::TrailingEscape)?;
                    current.push(next);
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    match quote {
        Quote::Single => Err(CommandLineError::UnterminatedQuote('\'')),
        Quote::Double => Err(CommandLineError::UnterminatedQuote('"')),
        Quote::None => {
            if in_word {
                words.push(current);
            }
            Ok(words)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(split_command("ls -la  /tmp").unwrap(), vec!["ls", "-la", "/tmp"]);
        assert!(split_command("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            split_command(r#"grep "a \"quoted\" word" 'it''s'"#).unwrap(),
            vec!["grep", r#"a "quoted" word"#, "its"]
        );
        assert_eq!(split_command("echo '' x").unwrap(), vec!["echo", "", "x"]);
        assert_eq!(split_command(r"echo a\ b").unwrap(), vec!["echo", "a b"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            split_command("echo 'open").unwrap_err(),
            CommandLineError::UnterminatedQuote('\'')
        );
        assert_eq!(
            split_command("echo \"open").unwrap_err(),
            CommandLineError::UnterminatedQuote('"')
        );
        assert_eq!(
            split_command("echo \\").unwrap_err(),
            CommandLineError::TrailingEscape
        );
    }
}
