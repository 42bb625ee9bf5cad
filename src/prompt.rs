//! Line-oriented interactive prompts.

use std::io::{self, BufRead, IsTerminal, Write};

/// Trait for asking the user a question and reading one line back.
pub trait Prompter {
    /// Shows `message` and returns the reply without its line ending.
    ///
    /// End of input or a read error yields the empty string.
    fn prompt(&self, message: &str) -> String;
}

/// [`Prompter`] reading from stdin.
///
/// The question is only printed when stdout is a terminal, so piped usage
/// (`echo y | zet edit last`) stays clean.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn prompt(&self, message: &str) -> String {
        let mut stdout = io::stdout();
        if stdout.is_terminal() {
            let _ = write!(stdout, "{message}");
            let _ = stdout.flush();
        }
        read_reply(io::stdin().lock())
    }
}

fn read_reply(mut reader: impl BufRead) -> String {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(_) => line.trim_end_matches(['\r', '\n']).to_string(),
        Err(_) => String::new(),
    }
}

/// Returns true for an affirmative answer: exactly `y`, in either case.
///
/// Surrounding whitespace is not ignored, so `" y"` declines.
pub fn is_affirmative(reply: &str) -> bool {
    reply.eq_ignore_ascii_case("y")
}
