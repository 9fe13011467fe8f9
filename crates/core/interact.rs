use std::io::{BufRead, Write};

use dialoguer::Input;
use eyre::{eyre, Context, Result};

/// Source of one line of user input per prompt.
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on the terminal using dialoguer.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .wrap_err_with(|| eyre!("User input cancelled"))
    }
}

/// Reads plain lines, used when standard input is not a terminal.
///
/// Prompts are echoed to `echo` so piped sessions still read like the terminal one.
pub struct LinePrompt<R, W> {
    reader: R,
    echo: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub const fn new(reader: R, echo: W) -> Self {
        Self { reader, echo }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.echo, "{prompt}: ")?;
        self.echo.flush()?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .wrap_err("Cannot read from the input stream")?;

        if read == 0 {
            return Err(eyre!("Input stream closed"));
        }

        Ok(line.trim_end_matches(|c| c == '\n' || c == '\r').to_owned())
    }
}
