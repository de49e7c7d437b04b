//! Interactive prompts for the input mode and the query.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use super::InputMode;

/// Print `prompt` and read one line, without its line ending
fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read from stdin")?;
    if read == 0 {
        anyhow::bail!("No input received (end of stdin)");
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn read_mode<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<InputMode> {
    let answer = prompt_line(input, out, "Enter input type (text/voice): ")?;
    Ok(InputMode::from_answer(&answer))
}

pub fn read_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    prompt_line(input, out, "Enter your search query: ")
}

/// Ask for the mode (unless given) and then the query.
///
/// Voice mode only announces itself; the query is typed either way.
pub fn acquire_query<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    mode: Option<InputMode>,
) -> Result<String> {
    let mode = match mode {
        Some(mode) => mode,
        None => read_mode(input, out)?,
    };
    tracing::debug!("Input mode: {}", mode);

    if mode == InputMode::Voice {
        writeln!(out, "Simulating voice input...")?;
    }

    read_query(input, out)
}
