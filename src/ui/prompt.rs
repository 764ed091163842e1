//! Interactive prompts
//!
//! Generic over the reader and writer so the same code drives the terminal
//! and in-memory buffers.

use super::menu::format_menu;
use crate::classify::DownloadCandidate;
use crate::state::ResultList;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// What the operator chose from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the result list
    Download(usize),
    /// Re-render the same list
    Refresh,
    /// Abandon these results and start over from a new seed
    NewTarget,
    Quit,
}

impl Selection {
    /// Returns the selected candidate for a `Download` selection
    pub fn candidate<'a>(&self, results: &'a ResultList) -> Option<&'a DownloadCandidate> {
        match self {
            Self::Download(index) => results.get(*index),
            _ => None,
        }
    }
}

/// Menu input that does not name a choice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Invalid number. Enter a number between 1 and {count}")]
    OutOfRange { count: usize },

    #[error("Unrecognized input. Enter a number, 'r', 'n' or 'q'.")]
    Unrecognized,
}

/// Parses one line of menu input against a list of `count` items
///
/// Numbers are 1-based; letters are case-insensitive.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection, SelectionError> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "q" => return Ok(Selection::Quit),
        "r" => return Ok(Selection::Refresh),
        "n" => return Ok(Selection::NewTarget),
        _ => {}
    }

    let number: i64 = input.parse().map_err(|_| SelectionError::Unrecognized)?;
    if number < 1 || number as u64 > count as u64 {
        return Err(SelectionError::OutOfRange { count });
    }
    Ok(Selection::Download(number as usize - 1))
}

/// Shows the menu and reads until the operator makes a valid choice
///
/// End of input counts as `Quit`.
pub fn prompt_selection<R, W>(
    input: &mut R,
    output: &mut W,
    results: &ResultList,
) -> io::Result<Selection>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{}", format_menu(results))?;
        write!(
            output,
            "Enter file No. to download, 'r' to refresh list, 'n' for a new target, 'q' to quit: "
        )?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(Selection::Quit);
        };

        match parse_selection(&line, results.len()) {
            Ok(selection) => return Ok(selection),
            Err(e) => writeln!(output, "[-] {}", e)?,
        }
    }
}

/// Asks for a seed URL, returning the trimmed answer (empty on end of input)
pub fn prompt_seed<R, W>(input: &mut R, output: &mut W, question: &str) -> io::Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", question)?;
    output.flush()?;
    Ok(read_line(input)?.unwrap_or_default().trim().to_string())
}

/// Asks for the crawl depth until a positive number (or nothing) is entered
///
/// A blank answer or end of input keeps `default`.
pub fn prompt_depth<R, W>(input: &mut R, output: &mut W, default: u32) -> io::Result<u32>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "Enter crawler max depth (default {}): ", default)?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(default);
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(default);
        }

        match line.parse::<i64>() {
            Ok(depth) if depth >= 1 => match u32::try_from(depth) {
                Ok(depth) => return Ok(depth),
                Err(_) => writeln!(output, "[-] Depth is too large.")?,
            },
            Ok(_) => writeln!(output, "[-] Depth must be positive.")?,
            Err(_) => writeln!(output, "[-] Invalid input. Enter a number.")?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
