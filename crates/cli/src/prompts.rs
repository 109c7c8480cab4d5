//! Interactive prompt parsing
//!
//! Input validation lives here, at the boundary: bad selections re-prompt
//! and never reach the pipeline. Parsers are pure so they can be tested
//! without a terminal.

use bioscout_common::models::paper::MAX_SEED_PAPERS;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No papers selected")]
    Empty,

    #[error("Too many papers selected ({0})")]
    TooMany(usize),

    #[error("'{0}' is not a paper number")]
    NotANumber(String),

    #[error("Paper number {0} is out of range (1-{1})")]
    OutOfRange(usize, usize),
}

/// Ask a question and return the trimmed reply.
pub fn ask(question: &str) -> io::Result<String> {
    print!("{} ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Parse a comma-separated selection of 1-based paper numbers into 0-based
/// indices. Between 1 and 3 selections over `available` listed papers.
pub fn parse_selection(input: &str, available: usize) -> Result<Vec<usize>, SelectionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SelectionError::Empty);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if parts.len() > MAX_SEED_PAPERS {
        return Err(SelectionError::TooMany(parts.len()));
    }

    let mut indices = Vec::with_capacity(parts.len());
    for part in parts {
        let number: usize = part
            .parse()
            .map_err(|_| SelectionError::NotANumber(part.to_string()))?;
        if number == 0 || number > available {
            return Err(SelectionError::OutOfRange(number, available));
        }
        indices.push(number - 1);
    }
    Ok(indices)
}

/// Parse a similarity fraction; valid values sit in (0, 1].
pub fn parse_fraction(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    (value > 0.0 && value <= 1.0).then_some(value)
}

/// Parse a positive reading-list size.
pub fn parse_list_size(input: &str) -> Option<usize> {
    let value: usize = input.trim().parse().ok()?;
    (value > 0).then_some(value)
}
