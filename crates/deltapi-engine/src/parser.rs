//! Action parser
//!
//! Action files are newline-delimited. Blank lines and lines starting with `#`
//! are skipped; every other line has the form
//!
//! ```text
//! VERB,URL[,BODY...]
//! ```
//!
//! The verb is matched case-insensitively. An unknown verb is logged and the
//! action falls back to GET, so one bad token never drops a line. Everything
//! after the URL is rejoined with `,` so bodies may contain commas.

use crate::error::{EngineError, EngineResult};
use deltapi_core::{Action, Verb};
use futures::Stream;
use std::io::BufRead;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::error;

/// Result type for parsing a single line
pub type ParseResult<T> = Result<T, ParseError>;

/// A line that cannot yield an action
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing URL in action line '{line}'")]
    MissingUrl { line: String },
}

/// Whether a raw line carries an action
///
/// Blank lines and lines whose first character is `#` are skipped. An
/// indented `#` is not a comment.
pub fn is_action_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

/// Parse one action line
pub fn parse(line: &str) -> ParseResult<Action> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut items = line.split(',');

    let token = items.next().unwrap_or_default();
    let verb = match token.parse::<Verb>() {
        Ok(verb) => verb,
        Err(_) => {
            error!(verb = token, line, "Unknown verb, falling back to GET");
            Verb::default()
        }
    };

    let url = items
        .next()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ParseError::MissingUrl {
            line: line.to_string(),
        })?;

    let rest: Vec<&str> = items.collect();
    let action = Action::new(verb, url);
    if rest.is_empty() {
        Ok(action)
    } else {
        Ok(action.with_data(rest.join(",")))
    }
}

/// Lazily parse actions from lines, skipping blanks and comments
///
/// The returned iterator can be cloned to restart from the same position.
/// A malformed line yields an error item without stopping the sequence.
pub fn parse_actions<'a, I>(lines: I) -> impl Iterator<Item = ParseResult<Action>> + Clone + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone + 'a,
{
    lines
        .into_iter()
        .filter(|line| is_action_line(line))
        .map(parse)
}

/// Lazily parse actions from a buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> impl Iterator<Item = EngineResult<Action>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if !is_action_line(&line) => None,
        Ok(line) => Some(parse(&line).map_err(EngineError::from)),
        Err(e) => Some(Err(EngineError::ReadLine(e))),
    })
}

/// Parse actions from an async reader as a stream
///
/// The stream ends after the first read error.
pub fn parse_stream<R>(reader: R) -> impl Stream<Item = EngineResult<Action>>
where
    R: AsyncBufRead + Unpin,
{
    futures::stream::unfold(Some(reader.lines()), next_action)
}

async fn next_action<R>(
    lines: Option<Lines<R>>,
) -> Option<(EngineResult<Action>, Option<Lines<R>>)>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = lines?;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if !is_action_line(&line) => continue,
            Ok(Some(line)) => {
                return Some((parse(&line).map_err(EngineError::from), Some(lines)));
            }
            Ok(None) => return None,
            Err(e) => return Some((Err(EngineError::ReadLine(e)), None)),
        }
    }
}
