//! Turns raw command bytes into [`Command`] values.
//!
//! Parsing never mutates its input: the redirect target and the argument
//! tokens are independent owned values taken from an immutable view of the
//! slice. Input is handled as bytes, so tokens and paths reach `exec` and
//! `open` exactly as typed, UTF-8 or not.

use crate::command::{Command, OutputTarget};
use crate::errors::{Result, ShellError};
use regex::bytes::Regex;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Separates commands that run concurrently on one line.
pub const PARALLEL_DELIMITER: u8 = b'&';

/// Marks output redirection inside a single command.
pub const REDIRECT_MARKER: u8 = b'>';

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("space-run pattern is valid"));
static TAB_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\t{2,}").expect("tab-run pattern is valid"));

/// Split a line into command slices on [`PARALLEL_DELIMITER`].
///
/// Empty slices are kept; [`parse`] drops them later.
pub fn split_line(line: &[u8]) -> Vec<&[u8]> {
    line.split(|&b| b == PARALLEL_DELIMITER).collect()
}

/// Parse one command slice.
///
/// Returns `Ok(None)` for a blank slice, which the caller skips without
/// reporting anything. When a redirection is present its target is created
/// or truncated here, before the command is dispatched.
pub fn parse(raw: &[u8]) -> Result<Option<Command>> {
    let trimmed = raw.trim_ascii();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = collapse_blanks(trimmed);

    let (words, output_target) = match split_redirect(&normalized) {
        None => (normalized.as_slice(), OutputTarget::Inherit),
        Some((words, target)) => {
            if target.contains(&REDIRECT_MARKER) {
                return Err(ShellError::MultipleRedirects);
            }
            if words.trim_ascii().is_empty() {
                return Err(ShellError::RedirectWithoutCommand);
            }
            (words, open_redirect(target)?)
        }
    };

    let arguments = tokenize(words);
    if arguments.is_empty() {
        return Ok(None);
    }

    tracing::debug!(?arguments, redirected = matches!(output_target, OutputTarget::File(_)), "parsed command");
    Ok(Some(Command::new(raw.to_vec(), arguments, output_target)))
}

/// Collapse runs of spaces into one space and runs of tabs into one tab.
fn collapse_blanks(text: &[u8]) -> Vec<u8> {
    let spaces = SPACE_RUNS.replace_all(text, &b" "[..]);
    TAB_RUNS.replace_all(&spaces, &b"\t"[..]).into_owned()
}

/// Split at the first [`REDIRECT_MARKER`], dropping the marker itself.
fn split_redirect(text: &[u8]) -> Option<(&[u8], &[u8])> {
    let at = text.iter().position(|&b| b == REDIRECT_MARKER)?;
    Some((&text[..at], &text[at + 1..]))
}

fn tokenize(words: &[u8]) -> Vec<OsString> {
    words
        .split(|&b| b == b' ' || b == b'\t')
        .filter(|token| !token.is_empty())
        .map(|token| OsStr::from_bytes(token).to_os_string())
        .collect()
}

fn open_redirect(target: &[u8]) -> Result<OutputTarget> {
    let tokens: Vec<&[u8]> = target
        .split(u8::is_ascii_whitespace)
        .filter(|token| !token.is_empty())
        .collect();
    let path = match tokens.as_slice() {
        [single] => PathBuf::from(OsStr::from_bytes(single)),
        other => return Err(ShellError::BadRedirectTarget(other.len())),
    };
    let file = File::create(&path).map_err(|source| ShellError::RedirectOpen { path, source })?;
    Ok(OutputTarget::File(file))
}
