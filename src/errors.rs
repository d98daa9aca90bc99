//! Error taxonomy for the shell and the single user-visible error channel.
//!
//! Every failure is described by a [`ShellError`] variant so that it can be
//! logged with detail, but the user only ever sees
//! [`GENERIC_ERROR_MESSAGE`] on standard error.

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// The only error text the shell prints, whatever went wrong.
pub const GENERIC_ERROR_MESSAGE: &str = "An error has occurred\n";

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("usage: wish [batch_file]")]
    Usage,

    #[error("cannot open batch file {path}: {source}")]
    BatchFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("more than one redirection marker")]
    MultipleRedirects,

    #[error("redirect with no command")]
    RedirectWithoutCommand,

    #[error("redirection needs exactly one target, got {0}")]
    BadRedirectTarget(usize),

    #[error("cannot open redirection target {path}: {source}")]
    RedirectOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}: command not found")]
    NotFound(String),

    #[error("cannot duplicate output descriptor: {0}")]
    Redirect(#[source] io::Error),

    #[error("cannot spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}: wrong number of arguments ({got})")]
    BuiltinArgs { name: &'static str, got: usize },

    #[error("cd: cannot change directory to {path}: {source}")]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("exit: takes no arguments, got {0}")]
    ExitArgs(usize),
}

pub type Result<T> = std::result::Result<T, ShellError>;

/// Log `err` and write the generic message to `out`.
///
/// Write failures on the error channel itself are ignored; there is nowhere
/// left to report them.
pub fn report(out: &mut dyn Write, err: &ShellError) {
    tracing::debug!(error = %err, "command failed");
    let _ = out.write_all(GENERIC_ERROR_MESSAGE.as_bytes());
    let _ = out.flush();
}
