use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use wish::errors::{GENERIC_ERROR_MESSAGE, ShellError};
use wish::io_adapters::{BatchReader, LineSource, PromptedReader};
use wish::{Interpreter, logging};

/// `wish [batch_file]`. The single argument is always a path, whatever it
/// looks like: `wish --help` runs the file named `--help`.
fn batch_file(mut args: Vec<OsString>) -> Result<Option<PathBuf>, ShellError> {
    match args.len() {
        0 | 1 => Ok(args.pop().map(PathBuf::from)),
        count => {
            tracing::debug!(count, "too many arguments");
            Err(ShellError::Usage)
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("startup failed: {err:#}");
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(GENERIC_ERROR_MESSAGE.as_bytes());
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    logging::init_logging().context("installing log subscriber")?;

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    let mut source: Box<dyn LineSource> = match batch_file(args)? {
        Some(path) => {
            let file = File::open(&path).map_err(|source| ShellError::BatchFile { path, source })?;
            Box::new(BatchReader::buffered(file))
        }
        None => Box::new(PromptedReader::stdio()),
    };

    Interpreter::default().run(source.as_mut());
    Ok(())
}
