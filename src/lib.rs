//! `wish`, a tiny command-line interpreter.
//!
//! A line is split on `&` into commands that run concurrently. Each command
//! is a whitespace-separated word list with an optional `> file` redirection
//! that captures both standard output and standard error. `exit`, `cd` and
//! `path` are built in; anything else is looked up in the search path and
//! spawned. The interpreter waits for every child of a line before reading
//! the next one.
//!
//! The main entry point is [`Interpreter`]. Lines come from a
//! [`io_adapters::LineSource`]; every failure surfaces as the single message
//! in [`errors::GENERIC_ERROR_MESSAGE`].

mod builtin;
pub mod command;
pub mod env;
pub mod errors;
mod external;
mod interpreter;
pub mod io_adapters;
pub mod logging;
pub mod parser;

pub use external::{launch, resolve};
pub use interpreter::{Interpreter, LineOutcome};
