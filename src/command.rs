use crate::env::Environment;
use crate::errors::Result;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::process::Child;

/// Where a command's standard output and standard error go.
#[derive(Debug, Default)]
pub enum OutputTarget {
    /// The shell's own standard streams.
    #[default]
    Inherit,
    /// A file opened (and truncated) by the parser. Owned by exactly one command.
    File(File),
}

/// What happened to a command once it was dispatched.
///
/// The barrier at the end of a line waits only on [`ExecutionHandle::Spawned`].
#[derive(Debug, Default)]
pub enum ExecutionHandle {
    /// Not dispatched, or dispatch failed before a process existed.
    #[default]
    NotStarted,
    /// Executed as a built-in on the shell's own thread.
    RanInline,
    /// Running as a child process.
    Spawned(Child),
}

impl ExecutionHandle {
    /// Process id of the spawned child, if any.
    pub fn pid(&self) -> Option<u32> {
        match self {
            ExecutionHandle::Spawned(child) => Some(child.id()),
            _ => None,
        }
    }
}

/// One parsed unit of work from a command line.
///
/// `arguments` is never empty: empty slices are dropped by the parser before
/// a `Command` is ever built. Tokens are the exact input bytes; nothing is
/// decoded as UTF-8 on the way to `exec`.
#[derive(Debug)]
pub struct Command {
    /// The slice of the input line this command was parsed from.
    pub raw_text: Vec<u8>,
    /// Program name followed by its arguments.
    pub arguments: Vec<OsString>,
    pub output_target: OutputTarget,
    pub execution_handle: ExecutionHandle,
}

impl Command {
    pub(crate) fn new(raw_text: Vec<u8>, arguments: Vec<OsString>, output_target: OutputTarget) -> Self {
        Self {
            raw_text,
            arguments,
            output_target,
            execution_handle: ExecutionHandle::NotStarted,
        }
    }

    /// The program name as typed.
    pub fn program(&self) -> &OsStr {
        self.arguments.first().map(OsString::as_os_str).unwrap_or_default()
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[OsString] {
        self.arguments.get(1..).unwrap_or_default()
    }
}

/// Object-safe trait for anything the shell runs in-process.
pub trait ExecutableCommand {
    /// Executes the command against the shell state.
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &OsStr, args: &[OsString]) -> Option<Box<dyn ExecutableCommand>>;
}
