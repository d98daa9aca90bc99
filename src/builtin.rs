use crate::command::{CommandFactory, ExecutableCommand};
use crate::env::Environment;
use crate::errors::{Result, ShellError};
use crate::interpreter::Factory;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are built from their raw arguments and executed directly
/// in-process, on the shell's own thread, without spawning a child process.
/// No argument is ever read as an option: `cd -d` changes into `-d`.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Builds the command from the arguments after its name.
    fn from_args(args: &[OsString]) -> Result<Self>;

    /// Executes the command against the shell state.
    fn execute(self, env: &mut Environment) -> Result<()>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<()> {
        <T as BuiltinCommand>::execute(*self, env)
    }
}

struct InvalidArgs {
    error: ShellError,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, _env: &mut Environment) -> Result<()> {
        Err(self.error)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &OsStr, args: &[OsString]) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(args) {
            Ok(cmd) => Box::new(cmd),
            Err(error) => Box::new(InvalidArgs { error }),
        })
    }
}

/// Change the current working directory of the shell.
pub struct Cd {
    /// Directory to switch to; absolute or relative to the current directory.
    pub target: PathBuf,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[OsString]) -> Result<Self> {
        match args {
            [target] => Ok(Cd {
                target: PathBuf::from(target),
            }),
            other => Err(ShellError::BuiltinArgs {
                name: Self::name(),
                got: other.len(),
            }),
        }
    }

    fn execute(self, _env: &mut Environment) -> Result<()> {
        env::set_current_dir(&self.target).map_err(|source| ShellError::ChangeDir {
            path: self.target.clone(),
            source,
        })?;
        tracing::debug!(dir = %self.target.display(), "changed directory");
        Ok(())
    }
}

/// Replace the executable search path with the given directories.
pub struct Path {
    /// Directories to search, in order. None at all empties the search path.
    pub dirs: Vec<PathBuf>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    fn from_args(args: &[OsString]) -> Result<Self> {
        Ok(Path {
            dirs: args.iter().map(PathBuf::from).collect(),
        })
    }

    fn execute(self, env: &mut Environment) -> Result<()> {
        tracing::debug!(dirs = ?self.dirs, "search path replaced");
        env.set_search_path(self.dirs);
        Ok(())
    }
}

/// Exit the shell with status 0.
pub struct Exit {
    /// Not accepted; any value is reported as an error, and the shell exits anyway.
    pub args: Vec<OsString>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(args: &[OsString]) -> Result<Self> {
        Ok(Exit { args: args.to_vec() })
    }

    // Error-then-exit: a malformed `exit` still terminates the shell.
    fn execute(self, env: &mut Environment) -> Result<()> {
        env.should_exit = true;
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(ShellError::ExitArgs(self.args.len()))
        }
    }
}
