use crate::command::{Command, CommandFactory, ExecutableCommand, ExecutionHandle};
use crate::env::Environment;
use crate::errors::{self, ShellError};
use crate::external;
use crate::io_adapters::LineSource;
use crate::parser;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports built-ins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Read the next line.
    Continue,
    /// `exit` ran; stop reading.
    Shutdown,
}

/// The line orchestrator.
///
/// Each line is split on `&`, every slice is parsed and dispatched in order
/// (built-ins inline, everything else as a child process), and then the
/// interpreter waits for every child of that line before returning.
///
/// Example
/// ```
/// use std::path::PathBuf;
/// use wish::{Interpreter, LineOutcome};
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.execute_line("   "), LineOutcome::Continue);
/// assert_eq!(sh.execute_line("path /usr/bin /bin"), LineOutcome::Continue);
/// assert_eq!(sh.env().search_path, vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
    stderr: Box<dyn Write>,
}

impl Interpreter {
    /// Create an interpreter over `env` that reports errors to `stderr`.
    pub fn new(env: Environment, stderr: Box<dyn Write>) -> Self {
        use crate::builtin::{Cd, Exit, Path};
        Self {
            env,
            builtins: vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Path>::default()),
            ],
            stderr,
        }
    }

    /// Current shell state.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Read and execute lines until end of input or `exit`.
    ///
    /// A read error is logged and treated like end of input.
    pub fn run(&mut self, source: &mut dyn LineSource) {
        loop {
            let line = match source.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("end of input");
                    break;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read input, stopping");
                    break;
                }
            };
            if self.execute_line(&line) == LineOutcome::Shutdown {
                tracing::debug!("exit requested");
                break;
            }
        }
    }

    /// Parse, dispatch and await every command on one line.
    ///
    /// A failing command never stops its siblings. When `exit` runs, the
    /// remaining slices are not attempted and already-spawned children are
    /// left running.
    pub fn execute_line(&mut self, line: impl AsRef<[u8]>) -> LineOutcome {
        let mut commands: Vec<Command> = Vec::new();

        for slice in parser::split_line(line.as_ref()) {
            let mut command = match parser::parse(slice) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    self.report(&err);
                    continue;
                }
            };

            self.dispatch(&mut command);
            commands.push(command);

            if self.env.should_exit {
                return LineOutcome::Shutdown;
            }
        }

        wait_all(&mut commands);
        LineOutcome::Continue
    }

    fn dispatch(&mut self, command: &mut Command) {
        let builtin: Option<Box<dyn ExecutableCommand>> = self
            .builtins
            .iter()
            .find_map(|factory| factory.try_create(command.program(), command.args()));

        let result = match builtin {
            Some(cmd) => {
                command.execution_handle = ExecutionHandle::RanInline;
                cmd.execute(&mut self.env)
            }
            None => external::launch(&self.env, command),
        };

        if let Err(err) = result {
            self.report(&err);
        }
    }

    fn report(&mut self, err: &ShellError) {
        errors::report(self.stderr.as_mut(), err);
    }
}

impl Default for Interpreter {
    /// Default search path, errors on the process stderr.
    fn default() -> Self {
        Self::new(Environment::new(), Box::new(std::io::stderr()))
    }
}

/// The barrier: wait for each spawned child in the order it was listed.
fn wait_all(commands: &mut [Command]) {
    for command in commands.iter_mut() {
        if let ExecutionHandle::Spawned(child) = &mut command.execution_handle {
            let pid = child.id();
            match child.wait() {
                Ok(status) => tracing::trace!(pid, %status, "child finished"),
                Err(err) => tracing::warn!(pid, error = %err, "wait failed"),
            }
        }
    }
}
