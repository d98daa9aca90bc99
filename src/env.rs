use std::path::PathBuf;

/// Search path installed at startup, before any `path` built-in runs.
pub const DEFAULT_SEARCH_PATH: &[&str] = &["/bin"];

/// Mutable shell state threaded through the interpreter.
///
/// The environment contains:
/// - `search_path`: directories consulted, in order, to resolve program names.
/// - `should_exit`: set by the `exit` built-in; the line loop stops once it is true.
///
/// The working directory is not mirrored here: `cd` changes the process cwd,
/// which children inherit and relative paths resolve against.
///
/// Only the built-ins mutate it. Everything runs on the shell's single thread,
/// so no locking is involved.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Ordered list of directories searched for executables. Entries are kept
    /// byte-for-byte as typed.
    pub search_path: Vec<PathBuf>,
    /// When set to true, the interpreter shuts down after the current command.
    pub should_exit: bool,
}

impl Environment {
    /// Install [`DEFAULT_SEARCH_PATH`].
    pub fn new() -> Self {
        Self::with_search_path(DEFAULT_SEARCH_PATH.iter().copied())
    }

    /// Build an environment with an explicit search path.
    pub fn with_search_path<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        Self {
            search_path: dirs.into_iter().map(Into::into).collect(),
            should_exit: false,
        }
    }

    /// Replace the whole search path. An empty list is valid.
    pub fn set_search_path(&mut self, dirs: Vec<PathBuf>) {
        self.search_path = dirs;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use std::path::PathBuf;

    #[test]
    fn test_env_starts_with_default_search_path() {
        let env = Environment::new();
        assert_eq!(env.search_path, vec![PathBuf::from("/bin")]);
        assert!(!env.should_exit);
    }

    #[test]
    fn test_set_search_path_replaces_instead_of_merging() {
        let mut env = Environment::with_search_path(["/a", "/b"]);
        env.set_search_path(vec![PathBuf::from("/c")]);
        assert_eq!(env.search_path, vec![PathBuf::from("/c")]);

        env.set_search_path(Vec::new());
        assert!(env.search_path.is_empty());
    }
}
