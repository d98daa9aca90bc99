use crate::command::{Command, ExecutionHandle, OutputTarget};
use crate::env::Environment;
use crate::errors::{Result, ShellError};
use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Resolve `program` against `search_path`, in order.
///
/// Each candidate is the literal byte string `directory/program`; the first
/// one that is a regular file with an execute bit wins. Absolute or relative
/// program names get no special treatment.
pub fn resolve(search_path: &[PathBuf], program: &OsStr) -> Result<PathBuf> {
    search_path
        .iter()
        .map(|dir| {
            let mut candidate = dir.as_os_str().to_os_string();
            candidate.push("/");
            candidate.push(program);
            PathBuf::from(candidate)
        })
        .inspect(|candidate| tracing::trace!(candidate = %candidate.display(), "probing"))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| ShellError::NotFound(program.to_string_lossy().into_owned()))
}

fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

/// Spawn `command` as a child process without waiting for it.
///
/// On success the command's handle becomes [`ExecutionHandle::Spawned`].
/// On any failure the handle stays [`ExecutionHandle::NotStarted`] and the
/// error is returned for reporting.
pub fn launch(env: &Environment, command: &mut Command) -> Result<()> {
    command.execution_handle = ExecutionHandle::NotStarted;

    let executable = resolve(&env.search_path, command.program())?;
    tracing::debug!(program = ?command.program(), executable = %executable.display(), "resolved");

    let mut process = std::process::Command::new(&executable);
    process.arg0(command.program()).args(command.args());

    if let OutputTarget::File(file) = &command.output_target {
        let stdout = file.try_clone().map_err(ShellError::Redirect)?;
        let stderr = file.try_clone().map_err(ShellError::Redirect)?;
        process.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
    }

    let child = process.spawn().map_err(|source| ShellError::Spawn {
        program: command.program().to_string_lossy().into_owned(),
        source,
    })?;
    tracing::debug!(pid = child.id(), program = ?command.program(), "spawned");

    command.execution_handle = ExecutionHandle::Spawned(child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;

    fn write_script(dir: &Path, name: &str, body: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).expect("create script");
        write!(f, "#!/bin/sh\n{body}\n").expect("write script");
        drop(f);
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");
        path
    }


    fn wait_for(command: &mut Command) {
        match &mut command.execution_handle {
            ExecutionHandle::Spawned(child) => {
                child.wait().expect("wait");
            }
            other => panic!("expected spawned child, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_probes_directories_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_script(second.path(), "prog", "exit 0", 0o755);
        let winner = write_script(first.path(), "prog", "exit 0", 0o755);

        let search = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve(&search, OsStr::new("prog")).unwrap(), winner);
    }

    #[test]
    fn test_resolve_skips_non_executable_files() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_script(first.path(), "prog", "exit 0", 0o644);
        let winner = write_script(second.path(), "prog", "exit 0", 0o755);

        let search = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve(&search, OsStr::new("prog")).unwrap(), winner);
    }

    #[test]
    fn test_resolve_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("prog")).unwrap();
        let res = resolve(&[dir.path().to_path_buf()], OsStr::new("prog"));
        assert!(matches!(res, Err(ShellError::NotFound(_))));
    }

    #[test]
    fn test_resolve_with_empty_search_path_fails() {
        let res = resolve(&[], OsStr::new("sh"));
        assert!(matches!(res, Err(ShellError::NotFound(name)) if name == "sh"));
    }

    #[test]
    fn test_resolve_joins_literally() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "prog", "exit 0", 0o755);
        // An absolute program name is still appended to each directory.
        assert!(resolve(&[dir.path().to_path_buf()], script.as_os_str()).is_err());
    }

    #[test]
    fn test_resolve_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"t\xe9st");
        let path = dir.path().join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(resolve(&[dir.path().to_path_buf()], name).unwrap(), path);
    }

    #[test]
    #[serial]
    fn test_launch_redirects_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "noisy", "echo \"out $1\"\necho \"err $1\" >&2", 0o755);
        let out = dir.path().join("out.txt");

        let env = Environment::with_search_path([dir.path()]);
        let mut cmd = parse(format!("noisy arg > {}", out.display()).as_bytes())
            .unwrap()
            .unwrap();
        launch(&env, &mut cmd).unwrap();
        assert!(cmd.execution_handle.pid().is_some());
        wait_for(&mut cmd);

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("out arg\n"), "stdout missing: {written:?}");
        assert!(written.contains("err arg\n"), "stderr missing: {written:?}");
    }

    #[test]
    fn test_launch_unresolved_command_is_not_started() {
        let env = Environment::with_search_path(Vec::<PathBuf>::new());
        let mut cmd = parse(b"ls").unwrap().unwrap();
        let res = launch(&env, &mut cmd);
        assert!(matches!(res, Err(ShellError::NotFound(_))));
        assert!(matches!(cmd.execution_handle, ExecutionHandle::NotStarted));
    }
}
