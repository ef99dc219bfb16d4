//! Editor abstraction for exercise attempts.
//!
//! The [`Editor`] trait decouples the exercise runner from the external
//! editor binary. Tests use scripted editors that rewrite the scratch file
//! without spawning processes.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument, warn};

use crate::io::config::EditorConfig;

/// How an editor session ended. Only [`EditorExit::Clean`] counts as a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorExit {
    /// Exit status 0.
    Clean,
    /// Non-zero exit, or terminated by a signal (`None`).
    Failed(Option<i32>),
    /// The editor could not be launched.
    Unavailable,
}

impl EditorExit {
    pub fn is_clean(self) -> bool {
        self == EditorExit::Clean
    }
}

/// Abstraction over interactive editors.
pub trait Editor {
    /// Program name shown to the learner.
    fn name(&self) -> &str;

    /// Whether the editor can be launched at all.
    fn is_available(&self) -> bool;

    /// Edit `path` interactively, blocking until the editor exits. `cursor` is a
    /// 0-based character offset in the first line.
    fn edit(&self, path: &Path, cursor: Option<usize>) -> EditorExit;
}

impl<E: Editor + ?Sized> Editor for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn edit(&self, path: &Path, cursor: Option<usize>) -> EditorExit {
        (**self).edit(path, cursor)
    }
}

/// Editor that runs an external vi-compatible binary in the foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// Build the invocation: configured args, then `-c "call cursor(1, col)"`
    /// when a cursor hint is given, then the file path last.
    pub fn command(&self, path: &Path, cursor: Option<usize>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(offset) = cursor {
            cmd.arg("-c").arg(cursor_directive(offset));
        }
        cmd.arg(path);
        cmd
    }
}

impl Editor for ExternalEditor {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        locate_program(&self.program).is_some()
    }

    #[instrument(skip_all, fields(program = %self.program, path = %path.display(), cursor))]
    fn edit(&self, path: &Path, cursor: Option<usize>) -> EditorExit {
        debug!("launching editor");
        // Inherited stdio: the editor owns the terminal until it exits.
        match self.command(path, cursor).status() {
            Ok(status) if status.success() => {
                debug!("editor exited cleanly");
                EditorExit::Clean
            }
            Ok(status) => {
                warn!(exit_code = ?status.code(), "editor exited with failure");
                EditorExit::Failed(status.code())
            }
            Err(err) => {
                warn!(err = %err, "failed to launch editor");
                EditorExit::Unavailable
            }
        }
    }
}

/// Ex command placing the cursor on line 1 at 1-based column `offset + 1`.
pub fn cursor_directive(offset: usize) -> String {
    format!("call cursor(1, {})", offset + 1)
}

/// Resolve `program` to an executable file.
///
/// Names containing a path separator are checked directly; bare names are
/// searched on `PATH`.
pub fn locate_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let search = env::var_os("PATH")?;
    env::split_paths(&search).find_map(|dir| {
        executable_names(program)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| is_executable(path))
    })
}

fn executable_names(program: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![program.to_string(), format!("{program}.exe")]
    } else {
        vec![program.to_string()]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn command_places_path_last_without_cursor() {
        let editor = ExternalEditor::new("vim", vec!["-u".to_string(), "NONE".to_string()]);
        let cmd = editor.command(Path::new("/tmp/ex.txt"), None);
        assert_eq!(cmd.get_program(), "vim");
        assert_eq!(args(&cmd), vec!["-u", "NONE", "/tmp/ex.txt"]);
    }

    #[test]
    fn command_adds_one_based_cursor_directive() {
        let editor = ExternalEditor::new("vim", Vec::new());
        let cmd = editor.command(Path::new("/tmp/ex.txt"), Some(4));
        assert_eq!(
            args(&cmd),
            vec!["-c", "call cursor(1, 5)", "/tmp/ex.txt"]
        );
    }

    #[test]
    fn missing_program_is_unavailable() {
        let editor = ExternalEditor::new("vimlearn-no-such-editor-4f2a", Vec::new());
        assert!(!editor.is_available());
        let temp = tempfile::tempdir().expect("tempdir");
        let exit = editor.edit(&temp.path().join("ex.txt"), None);
        assert_eq!(exit, EditorExit::Unavailable);
        assert!(!exit.is_clean());
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_clean_or_failed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ex.txt");
        assert_eq!(
            ExternalEditor::new("true", Vec::new()).edit(&path, None),
            EditorExit::Clean
        );
        assert_eq!(
            ExternalEditor::new("false", Vec::new()).edit(&path, None),
            EditorExit::Failed(Some(1))
        );
    }

    #[cfg(unix)]
    #[test]
    fn locate_program_checks_explicit_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        let plain = temp.path().join("not-executable");
        std::fs::write(&plain, "").expect("write");
        assert_eq!(locate_program(&plain.display().to_string()), None);
        assert!(locate_program("sh").is_some());
    }
}
