//! One exercise attempt end to end: stage a scratch file, hand it to the
//! editor, read it back and judge it.
//!
//! Judged failures (editor missing, non-zero exit, scratch file gone,
//! mismatch) are returned as a [`Verdict`], never as errors. Only a failure
//! to create the scratch file is an error.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::{Rng, distributions::Alphanumeric};
use tracing::{debug, warn};

use crate::core::normalize::texts_match;
use crate::core::types::Exercise;
use crate::io::editor::Editor;

const SCRATCH_PREFIX: &str = "vimlearn_exercise_";
const SCRATCH_SUFFIX: &str = ".txt";
const SUFFIX_LEN: usize = 8;
const STAGE_ATTEMPTS: usize = 16;

/// Outcome of one judged run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    /// File content exactly as read back; empty when nothing was read.
    pub actual: String,
    /// The exercise's expected text, unmodified.
    pub expected: String,
}

impl Verdict {
    fn failed(expected: &str) -> Self {
        Self {
            success: false,
            actual: String::new(),
            expected: expected.to_string(),
        }
    }
}

pub struct ExerciseRunner<E> {
    editor: E,
    scratch_dir: PathBuf,
    current_file: Option<PathBuf>,
}

impl<E: Editor> ExerciseRunner<E> {
    pub fn new(editor: E, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            editor,
            scratch_dir: scratch_dir.into(),
            current_file: None,
        }
    }

    /// Path of the most recently staged scratch file.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Write the exercise's initial text to a fresh, uniquely named file and
    /// make it the current file. Earlier scratch files are left in place.
    pub fn stage(&mut self, exercise: &Exercise) -> Result<PathBuf> {
        fs::create_dir_all(&self.scratch_dir)
            .with_context(|| format!("create scratch dir {}", self.scratch_dir.display()))?;
        let mut attempts = 0;
        let (path, mut file) = loop {
            let path = self.scratch_dir.join(scratch_file_name());
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists && attempts < STAGE_ATTEMPTS => {
                    attempts += 1;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("create scratch file {}", path.display()));
                }
            }
        };
        file.write_all(exercise.initial.as_bytes())
            .with_context(|| format!("write scratch file {}", path.display()))?;
        debug!(path = %path.display(), "staged exercise");
        self.current_file = Some(path.clone());
        Ok(path)
    }

    /// Run the editor on `path`; true only for a clean exit.
    pub fn invoke(&self, path: &Path, cursor: Option<usize>) -> bool {
        self.editor.edit(path, cursor).is_clean()
    }

    /// Judge the current file against the exercise. Fails closed when no file
    /// was staged or it cannot be read.
    pub fn verify(&self, exercise: &Exercise) -> Verdict {
        let Some(path) = self.current_file.as_deref() else {
            warn!("verify called before any exercise was staged");
            return Verdict::failed(&exercise.expected);
        };
        let actual = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(path = %path.display(), err = %err, "scratch file unreadable at verify");
                return Verdict::failed(&exercise.expected);
            }
        };
        let success = texts_match(&actual, &exercise.expected);
        debug!(path = %path.display(), success, "verified exercise");
        Verdict {
            success,
            actual,
            expected: exercise.expected.clone(),
        }
    }

    /// Stage, edit, verify. A failed edit short-circuits without reading.
    pub fn run_once(&mut self, exercise: &Exercise) -> Result<Verdict> {
        let path = self.stage(exercise)?;
        if !self.invoke(&path, exercise.cursor) {
            return Ok(Verdict::failed(&exercise.expected));
        }
        Ok(self.verify(exercise))
    }

    /// Remove the current file, ignoring deletion errors.
    pub fn cleanup(&mut self) {
        let Some(path) = self.current_file.take() else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed scratch file"),
            Err(err) => debug!(path = %path.display(), err = %err, "scratch cleanup skipped"),
        }
    }
}

fn scratch_file_name() -> String {
    let mut rng = rand::thread_rng();
    let suffix = std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(SUFFIX_LEN)
        .collect::<String>()
        .to_lowercase();
    format!("{SCRATCH_PREFIX}{suffix}{SCRATCH_SUFFIX}")
}
