//! Test-only helpers: curriculum builders, a scripted editor, a scripted
//! console and a throwaway data home.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use crate::commands::CommandContext;
use crate::console::{Console, Panel, Table, Tone};
use crate::core::curriculum::Curriculum;
use crate::core::menu::MenuOption;
use crate::core::types::{Exercise, Lesson, Module};
use crate::io::config::TutorConfig;
use crate::io::editor::{Editor, EditorExit};
use crate::io::paths::TutorPaths;
use crate::io::terminal::{MAX_WIDTH, render_menu, render_panel, render_table, separator};

/// Three lessons over two modules:
///
/// - 1.1 "delete this" -> "this" (cursor 0), then "hello world" -> "hello vim"; has a rationale
/// - 1.2 "abc" -> "abc"; no rationale
/// - 2.1 "old text" -> "new text"
pub const FIXTURE_CURRICULUM: &str = r#"
[[modules]]
number = 1
title = "Motion"
description = "Moving and deleting"

[[modules.lessons]]
id = "1.1"
title = "Deleting words"
description = "dw and friends"
explanation = "dw deletes to the start of the next word."
rationale = "Operators compose with motions."

[[modules.lessons.exercises]]
instruction = "Delete the first word"
initial = "delete this"
expected = "this"
hint = "Type dw"
commands = ["dw"]
cursor = 0

[[modules.lessons.exercises]]
instruction = "Replace the last word"
initial = "hello world"
expected = "hello vim"
hint = "Use cw"
commands = ["w", "cw"]

[[modules.lessons]]
id = "1.2"
title = "Saving"
description = "Write and quit"
explanation = ":wq writes the file and quits."

[[modules.lessons.exercises]]
instruction = "Save without changes"
initial = "abc"
expected = "abc"
hint = "Type :wq"
commands = [":wq"]

[[modules]]
number = 2
title = "Editing"
description = "Changing text"

[[modules.lessons]]
id = "2.1"
title = "Changing lines"
description = "cc"
explanation = "cc replaces the whole line."

[[modules.lessons.exercises]]
instruction = "Rewrite the line"
initial = "old text"
expected = "new text"
hint = "Use cc"
commands = ["cc"]
"#;

pub fn fixture_curriculum() -> Curriculum {
    Curriculum::from_toml_str(FIXTURE_CURRICULUM).expect("fixture curriculum")
}

/// Exercise with placeholder instruction and hint.
pub fn exercise(initial: &str, expected: &str) -> Exercise {
    Exercise {
        instruction: format!("turn '{initial}' into '{expected}'"),
        initial: initial.to_string(),
        expected: expected.to_string(),
        hint: "hint".to_string(),
        commands: Vec::new(),
        cursor: None,
    }
}

/// Lesson with one trivial exercise. Module fields are left for
/// `Curriculum::new` to fill in.
pub fn lesson(id: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: format!("{id} title"),
        module: String::new(),
        module_num: 0,
        description: format!("{id} description"),
        explanation: format!("{id} explanation"),
        exercises: vec![exercise("a", "a")],
        rationale: None,
    }
}

pub fn module(number: u32, lessons: Vec<Lesson>) -> Module {
    Module {
        number,
        title: format!("Module {number}"),
        description: format!("module {number} description"),
        lessons,
    }
}

/// One scripted editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedEdit {
    /// Overwrite the file with this text and exit 0.
    Save(String),
    /// Exit with this non-zero status, file untouched.
    Exit(i32),
    /// Fail to launch.
    Unavailable,
}

/// Editor double that plays back [`ScriptedEdit`]s in order. Once the script
/// runs out, each session exits cleanly without touching the file.
#[derive(Debug)]
pub struct ScriptedEditor {
    edits: RefCell<VecDeque<ScriptedEdit>>,
    calls: RefCell<Vec<(PathBuf, Option<usize>)>>,
    available: bool,
}

impl ScriptedEditor {
    pub fn new(edits: Vec<ScriptedEdit>) -> Self {
        Self {
            edits: RefCell::new(edits.into()),
            calls: RefCell::new(Vec::new()),
            available: true,
        }
    }

    /// Editor that is never found.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    /// `(path, cursor)` of every session so far.
    pub fn invocations(&self) -> Vec<(PathBuf, Option<usize>)> {
        self.calls.borrow().clone()
    }
}

impl Editor for ScriptedEditor {
    fn name(&self) -> &str {
        "scripted-vim"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn edit(&self, path: &Path, cursor: Option<usize>) -> EditorExit {
        self.calls.borrow_mut().push((path.to_path_buf(), cursor));
        if !self.available {
            return EditorExit::Unavailable;
        }
        match self.edits.borrow_mut().pop_front() {
            None => EditorExit::Clean,
            Some(ScriptedEdit::Save(text)) => match fs::write(path, text) {
                Ok(()) => EditorExit::Clean,
                Err(_) => EditorExit::Failed(None),
            },
            Some(ScriptedEdit::Exit(code)) => EditorExit::Failed(Some(code)),
            Some(ScriptedEdit::Unavailable) => EditorExit::Unavailable,
        }
    }
}

/// Console double: answers prompts from a queue and records everything
/// shown as plain text.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<String>,
    lines: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything rendered so far, one entry per line.
    pub fn transcript(&self) -> String {
        self.transcript.join("\n")
    }

    /// Non-empty text passed to [`Console::line`].
    pub fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// Answers not yet consumed.
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn clear(&mut self) -> Result<()> {
        self.transcript.push("[clear]".to_string());
        Ok(())
    }

    fn panel(&mut self, panel: &Panel) -> Result<()> {
        self.transcript.extend(render_panel(panel, MAX_WIDTH));
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        self.transcript.extend(render_table(table, MAX_WIDTH));
        Ok(())
    }

    fn menu(&mut self, options: &[MenuOption]) -> Result<()> {
        self.transcript.push(separator());
        self.transcript.push(render_menu(options));
        Ok(())
    }

    fn line(&mut self, text: &str, _tone: Tone) -> Result<()> {
        self.transcript.push(text.to_string());
        if !text.is_empty() {
            self.lines.push(text.to_string());
        }
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let answer = self.inputs.pop_front();
        self.transcript
            .push(format!("{prompt}{}", answer.as_deref().unwrap_or("<eof>")));
        Ok(answer)
    }
}

/// Temporary data home wired to the fixture curriculum.
pub struct TestHome {
    dir: TempDir,
    pub paths: TutorPaths,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = TutorPaths::new(dir.path());
        Self { dir, paths }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }

    /// Default config with scratch files kept inside the home.
    pub fn config(&self) -> TutorConfig {
        TutorConfig {
            scratch_dir: Some(self.scratch_dir()),
            ..TutorConfig::default()
        }
    }

    pub fn context(&self) -> CommandContext {
        CommandContext {
            paths: self.paths.clone(),
            config: self.config(),
            curriculum: fixture_curriculum(),
        }
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}
