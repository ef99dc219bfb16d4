//! Session controller: walks the learner through lessons in curriculum
//! order and drives the per-exercise menu machine.
//!
//! Lesson loop: `SelectLesson -> ShowLesson -> RunExercises -> Advance ->
//! (SelectLesson | Done)`. Quitting from any menu ends the session without
//! completing the in-flight lesson; statistics already recorded stay saved.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::console::Console;
use crate::core::curriculum::Curriculum;
use crate::core::menu::{self, Effect, ExerciseEnd, MenuState};
use crate::core::profile::ExerciseAttempts;
use crate::core::types::{Exercise, Lesson};
use crate::io::editor::Editor;
use crate::io::exercise_runner::ExerciseRunner;
use crate::io::profile_store::StoredProfile;
use crate::screens;

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The learner quit from a menu (or input ended).
    Quit,
    /// No lesson left to study.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub end: SessionEnd,
    /// Lessons finished during this session, in order.
    pub lessons_completed: Vec<String>,
    /// Modules that became complete during this session.
    pub modules_completed: Vec<u32>,
}

enum Phase<'c> {
    SelectLesson,
    ShowLesson(&'c Lesson),
    RunExercises(&'c Lesson),
    Advance(&'c Lesson),
    Done(SessionEnd),
}

pub struct Session<'a, E, C: ?Sized> {
    curriculum: &'a Curriculum,
    profile: &'a mut StoredProfile,
    runner: ExerciseRunner<E>,
    console: &'a mut C,
}

impl<'a, E: Editor, C: Console + ?Sized> Session<'a, E, C> {
    pub fn new(
        curriculum: &'a Curriculum,
        profile: &'a mut StoredProfile,
        runner: ExerciseRunner<E>,
        console: &'a mut C,
    ) -> Self {
        Self {
            curriculum,
            profile,
            runner,
            console,
        }
    }

    /// Run until the learner quits or the curriculum is exhausted. The
    /// scratch file is cleaned up however the session ends.
    pub fn run(mut self) -> Result<SessionReport> {
        let result = self.drive();
        self.runner.cleanup();
        if let Ok(report) = &result {
            info!(
                username = %self.profile.username(),
                end = ?report.end,
                lessons = report.lessons_completed.len(),
                "session ended"
            );
        }
        result
    }

    fn drive(&mut self) -> Result<SessionReport> {
        let curriculum = self.curriculum;
        let mut lessons_completed = Vec::new();
        let mut modules_completed = Vec::new();
        let mut phase = Phase::SelectLesson;
        let end = loop {
            phase = match phase {
                Phase::SelectLesson => {
                    let current = &self.profile.profile().current_lesson;
                    match curriculum.lesson(current) {
                        Some(lesson) => Phase::ShowLesson(lesson),
                        None => {
                            debug!(current_lesson = %current, "no lesson to select");
                            screens::all_complete(self.console)?;
                            Phase::Done(SessionEnd::Completed)
                        }
                    }
                }
                Phase::ShowLesson(lesson) => {
                    self.show_lesson(lesson)?;
                    Phase::RunExercises(lesson)
                }
                Phase::RunExercises(lesson) => {
                    if self.run_exercises(lesson)? {
                        Phase::Advance(lesson)
                    } else {
                        Phase::Done(SessionEnd::Quit)
                    }
                }
                Phase::Advance(lesson) => {
                    self.profile.complete_lesson(&lesson.id)?;
                    lessons_completed.push(lesson.id.clone());
                    screens::lesson_complete(self.console, lesson)?;

                    let completed = &self.profile.profile().completed_lessons;
                    if curriculum.is_module_complete(lesson.module_num, completed) {
                        let module = curriculum
                            .module(lesson.module_num)
                            .with_context(|| format!("module {} missing", lesson.module_num))?;
                        screens::module_complete(self.console, module)?;
                        modules_completed.push(module.number);
                    }

                    match curriculum.next_lesson_id(&lesson.id) {
                        Some(next) => {
                            self.profile.set_current_lesson(next)?;
                            screens::wait_for_key(self.console)?;
                            Phase::SelectLesson
                        }
                        None => {
                            screens::all_complete(self.console)?;
                            Phase::Done(SessionEnd::Completed)
                        }
                    }
                }
                Phase::Done(end) => break end,
            };
        };
        Ok(SessionReport {
            end,
            lessons_completed,
            modules_completed,
        })
    }

    fn show_lesson(&mut self, lesson: &Lesson) -> Result<()> {
        let position = self
            .curriculum
            .position(&lesson.id)
            .with_context(|| format!("lesson {} has no position", lesson.id))?;
        debug!(lesson_id = %lesson.id, "showing lesson");
        self.console.clear()?;
        screens::header(self.console, self.profile.profile(), &position)?;
        screens::lesson_intro(self.console, lesson)
    }

    /// True when every exercise was passed, skipped or force-passed; false
    /// when the learner quit.
    fn run_exercises(&mut self, lesson: &Lesson) -> Result<bool> {
        let total = lesson.exercises.len();
        for (index, exercise) in lesson.exercises.iter().enumerate() {
            let end = self.run_exercise(lesson, exercise, index + 1, total)?;
            debug!(lesson_id = %lesson.id, exercise = index + 1, end = ?end, "exercise finished");
            if end == ExerciseEnd::Quit {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn run_exercise(
        &mut self,
        lesson: &Lesson,
        exercise: &Exercise,
        number: usize,
        total: usize,
    ) -> Result<ExerciseEnd> {
        screens::exercise(self.console, exercise, number, total)?;
        let mut attempts = ExerciseAttempts::new();
        let mut state = MenuState::Prompting;
        screens::menu(self.console, state)?;
        loop {
            let input = screens::prompt_choice(self.console)?;
            let (next, effect) = menu::transition(state, &input);
            state = next;
            match effect {
                Effect::Run => {
                    let verdict = self.runner.run_once(exercise)?;
                    self.profile
                        .record_exercise(&mut attempts, verdict.success)?;
                    if verdict.success {
                        screens::success(self.console)?;
                    } else {
                        screens::failure(self.console, &verdict.actual, &verdict.expected)?;
                    }
                    state = menu::after_run(verdict.success);
                }
                Effect::ShowHint => screens::hint(self.console, &exercise.hint)?,
                Effect::ShowRationale => {
                    screens::rationale(self.console, lesson.rationale.as_deref())?;
                }
                Effect::Invalid => screens::invalid_choice(self.console, &input)?,
                Effect::Finish(end) => {
                    if end == ExerciseEnd::ForcePassed {
                        screens::force_passed(self.console)?;
                    }
                    return Ok(end);
                }
            }
            screens::menu(self.console, state)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::Stats;
    use crate::io::profile_store::ProfileStore;
    use crate::test_support::{ScriptedConsole, ScriptedEdit, ScriptedEditor, fixture_curriculum};
    use pretty_assertions::assert_eq;

    fn run_session(
        profile: &mut StoredProfile,
        edits: Vec<ScriptedEdit>,
        inputs: &[&str],
    ) -> (SessionReport, ScriptedConsole, ScriptedEditor) {
        let curriculum = fixture_curriculum();
        let scratch = tempfile::tempdir().expect("scratch");
        let editor = ScriptedEditor::new(edits);
        let mut console = ScriptedConsole::new(inputs.iter().copied());
        let runner = ExerciseRunner::new(&editor, scratch.path());
        let report = Session::new(&curriculum, profile, runner, &mut console)
            .run()
            .expect("session");
        (report, console, editor)
    }

    #[test]
    fn quitting_at_first_menu_records_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(temp.path());
        let mut profile = store.load_or_create("ada", "1.1").expect("create");

        let (report, _, editor) = run_session(&mut profile, Vec::new(), &["0"]);
        assert_eq!(report.end, SessionEnd::Quit);
        assert!(report.lessons_completed.is_empty());
        assert!(editor.invocations().is_empty());
        assert_eq!(profile.profile().stats, Stats::default());
        assert_eq!(profile.profile().current_lesson, "1.1");
    }

    #[test]
    fn end_of_input_quits_instead_of_looping() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(temp.path());
        let mut profile = store.load_or_create("ada", "1.1").expect("create");

        let (report, _, _) = run_session(&mut profile, Vec::new(), &["9", "2"]);
        assert_eq!(report.end, SessionEnd::Quit);
    }

    #[test]
    fn invalid_and_info_choices_keep_the_menu() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(temp.path());
        let mut profile = store.load_or_create("ada", "1.1").expect("create");

        let (_, console, _) = run_session(&mut profile, Vec::new(), &["x", "2", "3", "0"]);
        let text = console.transcript();
        assert!(text.contains("'x' is not one of the options above."));
        assert!(text.contains("Hint"));
        assert!(text.contains("Why it works this way"));
    }

    #[test]
    fn current_lesson_past_the_end_completes_immediately() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(temp.path());
        let mut profile = store.load_or_create("ada", "9.9").expect("create");

        let (report, console, _) = run_session(&mut profile, Vec::new(), &[]);
        assert_eq!(report.end, SessionEnd::Completed);
        assert!(console.transcript().contains("finished every lesson"));
    }

    #[test]
    fn staged_file_is_removed_when_the_session_ends() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(temp.path().join("users"));
        let mut profile = store.load_or_create("ada", "1.1").expect("create");
        let curriculum = fixture_curriculum();
        let scratch = temp.path().join("scratch");
        let editor = ScriptedEditor::new(vec![ScriptedEdit::Save("wrong".to_string())]);
        let mut console = ScriptedConsole::new(["1", "0"]);
        let runner = ExerciseRunner::new(&editor, &scratch);

        Session::new(&curriculum, &mut profile, runner, &mut console)
            .run()
            .expect("session");
        let staged = editor.invocations()[0].0.clone();
        assert!(!staged.exists());
    }
}
