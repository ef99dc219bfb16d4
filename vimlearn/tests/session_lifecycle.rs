//! Session lifecycle tests: whole learning sessions driven through a scripted
//! editor and console against the fixture curriculum.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use vimlearn::core::profile::Stats;
use vimlearn::io::exercise_runner::ExerciseRunner;
use vimlearn::io::profile_store::{ProfileStore, StoredProfile};
use vimlearn::session::{Session, SessionEnd, SessionReport};
use vimlearn::test_support::{ScriptedConsole, ScriptedEdit, ScriptedEditor, fixture_curriculum};

struct Harness {
    temp: TempDir,
    store: ProfileStore,
}

impl Harness {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ProfileStore::new(temp.path().join("users"));
        Self { temp, store }
    }

    fn profile(&self) -> StoredProfile {
        self.store.load_or_create("ada", "1.1").expect("profile")
    }

    fn reload(&self) -> StoredProfile {
        self.store.load("ada").expect("load").expect("present")
    }

    fn run(
        &self,
        profile: &mut StoredProfile,
        edits: Vec<ScriptedEdit>,
        inputs: &[&str],
    ) -> (SessionReport, ScriptedConsole, ScriptedEditor) {
        let curriculum = fixture_curriculum();
        let editor = ScriptedEditor::new(edits);
        let mut console = ScriptedConsole::new(inputs.iter().copied());
        let runner = ExerciseRunner::new(&editor, self.temp.path().join("scratch"));
        let report = Session::new(&curriculum, profile, runner, &mut console)
            .run()
            .expect("session");
        (report, console, editor)
    }
}

fn save(text: &str) -> ScriptedEdit {
    ScriptedEdit::Save(text.to_string())
}

#[test]
fn passing_every_exercise_completes_the_course() {
    let harness = Harness::new();
    let mut profile = harness.profile();
    let edits = vec![
        save("this\n"),
        save("hello vim\n"),
        save("abc\n"),
        save("new text\n"),
    ];
    let inputs = ["1", "1", "1", "1", "", "1", "1", "", "1", "1"];

    let (report, console, editor) = harness.run(&mut profile, edits, &inputs);

    assert_eq!(report.end, SessionEnd::Completed);
    assert_eq!(report.lessons_completed, vec!["1.1", "1.2", "2.1"]);
    assert_eq!(report.modules_completed, vec![1, 2]);
    assert_eq!(console.pending_inputs(), 0);
    assert!(console.transcript().contains("finished every lesson"));

    let invocations = editor.invocations();
    assert_eq!(invocations.len(), 4);
    assert_eq!(invocations[0].1, Some(0));
    assert_eq!(invocations[1].1, None);

    let stored = harness.reload();
    assert_eq!(stored.profile().completed_lessons, vec!["1.1", "1.2", "2.1"]);
    assert_eq!(stored.profile().current_lesson, "2.1");
    assert_eq!(
        stored.profile().stats,
        Stats {
            total_exercises: 4,
            successful_first_try: 4,
            total_attempts: 4,
        }
    );
}

#[test]
fn retry_after_failure_counts_one_exercise_and_two_attempts() {
    let harness = Harness::new();
    let mut profile = harness.profile();
    let edits = vec![save("delete this"), save("this")];

    let (report, console, _) = harness.run(&mut profile, edits, &["1", "1", "0"]);

    assert_eq!(report.end, SessionEnd::Quit);
    let text = console.transcript();
    assert!(text.contains("Not a match yet"));
    assert!(text.contains("Exercise complete!"));
    assert_eq!(
        harness.reload().profile().stats,
        Stats {
            total_exercises: 1,
            successful_first_try: 0,
            total_attempts: 2,
        }
    );
}

#[test]
fn quitting_mid_lesson_keeps_recorded_runs() {
    let harness = Harness::new();
    let mut profile = harness.profile();

    let (report, _, _) = harness.run(&mut profile, vec![save("this")], &["1", "1", "0"]);

    assert_eq!(report.end, SessionEnd::Quit);
    assert!(report.lessons_completed.is_empty());
    let stored = harness.reload();
    assert!(stored.profile().completed_lessons.is_empty());
    assert_eq!(stored.profile().current_lesson, "1.1");
    assert_eq!(stored.profile().stats.total_exercises, 1);
    assert_eq!(stored.profile().stats.successful_first_try, 1);
}

#[test]
fn editor_that_fails_to_launch_is_a_failed_run() {
    let harness = Harness::new();
    let mut profile = harness.profile();

    let (report, console, editor) =
        harness.run(&mut profile, vec![ScriptedEdit::Unavailable], &["1", "0"]);

    assert_eq!(report.end, SessionEnd::Quit);
    assert_eq!(editor.invocations().len(), 1);
    let text = console.transcript();
    assert!(text.contains("(empty)"));
    assert!(text.contains("Force pass"));
    assert_eq!(
        harness.reload().profile().stats,
        Stats {
            total_exercises: 1,
            successful_first_try: 0,
            total_attempts: 1,
        }
    );
}

#[test]
fn non_zero_editor_exit_is_not_graded() {
    let harness = Harness::new();
    let mut profile = harness.profile();

    // Non-zero exit skips grading entirely.
    let (_, console, _) = harness.run(&mut profile, vec![ScriptedEdit::Exit(1)], &["1", "0"]);

    assert!(console.transcript().contains("Not a match yet"));
    assert_eq!(harness.reload().profile().stats.successful_first_try, 0);
}

#[test]
fn skip_and_force_pass_still_complete_the_lesson() {
    let harness = Harness::new();
    let mut profile = harness.profile();

    // Skip exercise 1, fail exercise 2 and force it through, then quit in 1.2.
    let (report, console, _) =
        harness.run(&mut profile, vec![save("wrong")], &["4", "1", "5", "", "0"]);

    assert_eq!(report.end, SessionEnd::Quit);
    assert_eq!(report.lessons_completed, vec!["1.1"]);
    assert!(console.transcript().contains("Exercise marked as passed."));
    let stored = harness.reload();
    assert_eq!(stored.profile().completed_lessons, vec!["1.1"]);
    assert_eq!(stored.profile().current_lesson, "1.2");
    assert_eq!(
        stored.profile().stats,
        Stats {
            total_exercises: 1,
            successful_first_try: 0,
            total_attempts: 1,
        }
    );
}

#[test]
fn skipping_from_the_retry_menu_moves_to_the_next_exercise() {
    let harness = Harness::new();
    let mut profile = harness.profile();

    // Fail exercise 1, skip it from the retry menu, then quit at exercise 2.
    let (report, console, editor) =
        harness.run(&mut profile, vec![save("wrong")], &["1", "4", "0"]);

    assert_eq!(report.end, SessionEnd::Quit);
    assert!(report.lessons_completed.is_empty());
    assert_eq!(editor.invocations().len(), 1);
    assert_eq!(console.pending_inputs(), 0);
    assert!(console.transcript().contains("Exercise 2/2"));
    let stored = harness.reload();
    assert!(stored.profile().completed_lessons.is_empty());
    assert_eq!(
        stored.profile().stats,
        Stats {
            total_exercises: 1,
            successful_first_try: 0,
            total_attempts: 1,
        }
    );
}

#[test]
fn finishing_the_last_lesson_of_a_module_reports_it() {
    let harness = Harness::new();
    let mut profile = harness.profile();
    profile.complete_lesson("1.1").expect("complete");
    profile.set_current_lesson("1.2").expect("move");

    // The editor leaves "abc" untouched, which already matches.
    let (report, console, _) = harness.run(&mut profile, Vec::new(), &["1", "1", "", "0"]);

    assert_eq!(report.lessons_completed, vec!["1.2"]);
    assert_eq!(report.modules_completed, vec![1]);
    assert!(console.transcript().contains("Module 1: Motion finished!"));
    assert_eq!(harness.reload().profile().current_lesson, "2.1");
}

#[test]
fn repeating_a_completed_lesson_does_not_duplicate_it() {
    let harness = Harness::new();
    let mut profile = harness.profile();
    profile.complete_lesson("1.2").expect("complete");
    profile.set_current_lesson("1.2").expect("move");

    let (report, _, _) = harness.run(&mut profile, Vec::new(), &["1", "1", "", "0"]);

    assert_eq!(report.lessons_completed, vec!["1.2"]);
    // 1.1 is still open, so module 1 is not complete.
    assert!(report.modules_completed.is_empty());
    assert_eq!(harness.reload().profile().completed_lessons, vec!["1.2"]);
}

#[test]
fn reset_after_a_session_starts_over() {
    let harness = Harness::new();
    let mut profile = harness.profile();
    let edits = vec![save("this"), save("hello vim")];
    harness.run(&mut profile, edits, &["1", "1", "1", "1", "", "0"]);
    assert_eq!(harness.reload().profile().completed_lessons, vec!["1.1"]);

    let mut stored = harness.reload();
    stored.reset_progress("1.1").expect("reset");

    let reloaded = harness.reload();
    assert!(reloaded.profile().completed_lessons.is_empty());
    assert_eq!(reloaded.profile().current_lesson, "1.1");
    assert_eq!(reloaded.profile().stats, Stats::default());
}

#[test]
fn scratch_files_stay_inside_the_scratch_dir() {
    let harness = Harness::new();
    let mut profile = harness.profile();

    let (_, _, editor) = harness.run(&mut profile, vec![save("nope")], &["1", "0"]);

    let (path, _) = &editor.invocations()[0];
    assert_eq!(path.parent(), Some(harness.temp.path().join("scratch").as_path()));
    let name = path.file_name().and_then(|name| name.to_str()).expect("name");
    assert!(name.starts_with("vimlearn_exercise_"));
    assert!(name.ends_with(".txt"));
    assert!(!path.exists());
}
