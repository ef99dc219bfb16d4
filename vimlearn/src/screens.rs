//! Learner-facing screens composed over the [`Console`] port.

use anyhow::Result;

use crate::console::{Column, Console, Panel, Table, Tone};
use crate::core::curriculum::{Curriculum, LessonPosition};
use crate::core::menu::{self, MenuState};
use crate::core::profile::UserProfile;
use crate::core::types::{Exercise, Lesson, Module};

const PROGRESS_BAR_WIDTH: usize = 20;
const EMPTY_TEXT: &str = "(empty file)";

const WELCOME: &str = "\
Welcome to vimlearn!

This is an interactive Vim tutor. Each lesson explains a set of commands,
then you practise them in a real Vim session.

How it works:
  1. Read the lesson explanation
  2. Look at the exercise's starting text and target text
  3. Press 1 to open the exercise in Vim
  4. Edit, then save and quit (:wq)
  5. Your result is checked automatically

Ready? Let's go!";

/// `filled` blocks out of `width`, e.g. `█████░░░░░` for 50%.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((width as f64) * clamped / 100.0).floor() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn or_empty(text: &str) -> &str {
    if text.is_empty() { EMPTY_TEXT } else { text }
}

pub fn welcome<C: Console + ?Sized>(console: &mut C) -> Result<()> {
    console.panel(&Panel::titled("vimlearn", WELCOME, Tone::Accent).double())
}

/// Session header: user, overall progress, module and lesson ordinals.
pub fn header<C: Console + ?Sized>(
    console: &mut C,
    profile: &UserProfile,
    position: &LessonPosition,
) -> Result<()> {
    let percentage = profile.progress_percentage(position.total_lessons);
    let body = format!(
        "vimlearn - interactive Vim lessons\nUser: {}    Progress: {} {:.0}%\nNow: module {}/{}  |  lesson {}/{}",
        profile.username,
        progress_bar(percentage, PROGRESS_BAR_WIDTH),
        percentage,
        position.module_num,
        position.total_modules,
        position.lesson_num,
        position.lessons_in_module,
    );
    console.panel(&Panel::new(body, Tone::Accent))
}

/// Lesson title lines followed by the explanation panel.
pub fn lesson_intro<C: Console + ?Sized>(console: &mut C, lesson: &Lesson) -> Result<()> {
    console.blank()?;
    console.line(
        &format!("[Module {}] {}", lesson.module_num, lesson.module),
        Tone::Heading,
    )?;
    console.line(
        &format!("[Lesson {}] {}", lesson.id, lesson.title),
        Tone::Success,
    )?;
    console.blank()?;
    console.panel(&Panel::titled(
        "Explanation",
        lesson.explanation.trim(),
        Tone::Accent,
    ))
}

/// Exercise card. `number` is 1-based.
pub fn exercise<C: Console + ?Sized>(
    console: &mut C,
    exercise: &Exercise,
    number: usize,
    total: usize,
) -> Result<()> {
    console.blank()?;
    console.line(
        &format!("Exercise {number}/{total}: {}", exercise.instruction),
        Tone::Heading,
    )?;
    console.blank()?;
    console.line("Starting text:", Tone::Dim)?;
    console.panel(&Panel::new(or_empty(&exercise.initial), Tone::Plain))?;
    console.line("Target text:", Tone::Dim)?;
    console.panel(&Panel::new(or_empty(&exercise.expected), Tone::Success))?;
    if !exercise.commands.is_empty() {
        console.line(
            &format!("Commands: {}", exercise.commands.join("  ")),
            Tone::Accent,
        )?;
    }
    Ok(())
}

pub fn hint<C: Console + ?Sized>(console: &mut C, hint: &str) -> Result<()> {
    console.blank()?;
    console.panel(&Panel::titled("Hint", hint, Tone::Warning))
}

/// The lesson's design rationale, or a notice when it has none.
pub fn rationale<C: Console + ?Sized>(console: &mut C, rationale: Option<&str>) -> Result<()> {
    match rationale {
        Some(text) => {
            console.blank()?;
            console.panel(&Panel::titled("Why it works this way", text.trim(), Tone::Warning))
        }
        None => info(console, "This lesson has no design notes."),
    }
}

/// Options for the menu shown in `state`.
pub fn menu<C: Console + ?Sized>(console: &mut C, state: MenuState) -> Result<()> {
    console.menu(menu::options(state))
}

pub fn success<C: Console + ?Sized>(console: &mut C) -> Result<()> {
    console.blank()?;
    console.panel(&Panel::new("Exercise complete!", Tone::Success))
}

/// Mismatch notice with the learner's text beside the target.
pub fn failure<C: Console + ?Sized>(console: &mut C, actual: &str, expected: &str) -> Result<()> {
    console.blank()?;
    console.panel(&Panel::new("Not a match yet, try again.", Tone::Failure))?;
    console.blank()?;
    let table = Table::new(
        vec![
            Column::new("Your result", Tone::Failure, Some(30)),
            Column::new("Expected", Tone::Success, Some(30)),
        ],
        true,
    )
    .row([
        if actual.is_empty() { "(empty)" } else { actual },
        if expected.is_empty() { "(empty)" } else { expected },
    ]);
    console.table(&table)
}

pub fn force_passed<C: Console + ?Sized>(console: &mut C) -> Result<()> {
    info(console, "Exercise marked as passed.")
}

pub fn invalid_choice<C: Console + ?Sized>(console: &mut C, input: &str) -> Result<()> {
    console.line(
        &format!("'{}' is not one of the options above.", input.trim()),
        Tone::Warning,
    )
}

pub fn lesson_complete<C: Console + ?Sized>(console: &mut C, lesson: &Lesson) -> Result<()> {
    console.blank()?;
    console.panel(
        &Panel::new(
            format!("Lesson {}: {} complete!", lesson.id, lesson.title),
            Tone::Success,
        )
        .double(),
    )
}

pub fn module_complete<C: Console + ?Sized>(console: &mut C, module: &Module) -> Result<()> {
    console.blank()?;
    console.panel(
        &Panel::new(
            format!("Module {}: {} finished!", module.number, module.title),
            Tone::Warning,
        )
        .double(),
    )
}

pub fn all_complete<C: Console + ?Sized>(console: &mut C) -> Result<()> {
    console.blank()?;
    console.panel(
        &Panel::new("Congratulations, you have finished every lesson!", Tone::Heading).double(),
    )
}

/// Every module with its lessons; completed lessons are ticked.
pub fn modules_list<C: Console + ?Sized>(
    console: &mut C,
    curriculum: &Curriculum,
    completed: &[String],
) -> Result<()> {
    for module in curriculum.modules() {
        console.blank()?;
        console.line(
            &format!("[Module {}] {}", module.number, module.title),
            Tone::Heading,
        )?;
        console.line(&format!("  {}", module.description), Tone::Dim)?;
        for lesson in &module.lessons {
            if completed.contains(&lesson.id) {
                console.line(&format!("  ✓ {}: {}", lesson.id, lesson.title), Tone::Success)?;
            } else {
                console.line(&format!("    {}: {}", lesson.id, lesson.title), Tone::Plain)?;
            }
        }
    }
    Ok(())
}

/// Statistics table for `progress`.
pub fn progress_stats<C: Console + ?Sized>(
    console: &mut C,
    profile: &UserProfile,
    total_lessons: usize,
) -> Result<()> {
    console.blank()?;
    console.panel(
        &Panel::new(format!("Progress - {}", profile.username), Tone::Accent).double(),
    )?;
    let stats = &profile.stats;
    let mut table = Table::new(
        vec![
            Column::new("Item", Tone::Dim, Some(22)),
            Column::new("Value", Tone::Plain, None),
        ],
        false,
    )
    .row([
        "Lessons completed".to_string(),
        format!("{} / {total_lessons}", profile.completed_lessons.len()),
    ])
    .row([
        "Progress".to_string(),
        format!("{:.1}%", profile.progress_percentage(total_lessons)),
    ])
    .row(["Current lesson".to_string(), profile.current_lesson.clone()])
    .row(["Exercises".to_string(), stats.total_exercises.to_string()])
    .row([
        "Passed first try".to_string(),
        stats.successful_first_try.to_string(),
    ])
    .row(["Total attempts".to_string(), stats.total_attempts.to_string()]);
    if let Some(rate) = stats.first_try_rate() {
        table = table.row(["First-try rate".to_string(), format!("{rate:.1}%")]);
    }
    console.table(&table)
}

/// Help shown when the configured editor cannot be found.
pub fn editor_not_found<C: Console + ?Sized>(console: &mut C, program: &str) -> Result<()> {
    let body = format!(
        "Editor '{program}' was not found. Make sure Vim is installed and on your PATH.\n\n\
         Install:\n  macOS:   brew install vim\n  Ubuntu:  sudo apt install vim\n  Windows: install gvim or use WSL\n\n\
         A different editor can be set under [editor] in config.toml."
    );
    console.panel(&Panel::new(body, Tone::Failure))
}

pub fn error<C: Console + ?Sized>(console: &mut C, message: &str) -> Result<()> {
    console.line(&format!("Error: {message}"), Tone::Failure)
}

pub fn info<C: Console + ?Sized>(console: &mut C, message: &str) -> Result<()> {
    console.line(message, Tone::Accent)
}

/// Ask for a username; `None` at end of input.
pub fn prompt_username<C: Console + ?Sized>(console: &mut C) -> Result<Option<String>> {
    console.blank()?;
    Ok(console
        .read_line("Username: ")?
        .map(|name| name.trim().to_string()))
}

/// Read a menu choice. End of input reads as quit.
pub fn prompt_choice<C: Console + ?Sized>(console: &mut C) -> Result<String> {
    Ok(console
        .read_line("Choose > ")?
        .map(|choice| choice.trim().to_lowercase())
        .unwrap_or_else(|| menu::QUIT_KEY.to_string()))
}

/// Yes/no question; only `y` or `yes` confirm.
pub fn confirm<C: Console + ?Sized>(console: &mut C, question: &str) -> Result<bool> {
    let answer = console.read_line(&format!("{question} (y/n): "))?;
    Ok(answer
        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false))
}

pub fn wait_for_key<C: Console + ?Sized>(console: &mut C) -> Result<()> {
    console.blank()?;
    console.read_line("Press Enter to continue...")?;
    Ok(())
}
