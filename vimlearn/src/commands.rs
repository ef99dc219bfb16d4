//! CLI command implementations.
//!
//! Each command returns a process exit code from [`crate::exit_codes`].
//! Missing users, lessons or editors are reported to the learner and mapped
//! to exit codes; only unexpected failures propagate as errors.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::console::{Console, Tone};
use crate::core::curriculum::Curriculum;
use crate::exit_codes;
use crate::io::config::{TutorConfig, load_config};
use crate::io::editor::Editor;
use crate::io::exercise_runner::ExerciseRunner;
use crate::io::paths::TutorPaths;
use crate::io::profile_store::{ProfileStore, validate_username};
use crate::screens;
use crate::session::Session;

/// Everything a command needs from the data home.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub paths: TutorPaths,
    pub config: TutorConfig,
    pub curriculum: Curriculum,
}

impl CommandContext {
    /// Resolve the data home, then load config and the built-in curriculum.
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let paths = TutorPaths::resolve(home)?;
        debug!(home = %paths.home.display(), "resolved data home");
        let config = load_config(&paths.config_path).context("load config")?;
        let curriculum = Curriculum::builtin()?;
        Ok(Self {
            paths,
            config,
            curriculum,
        })
    }

    pub fn store(&self) -> ProfileStore {
        ProfileStore::new(self.paths.users_dir.clone())
    }
}

/// Options for `vimlearn start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartArgs {
    pub user: Option<String>,
    pub lesson: Option<String>,
}

/// Run a learning session.
pub fn start<E: Editor, C: Console + ?Sized>(
    ctx: &CommandContext,
    args: &StartArgs,
    editor: E,
    console: &mut C,
) -> Result<i32> {
    if !editor.is_available() {
        screens::editor_not_found(console, editor.name())?;
        return Ok(exit_codes::EDITOR_MISSING);
    }

    console.clear()?;
    screens::welcome(console)?;

    let username = match &args.user {
        Some(user) => user.trim().to_string(),
        None => screens::prompt_username(console)?.unwrap_or_default(),
    };
    if username.is_empty() {
        screens::error(console, "username must not be empty")?;
        return Ok(exit_codes::INVALID);
    }
    if let Err(err) = validate_username(&username) {
        screens::error(console, &err.to_string())?;
        return Ok(exit_codes::INVALID);
    }

    // Checked before the profile is touched so an unknown id changes nothing.
    let unknown_lesson = args
        .lesson
        .as_deref()
        .filter(|id| ctx.curriculum.lesson(id).is_none());
    if let Some(lesson) = unknown_lesson {
        screens::error(console, &format!("lesson {lesson} does not exist"))?;
        return Ok(exit_codes::NOT_FOUND);
    }

    let store = ctx.store();
    let mut profile = store.load_or_create(&username, ctx.curriculum.first_lesson_id())?;
    if let Some(lesson) = &args.lesson {
        profile.set_current_lesson(lesson)?;
    }
    info!(username = %username, lesson = %profile.profile().current_lesson, "starting session");

    let runner = ExerciseRunner::new(editor, ctx.config.scratch_dir());
    Session::new(&ctx.curriculum, &mut profile, runner, console).run()?;
    Ok(exit_codes::OK)
}

/// List every module and lesson.
pub fn lessons<C: Console + ?Sized>(ctx: &CommandContext, console: &mut C) -> Result<i32> {
    console.clear()?;
    screens::modules_list(console, &ctx.curriculum, &[])?;
    console.blank()?;
    Ok(exit_codes::OK)
}

/// Show one user's statistics and lesson checklist.
pub fn progress<C: Console + ?Sized>(
    ctx: &CommandContext,
    username: &str,
    console: &mut C,
) -> Result<i32> {
    let Some(stored) = ctx.store().load(username)? else {
        screens::error(console, &format!("user {username} does not exist"))?;
        return Ok(exit_codes::NOT_FOUND);
    };
    let profile = stored.profile();
    console.clear()?;
    screens::progress_stats(console, profile, ctx.curriculum.total_lessons())?;
    screens::modules_list(console, &ctx.curriculum, &profile.completed_lessons)?;
    Ok(exit_codes::OK)
}

/// Reset one user's progress, asking first unless `assume_yes`.
pub fn reset<C: Console + ?Sized>(
    ctx: &CommandContext,
    username: &str,
    assume_yes: bool,
    console: &mut C,
) -> Result<i32> {
    let Some(mut stored) = ctx.store().load(username)? else {
        screens::error(console, &format!("user {username} does not exist"))?;
        return Ok(exit_codes::NOT_FOUND);
    };
    let confirmed = assume_yes
        || screens::confirm(
            console,
            &format!("Reset all progress for user {username}?"),
        )?;
    if !confirmed {
        screens::info(console, "Cancelled.")?;
        return Ok(exit_codes::OK);
    }
    stored.reset_progress(ctx.curriculum.first_lesson_id())?;
    screens::info(console, "Progress reset.")?;
    Ok(exit_codes::OK)
}

/// Print known usernames, one per line.
pub fn users<C: Console + ?Sized>(ctx: &CommandContext, console: &mut C) -> Result<i32> {
    for name in ctx.store().list()? {
        console.line(&name, Tone::Plain)?;
    }
    Ok(exit_codes::OK)
}
