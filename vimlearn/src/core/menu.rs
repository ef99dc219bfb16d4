//! Per-exercise menu protocol as a pure state machine.
//!
//! The session controller feeds learner input through [`transition`] and
//! performs the returned [`Effect`]. Running the exercise is the only effect
//! that changes which menu is showing; that happens through [`after_run`].

/// Which menu is on screen for the current exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Primary menu before any run.
    Prompting,
    /// Success menu after a passing run.
    Succeeded,
    /// Retry menu after a failing run.
    Retrying,
    Done(ExerciseEnd),
}

/// How an exercise visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseEnd {
    Passed,
    Skipped,
    ForcePassed,
    /// Ends the whole session.
    Quit,
}

/// Learner choices across all menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run,
    Hint,
    Rationale,
    Skip,
    ForcePass,
    Next,
    Quit,
}

/// Side effect the controller performs after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Run the exercise, then call [`after_run`].
    Run,
    ShowHint,
    ShowRationale,
    /// Input matched no option of the current menu.
    Invalid,
    Finish(ExerciseEnd),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub key: char,
    pub label: &'static str,
    pub choice: Choice,
}

const fn option(key: char, label: &'static str, choice: Choice) -> MenuOption {
    MenuOption { key, label, choice }
}

/// Key that quits from every menu.
pub const QUIT_KEY: char = '0';

const PROMPTING_OPTIONS: &[MenuOption] = &[
    option('1', "Start exercise", Choice::Run),
    option('2', "Show hint", Choice::Hint),
    option('3', "Why this design", Choice::Rationale),
    option('4', "Skip", Choice::Skip),
    option(QUIT_KEY, "Quit", Choice::Quit),
];

const SUCCEEDED_OPTIONS: &[MenuOption] = &[
    option('1', "Next", Choice::Next),
    option('2', "Show hint", Choice::Hint),
    option('3', "Why this design", Choice::Rationale),
    option(QUIT_KEY, "Quit", Choice::Quit),
];

const RETRYING_OPTIONS: &[MenuOption] = &[
    option('1', "Retry", Choice::Run),
    option('2', "Show hint", Choice::Hint),
    option('4', "Skip", Choice::Skip),
    option('5', "Force pass", Choice::ForcePass),
    option(QUIT_KEY, "Quit", Choice::Quit),
];

/// Options offered in `state`; empty once the visit is done.
pub fn options(state: MenuState) -> &'static [MenuOption] {
    match state {
        MenuState::Prompting => PROMPTING_OPTIONS,
        MenuState::Succeeded => SUCCEEDED_OPTIONS,
        MenuState::Retrying => RETRYING_OPTIONS,
        MenuState::Done(_) => &[],
    }
}

/// Map raw input (trimmed, case-insensitive) to a choice valid in `state`.
pub fn parse_choice(state: MenuState, input: &str) -> Option<Choice> {
    let normalized = input.trim().to_lowercase();
    let mut chars = normalized.chars();
    let key = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    options(state)
        .iter()
        .find(|opt| opt.key == key)
        .map(|opt| opt.choice)
}

pub fn transition(state: MenuState, input: &str) -> (MenuState, Effect) {
    if let MenuState::Done(end) = state {
        return (state, Effect::Finish(end));
    }
    let Some(choice) = parse_choice(state, input) else {
        return (state, Effect::Invalid);
    };
    match choice {
        Choice::Run => (state, Effect::Run),
        Choice::Hint => (state, Effect::ShowHint),
        Choice::Rationale => (state, Effect::ShowRationale),
        Choice::Skip => finish(ExerciseEnd::Skipped),
        Choice::ForcePass => finish(ExerciseEnd::ForcePassed),
        Choice::Next => finish(ExerciseEnd::Passed),
        Choice::Quit => finish(ExerciseEnd::Quit),
    }
}

/// Menu to show once a run has been judged.
pub fn after_run(passed: bool) -> MenuState {
    if passed {
        MenuState::Succeeded
    } else {
        MenuState::Retrying
    }
}

fn finish(end: ExerciseEnd) -> (MenuState, Effect) {
    (MenuState::Done(end), Effect::Finish(end))
}
