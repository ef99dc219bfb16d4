//! Curriculum data types.
//!
//! These types mirror the authored curriculum document. Once a [`Curriculum`]
//! has been validated they are never mutated again.
//!
//! [`Curriculum`]: crate::core::curriculum::Curriculum

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// A single graded editing task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exercise {
    pub instruction: String,
    /// Text written to the scratch file before the editor opens.
    pub initial: String,
    /// Text the saved file must match (after normalization).
    pub expected: String,
    pub hint: String,
    /// Editor commands this exercise practices, in teaching order.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Character offset within the first line where the cursor starts.
    #[serde(default)]
    pub cursor: Option<usize>,
}

/// A lesson: explanation text plus an ordered list of exercises.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lesson {
    /// `"<module>.<lesson>"`, unique across the curriculum.
    pub id: String,
    pub title: String,
    /// Title of the containing module (filled in from the module).
    #[serde(skip)]
    pub module: String,
    /// Number of the containing module (filled in from the module).
    #[serde(skip)]
    pub module_num: u32,
    pub description: String,
    pub explanation: String,
    pub exercises: Vec<Exercise>,
    /// Optional "why is it designed this way" text.
    #[serde(default)]
    pub rationale: Option<String>,
}

impl Lesson {
    /// Lesson number within its module, parsed from the id.
    pub fn lesson_num(&self) -> Option<u32> {
        parse_lesson_id(&self.id).map(|(_, lesson)| lesson)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
    /// 1-based module number.
    pub number: u32,
    pub title: String,
    pub description: String,
    pub lessons: Vec<Lesson>,
}

static LESSON_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)$").unwrap());

/// Split a lesson id such as `"2.3"` into `(module, lesson)`.
///
/// Returns `None` for anything that is not two period-separated integers.
pub fn parse_lesson_id(id: &str) -> Option<(u32, u32)> {
    let caps = LESSON_ID_RE.captures(id)?;
    let module = caps[1].parse().ok()?;
    let lesson = caps[2].parse().ok()?;
    Some((module, lesson))
}
