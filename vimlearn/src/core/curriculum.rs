//! Curriculum store: ordered modules, lessons, and exercises.
//!
//! Global lesson order is module order, then lesson order within the module.
//! "Next lesson" and "previous lesson" walk that flattened sequence.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::invariants::validate_invariants;
use crate::core::types::{Lesson, Module};

const BUILTIN_CURRICULUM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/curriculum/lessons.toml"
));

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CurriculumDoc {
    modules: Vec<Module>,
}

/// Where a lesson sits in the curriculum, for progress headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonPosition {
    pub module_num: u32,
    pub total_modules: usize,
    /// 1-based ordinal of the lesson within its module.
    pub lesson_num: usize,
    pub lessons_in_module: usize,
    pub total_lessons: usize,
}

/// Validated, immutable curriculum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    modules: Vec<Module>,
}

impl Curriculum {
    /// Build a curriculum, filling in each lesson's module fields and
    /// checking every structural invariant.
    pub fn new(mut modules: Vec<Module>) -> Result<Self> {
        for module in &mut modules {
            for lesson in &mut module.lessons {
                lesson.module = module.title.clone();
                lesson.module_num = module.number;
            }
        }
        let errors = validate_invariants(&modules);
        if !errors.is_empty() {
            bail!("curriculum invariant violations:\n- {}", errors.join("\n- "));
        }
        Ok(Self { modules })
    }

    /// Parse a curriculum from its TOML document form.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let doc: CurriculumDoc = toml::from_str(raw).context("parse curriculum toml")?;
        Self::new(doc.modules)
    }

    /// The curriculum compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CURRICULUM).context("load built-in curriculum")
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, number: u32) -> Option<&Module> {
        self.modules.iter().find(|module| module.number == number)
    }

    /// Lessons of one module, or an empty slice for an unknown module.
    pub fn module_lessons(&self, number: u32) -> &[Lesson] {
        self.module(number)
            .map(|module| module.lessons.as_slice())
            .unwrap_or_default()
    }

    /// All lessons in global order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|module| module.lessons.iter())
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons().find(|lesson| lesson.id == id)
    }

    /// Id of the very first lesson. Construction guarantees one exists.
    pub fn first_lesson_id(&self) -> &str {
        &self.modules[0].lessons[0].id
    }

    pub fn next_lesson_id(&self, id: &str) -> Option<&str> {
        let index = self.lesson_index(id)?;
        self.lessons().nth(index + 1).map(|lesson| lesson.id.as_str())
    }

    pub fn previous_lesson_id(&self, id: &str) -> Option<&str> {
        let index = self.lesson_index(id)?;
        let previous = index.checked_sub(1)?;
        self.lessons().nth(previous).map(|lesson| lesson.id.as_str())
    }

    pub fn total_lessons(&self) -> usize {
        self.lessons().count()
    }

    pub fn total_modules(&self) -> usize {
        self.modules.len()
    }

    pub fn position(&self, id: &str) -> Option<LessonPosition> {
        let lesson = self.lesson(id)?;
        let module_lessons = self.module_lessons(lesson.module_num);
        let index = module_lessons.iter().position(|l| l.id == id)?;
        Some(LessonPosition {
            module_num: lesson.module_num,
            total_modules: self.total_modules(),
            lesson_num: index + 1,
            lessons_in_module: module_lessons.len(),
            total_lessons: self.total_lessons(),
        })
    }

    /// True when every lesson of `module_num` appears in `completed`.
    pub fn is_module_complete(&self, module_num: u32, completed: &[String]) -> bool {
        let lessons = self.module_lessons(module_num);
        !lessons.is_empty()
            && lessons
                .iter()
                .all(|lesson| completed.iter().any(|id| *id == lesson.id))
    }

    fn lesson_index(&self, id: &str) -> Option<usize> {
        self.lessons().position(|lesson| lesson.id == id)
    }
}
