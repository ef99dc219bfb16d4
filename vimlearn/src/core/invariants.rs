//! Structural invariants of an authored curriculum.

use std::collections::HashSet;

use crate::core::types::{Exercise, Module, parse_lesson_id};

/// Check curriculum invariants:
/// - At least one module
/// - Module numbers contiguous from 1, each module non-empty
/// - Lesson ids are `<module>.<lesson>`, agree with the containing module,
///   and lesson numbers are contiguous from 1
/// - Lesson ids unique across the curriculum
/// - Every lesson has at least one exercise
/// - Exercise cursor offsets fall within the first line of the initial text
pub fn validate_invariants(modules: &[Module]) -> Vec<String> {
    let mut errors = Vec::new();
    if modules.is_empty() {
        errors.push("curriculum must contain at least one module".to_string());
    }

    let mut seen = HashSet::new();
    for (index, module) in modules.iter().enumerate() {
        let expected_number = index as u32 + 1;
        if module.number != expected_number {
            errors.push(format!(
                "module {}: expected module number {}",
                module.number, expected_number
            ));
        }
        if module.lessons.is_empty() {
            errors.push(format!("module {}: must contain lessons", module.number));
        }
        validate_module_lessons(module, &mut seen, &mut errors);
    }
    errors
}

fn validate_module_lessons(module: &Module, seen: &mut HashSet<String>, errors: &mut Vec<String>) {
    for (index, lesson) in module.lessons.iter().enumerate() {
        if !seen.insert(lesson.id.clone()) {
            errors.push(format!("duplicate lesson id '{}'", lesson.id));
        }

        match parse_lesson_id(&lesson.id) {
            Some((module_num, lesson_num)) => {
                if module_num != module.number {
                    errors.push(format!(
                        "lesson {}: id names module {} but lives in module {}",
                        lesson.id, module_num, module.number
                    ));
                }
                let expected = index as u32 + 1;
                if lesson_num != expected {
                    errors.push(format!(
                        "lesson {}: expected lesson number {}",
                        lesson.id, expected
                    ));
                }
            }
            None => errors.push(format!(
                "lesson '{}': id must be <module>.<lesson>",
                lesson.id
            )),
        }

        if lesson.exercises.is_empty() {
            errors.push(format!("lesson {}: must contain exercises", lesson.id));
        }

        for (position, exercise) in lesson.exercises.iter().enumerate() {
            if !cursor_in_first_line(exercise) {
                errors.push(format!(
                    "lesson {} exercise {}: cursor {:?} outside first line",
                    lesson.id,
                    position + 1,
                    exercise.cursor
                ));
            }
        }
    }
}

/// An empty first line only admits offset 0.
fn cursor_in_first_line(exercise: &Exercise) -> bool {
    let Some(offset) = exercise.cursor else {
        return true;
    };
    let first_line = exercise.initial.split('\n').next().unwrap_or_default();
    let width = first_line.chars().count();
    offset < width.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{exercise, lesson, module};

    #[test]
    fn valid_curriculum_has_no_errors() {
        let modules = vec![
            module(1, vec![lesson("1.1"), lesson("1.2")]),
            module(2, vec![lesson("2.1")]),
        ];
        assert!(validate_invariants(&modules).is_empty());
    }

    #[test]
    fn empty_curriculum_is_rejected() {
        let errors = validate_invariants(&[]);
        assert!(errors.iter().any(|err| err.contains("at least one module")));
    }

    #[test]
    fn reports_numbering_and_id_errors() {
        let modules = vec![
            module(1, vec![lesson("1.1"), lesson("1.3"), lesson("2.3")]),
            module(3, vec![lesson("x"), lesson("1.1")]),
        ];

        let errors = validate_invariants(&modules);
        assert!(errors.iter().any(|err| err.contains("expected lesson number 2")));
        assert!(errors.iter().any(|err| err.contains("lives in module 1")));
        assert!(errors.iter().any(|err| err.contains("expected module number 2")));
        assert!(errors.iter().any(|err| err.contains("must be <module>.<lesson>")));
        assert!(errors.iter().any(|err| err.contains("duplicate lesson id '1.1'")));
    }

    #[test]
    fn reports_empty_module_and_lesson() {
        let mut bare = lesson("1.1");
        bare.exercises.clear();
        let modules = vec![module(1, vec![bare]), module(2, Vec::new())];

        let errors = validate_invariants(&modules);
        assert!(errors.iter().any(|err| err.contains("1.1: must contain exercises")));
        assert!(errors.iter().any(|err| err.contains("module 2: must contain lessons")));
    }

    #[test]
    fn cursor_must_stay_on_first_line() {
        let mut far = exercise("abc\nlonger line", "abc");
        far.cursor = Some(3);
        let mut last = exercise("abc", "abc");
        last.cursor = Some(2);
        let mut empty = exercise("", "x");
        empty.cursor = Some(0);

        assert!(!cursor_in_first_line(&far));
        assert!(cursor_in_first_line(&last));
        assert!(cursor_in_first_line(&empty));
    }
}
