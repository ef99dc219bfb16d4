//! Per-user progress record and the statistics rules that update it.
//!
//! Everything here is pure; persistence lives in `io::profile_store`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exercise counters. `total_attempts >= total_exercises >= successful_first_try`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Exercises run at least once.
    pub total_exercises: u32,
    /// Exercises whose very first run succeeded.
    pub successful_first_try: u32,
    /// Every run, including retries.
    pub total_attempts: u32,
}

/// What a single run contributes to [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptRecord {
    /// First run of an exercise visit.
    FirstRun { passed: bool },
    /// Any later run of the same visit.
    Retry,
}

impl Stats {
    pub fn apply(&mut self, record: AttemptRecord) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if let AttemptRecord::FirstRun { passed } = record {
            self.total_exercises = self.total_exercises.saturating_add(1);
            if passed {
                self.successful_first_try = self.successful_first_try.saturating_add(1);
            }
        }
    }

    /// Share of exercises passed on the first run, in percent.
    pub fn first_try_rate(&self) -> Option<f64> {
        if self.total_exercises == 0 {
            return None;
        }
        Some(f64::from(self.successful_first_try) / f64::from(self.total_exercises) * 100.0)
    }

    pub fn is_consistent(&self) -> bool {
        self.total_attempts >= self.total_exercises
            && self.total_exercises >= self.successful_first_try
    }
}

/// Tracks runs of one exercise during one visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExerciseAttempts {
    runs: u32,
}

impl ExerciseAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the run that just finished.
    pub fn record(&mut self, passed: bool) -> AttemptRecord {
        self.runs += 1;
        if self.runs == 1 {
            AttemptRecord::FirstRun { passed }
        } else {
            AttemptRecord::Retry
        }
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }
}

/// Persisted learner record (`users/<username>.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub current_lesson: String,
    pub completed_lessons: Vec<String>,
    pub stats: Stats,
}

impl UserProfile {
    pub fn new(username: &str, first_lesson_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            created_at: now,
            last_active: now,
            current_lesson: first_lesson_id.to_string(),
            completed_lessons: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Mark a lesson complete. Returns false if it already was.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> bool {
        if self.is_completed(lesson_id) {
            return false;
        }
        self.completed_lessons.push(lesson_id.to_string());
        true
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|id| id == lesson_id)
    }

    pub fn record(&mut self, record: AttemptRecord) {
        self.stats.apply(record);
    }

    pub fn set_current_lesson(&mut self, lesson_id: &str) {
        self.current_lesson = lesson_id.to_string();
    }

    /// Back to a fresh record; `username` and `created_at` survive.
    pub fn reset(&mut self, first_lesson_id: &str) {
        self.current_lesson = first_lesson_id.to_string();
        self.completed_lessons.clear();
        self.stats = Stats::default();
    }

    pub fn progress_percentage(&self, total_lessons: usize) -> f64 {
        if total_lessons == 0 {
            return 0.0;
        }
        self.completed_lessons.len() as f64 / total_lessons as f64 * 100.0
    }

    /// Semantic checks the JSON Schema cannot express.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.stats.is_consistent() {
            errors.push(format!(
                "stats must satisfy total_attempts >= total_exercises >= successful_first_try (got {} / {} / {})",
                self.stats.total_attempts,
                self.stats.total_exercises,
                self.stats.successful_first_try
            ));
        }
        for (index, id) in self.completed_lessons.iter().enumerate() {
            if self.completed_lessons[..index].contains(id) {
                errors.push(format!("duplicate completed lesson '{id}'"));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile() -> UserProfile {
        UserProfile::new("ada", "1.1", Utc::now())
    }

    #[test]
    fn first_run_success_counts_as_first_try() {
        let mut stats = Stats::default();
        let mut attempts = ExerciseAttempts::new();
        stats.apply(attempts.record(true));
        assert_eq!(
            stats,
            Stats {
                total_exercises: 1,
                successful_first_try: 1,
                total_attempts: 1,
            }
        );
    }

    #[test]
    fn failure_then_retry_success_counts_exercise_once() {
        let mut stats = Stats::default();
        let mut attempts = ExerciseAttempts::new();
        stats.apply(attempts.record(false));
        stats.apply(attempts.record(true));
        assert_eq!(
            stats,
            Stats {
                total_exercises: 1,
                successful_first_try: 0,
                total_attempts: 2,
            }
        );
        assert_eq!(attempts.runs(), 2);
    }

    #[test]
    fn counters_stay_ordered_over_mixed_runs() {
        let mut stats = Stats::default();
        let visits: [&[bool]; 4] = [&[true], &[false, false, true], &[false], &[true]];
        for outcomes in visits {
            let mut attempts = ExerciseAttempts::new();
            for passed in outcomes {
                stats.apply(attempts.record(*passed));
                assert!(stats.is_consistent());
            }
        }
        assert_eq!(stats.total_exercises, 4);
        assert_eq!(stats.successful_first_try, 2);
        assert_eq!(stats.total_attempts, 6);
        assert_eq!(stats.first_try_rate(), Some(50.0));
    }

    #[test]
    fn first_try_rate_is_absent_without_exercises() {
        assert_eq!(Stats::default().first_try_rate(), None);
    }

    #[test]
    fn complete_lesson_is_idempotent() {
        let mut profile = profile();
        assert!(profile.complete_lesson("1.1"));
        assert!(!profile.complete_lesson("1.1"));
        assert_eq!(profile.completed_lessons, vec!["1.1".to_string()]);
    }

    #[test]
    fn reset_keeps_identity_and_clears_progress() {
        let mut profile = profile();
        let created_at = profile.created_at;
        profile.complete_lesson("1.1");
        profile.set_current_lesson("1.2");
        profile.record(AttemptRecord::FirstRun { passed: true });

        profile.reset("1.1");
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.created_at, created_at);
        assert_eq!(profile.current_lesson, "1.1");
        assert!(profile.completed_lessons.is_empty());
        assert_eq!(profile.stats, Stats::default());
    }

    #[test]
    fn progress_percentage_handles_empty_curriculum() {
        let mut profile = profile();
        assert_eq!(profile.progress_percentage(0), 0.0);
        profile.complete_lesson("1.1");
        assert_eq!(profile.progress_percentage(4), 25.0);
    }

    #[test]
    fn counters_saturate_instead_of_overflowing() {
        let mut stats = Stats {
            total_exercises: u32::MAX,
            successful_first_try: u32::MAX,
            total_attempts: u32::MAX,
        };
        stats.apply(AttemptRecord::FirstRun { passed: true });
        stats.apply(AttemptRecord::Retry);
        assert_eq!(stats.total_attempts, u32::MAX);
        assert_eq!(stats.total_exercises, u32::MAX);
        assert_eq!(stats.successful_first_try, u32::MAX);
        assert!(stats.is_consistent());
    }

    #[test]
    fn validate_flags_inconsistent_stats_and_duplicates() {
        let mut profile = profile();
        profile.stats = Stats {
            total_exercises: 2,
            successful_first_try: 3,
            total_attempts: 1,
        };
        profile.completed_lessons = vec!["1.1".into(), "1.2".into(), "1.1".into()];

        let errors = profile.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("total_attempts >= total_exercises"));
        assert!(errors[1].contains("duplicate completed lesson '1.1'"));
    }
}
