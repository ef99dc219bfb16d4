//! User profile persistence (`users/<username>.json`) with schema and
//! semantic validation on load and write-through saves.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use jsonschema::validator_for;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::profile::{AttemptRecord, ExerciseAttempts, UserProfile};

const PROFILE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/user_profile.schema.json"
));

/// Usernames double as file stems: `[A-Za-z0-9._-]`, not starting with `.`.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(anyhow!("username must not be empty"));
    }
    if username.starts_with('.') {
        return Err(anyhow!("username must not start with '.' (got '{username}')"));
    }
    if username
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        return Err(anyhow!(
            "username must be [A-Za-z0-9._-] only (got '{username}')"
        ));
    }
    Ok(())
}

/// Directory of per-user JSON records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    users_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(users_dir: impl Into<PathBuf>) -> Self {
        Self {
            users_dir: users_dir.into(),
        }
    }

    pub fn users_dir(&self) -> &Path {
        &self.users_dir
    }

    pub fn path_for(&self, username: &str) -> Result<PathBuf> {
        validate_username(username)?;
        Ok(self.users_dir.join(format!("{username}.json")))
    }

    /// Load a profile, or `None` when the user has no record.
    pub fn load(&self, username: &str) -> Result<Option<StoredProfile>> {
        let path = self.path_for(username)?;
        if !path.exists() {
            debug!(username, "no profile on disk");
            return Ok(None);
        }
        let profile = read_profile(&path, username)?;
        debug!(username, current_lesson = %profile.current_lesson, "profile loaded");
        Ok(Some(StoredProfile {
            store: self.clone(),
            profile,
        }))
    }

    /// Load a profile, creating and saving a fresh one when absent.
    pub fn load_or_create(&self, username: &str, first_lesson_id: &str) -> Result<StoredProfile> {
        if let Some(stored) = self.load(username)? {
            return Ok(stored);
        }
        let mut profile = UserProfile::new(username, first_lesson_id, Utc::now());
        self.save(&mut profile)?;
        info!(username, "created profile");
        Ok(StoredProfile {
            store: self.clone(),
            profile,
        })
    }

    /// Known usernames, sorted. A missing users directory means none.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.users_dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.users_dir)
            .with_context(|| format!("read users dir {}", self.users_dir.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("read users dir {}", self.users_dir.display()))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let stem = path.file_stem().and_then(|stem| stem.to_str());
            if let Some(stem) = stem.filter(|stem| validate_username(stem).is_ok()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Stamp `last_active` and write the full record atomically.
    pub fn save(&self, profile: &mut UserProfile) -> Result<()> {
        let path = self.path_for(&profile.username)?;
        profile.last_active = Utc::now();
        let mut buf = serde_json::to_string_pretty(profile).context("serialize profile")?;
        buf.push('\n');
        debug!(path = %path.display(), "writing profile");
        write_atomic(&path, &buf)
    }
}

/// A loaded profile bound to its store. Every mutator saves before returning.
#[derive(Debug, Clone)]
pub struct StoredProfile {
    store: ProfileStore,
    profile: UserProfile,
}

impl StoredProfile {
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    /// Mark a lesson complete. Returns false if it already was.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> Result<bool> {
        let added = self.profile.complete_lesson(lesson_id);
        self.save()?;
        if added {
            info!(username = %self.profile.username, lesson_id, "lesson completed");
        }
        Ok(added)
    }

    pub fn record(&mut self, record: AttemptRecord) -> Result<()> {
        self.profile.record(record);
        self.save()
    }

    /// Record a judged run of the exercise tracked by `attempts`.
    pub fn record_exercise(&mut self, attempts: &mut ExerciseAttempts, passed: bool) -> Result<()> {
        self.record(attempts.record(passed))
    }

    /// Count a run that does not start a new exercise.
    pub fn record_attempt(&mut self) -> Result<()> {
        self.record(AttemptRecord::Retry)
    }

    pub fn set_current_lesson(&mut self, lesson_id: &str) -> Result<()> {
        self.profile.set_current_lesson(lesson_id);
        self.save()
    }

    pub fn reset_progress(&mut self, first_lesson_id: &str) -> Result<()> {
        self.profile.reset(first_lesson_id);
        self.save()?;
        info!(username = %self.profile.username, "progress reset");
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.store.save(&mut self.profile)
    }
}

fn read_profile(path: &Path, username: &str) -> Result<UserProfile> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read profile {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse profile {}", path.display()))?;
    validate_schema(&value).with_context(|| format!("validate profile {}", path.display()))?;
    let profile: UserProfile = serde_json::from_value(value)
        .with_context(|| format!("deserialize profile {}", path.display()))?;
    if profile.username != username {
        return Err(anyhow!(
            "profile {} belongs to '{}', expected '{username}'",
            path.display(),
            profile.username
        ));
    }
    let errors = profile.validate();
    if !errors.is_empty() {
        return Err(anyhow!(
            "profile {} is inconsistent: {}",
            path.display(),
            errors.join("; ")
        ));
    }
    Ok(profile)
}

fn validate_schema(profile: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(PROFILE_SCHEMA).context("parse profile schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(profile) {
        let messages = compiled
            .iter_errors(profile)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "profile schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("profile path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp profile {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace profile {}", path.display()))?;
    Ok(())
}
