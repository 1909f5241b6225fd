//! Durable state stores.
//!
//! Two independent pieces of state are persisted as JSON under the data
//! directory: the presentation log (`presentations.json`) and the goal state
//! (`doctor_targets.json` and `other_goals.json`, two independent keys so
//! either half can be reset on its own). A missing file is never an error;
//! it means "first use", which seeds the defaults for goals and an empty
//! log for presentations.
//!
//! The goal store is a trait so the tracker logic stays independently
//! testable with an in-memory implementation; production code uses
//! [`JsonGoalStore`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{OutreachError, OutreachResult};
use crate::goals::{default_doctor_targets, default_other_goals, GoalState, GoalTarget, OtherGoal};
use crate::record::{PresentationDraft, PresentationRecord};

/// Durable storage for [`GoalState`], injected into the service.
pub trait GoalStateStore {
    /// Loads the goal state, seeding defaults for any missing half.
    fn load(&self) -> OutreachResult<GoalState>;
    /// Persists the whole goal state.
    fn save(&self, state: &GoalState) -> OutreachResult<()>;
}

/// Reads and deserializes a JSON file, treating a missing file as `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> OutreachResult<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(OutreachError::FileRead(err)),
    };
    let value = serde_json::from_str(&contents).map_err(OutreachError::Deserialization)?;
    Ok(Some(value))
}

/// Serializes a value as pretty JSON and writes it to `path`.
fn write_json<T: Serialize>(path: &Path, value: &T) -> OutreachResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(OutreachError::Serialization)?;
    fs::write(path, json).map_err(OutreachError::FileWrite)
}

/// File-backed [`GoalStateStore`] writing the two goal collections to
/// independent JSON files.
#[derive(Clone, Debug)]
pub struct JsonGoalStore {
    data_dir: PathBuf,
    doctor_targets_path: PathBuf,
    other_goals_path: PathBuf,
}

impl JsonGoalStore {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            data_dir: config.data_dir().to_path_buf(),
            doctor_targets_path: config.doctor_targets_path(),
            other_goals_path: config.other_goals_path(),
        }
    }
}

impl GoalStateStore for JsonGoalStore {
    fn load(&self) -> OutreachResult<GoalState> {
        let doctor_targets = match read_json::<Vec<GoalTarget>>(&self.doctor_targets_path)? {
            Some(targets) => targets,
            None => {
                tracing::info!("no doctor targets on disk, seeding defaults");
                default_doctor_targets()
            }
        };
        let other_goals = match read_json::<Vec<OtherGoal>>(&self.other_goals_path)? {
            Some(goals) => goals,
            None => {
                tracing::info!("no freeform goals on disk, seeding defaults");
                default_other_goals()
            }
        };
        Ok(GoalState {
            doctor_targets,
            other_goals,
        })
    }

    fn save(&self, state: &GoalState) -> OutreachResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(OutreachError::StorageDirCreation)?;
        write_json(&self.doctor_targets_path, &state.doctor_targets)?;
        write_json(&self.other_goals_path, &state.other_goals)
    }
}

/// File-backed storage for the presentation log.
///
/// The log is small (one team's yearly presentations), so every operation
/// reads and rewrites the whole collection, mirroring how the hosted-table
/// collaborator hands the collection over as a whole.
#[derive(Clone, Debug)]
pub struct PresentationStore {
    data_dir: PathBuf,
    path: PathBuf,
}

impl PresentationStore {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            data_dir: config.data_dir().to_path_buf(),
            path: config.presentations_path(),
        }
    }

    /// Loads the full presentation log; a missing file is an empty log.
    pub fn load(&self) -> OutreachResult<Vec<PresentationRecord>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Persists the full presentation log.
    pub fn save(&self, records: &[PresentationRecord]) -> OutreachResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(OutreachError::StorageDirCreation)?;
        write_json(&self.path, &records)
    }

    /// Assigns a fresh id to the draft and prepends it to the log
    /// (newest-first, matching the intake form's behaviour).
    pub fn add(&self, draft: PresentationDraft) -> OutreachResult<PresentationRecord> {
        let record = draft.into_record();
        let mut records = self.load()?;
        records.insert(0, record.clone());
        self.save(&records)?;
        Ok(record)
    }

    /// Replaces every field of an existing record, keeping its id.
    pub fn update(
        &self,
        id: Uuid,
        draft: PresentationDraft,
    ) -> OutreachResult<PresentationRecord> {
        let mut records = self.load()?;
        let slot = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(OutreachError::UnknownPresentation(id))?;
        let mut record = draft.into_record();
        record.id = id;
        *slot = record.clone();
        self.save(&records)?;
        Ok(record)
    }

    /// Deletes a record from the log.
    pub fn remove(&self, id: Uuid) -> OutreachResult<()> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(OutreachError::UnknownPresentation(id));
        }
        self.save(&records)
    }
}
