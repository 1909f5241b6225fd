use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OutreachError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create data directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read state file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write state file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize state: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize state: {0}")]
    Deserialization(serde_json::Error),
    #[error("no presentation with id {0}")]
    UnknownPresentation(Uuid),
    #[error("no goal with id `{0}`")]
    UnknownGoal(String),
    #[error("goal `{0}` has no checklist")]
    NotAChecklistGoal(String),
    #[error("no checklist item `{item_id}` in goal `{goal_id}`")]
    UnknownChecklistItem { goal_id: String, item_id: String },
    #[error("specialty cannot be empty")]
    EmptySpecialty,
    #[error("a target for specialty `{0}` already exists")]
    DuplicateSpecialty(String),
}

pub type OutreachResult<T> = std::result::Result<T, OutreachError>;
