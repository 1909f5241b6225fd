//! Constants used throughout the outreach core crate.
//!
//! This module contains path and filename constants to ensure consistency
//! across the codebase and make maintenance easier.

/// Default directory for outreach data storage when none is configured.
pub const DEFAULT_DATA_DIR: &str = "outreach_data";

/// Filename for the serialized presentation log.
pub const PRESENTATIONS_FILENAME: &str = "presentations.json";

/// Filename for the serialized doctor specialty targets.
pub const DOCTOR_TARGETS_FILENAME: &str = "doctor_targets.json";

/// Filename for the serialized freeform goals.
pub const OTHER_GOALS_FILENAME: &str = "other_goals.json";

/// Organisation name stamped into the CSV export's HLC column.
pub const DEFAULT_HLC_NAME: &str = "St Vincent HLC";
