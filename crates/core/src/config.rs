//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses; the binaries
//! read `OUTREACH_DATA_DIR` themselves and hand the result in here.

use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_DATA_DIR, DOCTOR_TARGETS_FILENAME, OTHER_GOALS_FILENAME, PRESENTATIONS_FILENAME,
};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` rooted at the given data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Create a config from an optional override, falling back to the
    /// default data directory relative to the working directory.
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        Self::new(override_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn presentations_path(&self) -> PathBuf {
        self.data_dir.join(PRESENTATIONS_FILENAME)
    }

    pub fn doctor_targets_path(&self) -> PathBuf {
        self.data_dir.join(DOCTOR_TARGETS_FILENAME)
    }

    pub fn other_goals_path(&self) -> PathBuf {
        self.data_dir.join(OTHER_GOALS_FILENAME)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted_at_the_data_dir() {
        let config = CoreConfig::new(PathBuf::from("/tmp/outreach"));
        assert_eq!(
            config.presentations_path(),
            PathBuf::from("/tmp/outreach/presentations.json")
        );
        assert_eq!(
            config.doctor_targets_path(),
            PathBuf::from("/tmp/outreach/doctor_targets.json")
        );
        assert_eq!(
            config.other_goals_path(),
            PathBuf::from("/tmp/outreach/other_goals.json")
        );
    }

    #[test]
    fn resolve_falls_back_to_the_default_dir() {
        let config = CoreConfig::resolve(None);
        assert_eq!(config.data_dir(), Path::new(DEFAULT_DATA_DIR));
    }
}
