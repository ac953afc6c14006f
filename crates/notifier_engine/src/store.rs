use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use notifier_core::{Category, KnownIds, ObservationRecord};
use notifier_logging::{notifier_debug, notifier_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_STATE_FILENAME: &str = "notifier_state.ron";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file {path:?} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("failed to read state file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to serialize state: {0}")]
    Serialize(String),
    #[error("failed to write state: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedRecord {
    #[serde(default)]
    grades: BTreeSet<String>,
    #[serde(default)]
    cancelled_lessons: BTreeSet<String>,
    #[serde(default)]
    announcement_titles: BTreeSet<String>,
}

impl PersistedRecord {
    fn from_record(record: &ObservationRecord) -> Self {
        let ids = |category: Category| {
            record
                .known(category)
                .iter()
                .map(ToOwned::to_owned)
                .collect::<BTreeSet<_>>()
        };
        Self {
            grades: ids(Category::Grades),
            cancelled_lessons: ids(Category::CancelledLessons),
            announcement_titles: ids(Category::Announcements),
        }
    }

    fn into_record(self) -> ObservationRecord {
        ObservationRecord::from_parts(
            self.grades.into_iter().collect::<KnownIds>(),
            self.cancelled_lessons.into_iter().collect::<KnownIds>(),
            self.announcement_titles.into_iter().collect::<KnownIds>(),
        )
    }
}

/// The persisted observation record: one RON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct StateStore {
    writer: AtomicFileWriter,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }

    /// Loads the record, creating an empty state file when none exists yet.
    pub fn load(&self) -> Result<ObservationRecord, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                notifier_info!("No state file at {:?}, creating an empty record", path);
                let record = ObservationRecord::new();
                self.save(&record)?;
                return Ok(record);
            }
            Err(err) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let persisted: PersistedRecord =
            ron::from_str(&content).map_err(|err| StoreError::Corrupt {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        notifier_debug!(
            "Loaded state from {:?}: {} grades, {} cancelled lessons, {} announcements",
            path,
            persisted.grades.len(),
            persisted.cancelled_lessons.len(),
            persisted.announcement_titles.len()
        );
        Ok(persisted.into_record())
    }

    pub fn save(&self, record: &ObservationRecord) -> Result<(), StoreError> {
        let persisted = PersistedRecord::from_record(record);
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&persisted, pretty)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;

        self.writer.write(&content)?;
        notifier_info!("State saved to {:?}", self.path());
        Ok(())
    }
}
