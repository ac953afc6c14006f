use chrono::{Days, NaiveDate};
use notifier_core::{
    announcements_notification, cancelled_lessons_notification, grades_notification, Category,
    Detection, LessonItem, Notification, ObservationRecord, Observed, DEFAULT_SUBJECT_PREFIX,
};
use notifier_logging::{notifier_debug, notifier_info};

use crate::source::{PortalConnector, PortalSource};
use crate::store::{StateStore, StoreError};
use crate::transport::Transport;
use crate::{RunError, RunSummary, SourceError};

pub const DEFAULT_LESSON_WINDOW_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledCategories {
    pub grades: bool,
    pub cancelled_lessons: bool,
    pub announcements: bool,
}

impl Default for EnabledCategories {
    fn default() -> Self {
        Self {
            grades: true,
            cancelled_lessons: true,
            announcements: true,
        }
    }
}

impl EnabledCategories {
    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Grades => self.grades,
            Category::CancelledLessons => self.cancelled_lessons,
            Category::Announcements => self.announcements,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub subject_prefix: String,
    pub lesson_window_days: u32,
    pub categories: EnabledCategories,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            lesson_window_days: DEFAULT_LESSON_WINDOW_DAYS,
            categories: EnabledCategories::default(),
        }
    }
}

/// One pass over every enabled category: load, connect, then per category
/// fetch, detect, save, dispatch. The first failure aborts the run.
pub struct Runner {
    store: StateStore,
    transport: Box<dyn Transport>,
    settings: RunSettings,
}

impl Runner {
    pub fn new(store: StateStore, transport: Box<dyn Transport>, settings: RunSettings) -> Self {
        Self {
            store,
            transport,
            settings,
        }
    }

    pub async fn run(
        &self,
        connector: &dyn PortalConnector,
        today: NaiveDate,
    ) -> Result<RunSummary, RunError> {
        let mut record = self.store.load().map_err(|err| match err {
            StoreError::Corrupt { .. } => RunError::CorruptState(err),
            _ => RunError::StateIo(err),
        })?;
        let source = connector.connect().await.map_err(RunError::Connection)?;
        notifier_info!("Connected to the portal");

        let mut summary = RunSummary::default();
        for category in Category::ALL {
            if !self.settings.categories.contains(category) {
                notifier_info!("Skipping {} (disabled)", category);
                continue;
            }
            if self
                .process(category, source.as_ref(), &mut record, today)
                .await?
            {
                summary.notified.push(category);
            }
        }

        if !summary.any_sent() {
            notifier_info!("No notification sent.");
        }
        Ok(summary)
    }

    /// Returns whether a notification went out for `category`.
    async fn process(
        &self,
        category: Category,
        source: &dyn PortalSource,
        record: &mut ObservationRecord,
        today: NaiveDate,
    ) -> Result<bool, RunError> {
        let fetch_failed = |err| RunError::Fetch {
            category,
            source: err,
        };
        let prefix = self.settings.subject_prefix.as_str();

        let notification = match category {
            Category::Announcements => {
                let current = source.announcements().await.map_err(fetch_failed)?;
                let detection = self.detect(record, category, current)?;
                announcements_notification(prefix, &detection.new_items)
            }
            Category::CancelledLessons => {
                let current = self
                    .cancelled_lessons(source, today)
                    .await
                    .map_err(fetch_failed)?;
                let detection = self.detect(record, category, current)?;
                cancelled_lessons_notification(prefix, &detection.new_items)
            }
            Category::Grades => {
                let current = source.current_grades().await.map_err(fetch_failed)?;
                let detection = self.detect(record, category, current)?;
                grades_notification(prefix, &detection.new_items)
            }
        };

        match notification {
            Some(notification) => {
                self.dispatch(&notification).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Detects against the record and saves it before anything is dispatched.
    fn detect<T: Observed>(
        &self,
        record: &mut ObservationRecord,
        category: Category,
        current: Vec<T>,
    ) -> Result<Detection<T>, RunError> {
        notifier_info!("Checking {} ({} current items)", category, current.len());
        let detection = record.detect(category, current);
        if detection.seeded {
            notifier_info!(
                "No known {}: recorded {} identifiers as baseline",
                category,
                record.known(category).len()
            );
        } else {
            notifier_info!("{} new {}", detection.new_items.len(), category);
        }

        if detection.needs_save() {
            self.store
                .save(record)
                .map_err(|source| RunError::Save { category, source })?;
        }
        Ok(detection)
    }

    /// Cancelled lessons over the forward window, in day order.
    async fn cancelled_lessons(
        &self,
        source: &dyn PortalSource,
        today: NaiveDate,
    ) -> Result<Vec<LessonItem>, SourceError> {
        let mut cancelled = Vec::new();
        for offset in 0..self.settings.lesson_window_days {
            let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            let lessons = source.lessons(date).await?;
            notifier_debug!("{}: {} lessons", date, lessons.len());
            cancelled.extend(lessons.into_iter().filter(|lesson| lesson.cancelled));
        }
        Ok(cancelled)
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), RunError> {
        self.transport
            .send(&notification.subject, &notification.body)
            .await
            .map_err(|source| RunError::Dispatch {
                category: notification.category,
                source,
            })?;
        notifier_info!("Notification sent: {}", notification.subject);
        Ok(())
    }
}
