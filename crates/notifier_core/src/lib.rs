//! Notifier core: portal items, the observation record, change detection and
//! message formatting. Pure, no IO.
mod detect;
mod items;
mod message;
mod record;

pub use detect::{detect, Baseline, Detection};
pub use items::{AnnouncementItem, Category, GradeItem, LessonItem, Observed};
pub use message::{
    announcements_notification, cancelled_lessons_notification, grades_notification,
    subject_line, Notification, DEFAULT_SUBJECT_PREFIX,
};
pub use record::{KnownIds, ObservationRecord};
