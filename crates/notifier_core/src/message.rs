use std::fmt::Write as _;

use crate::{AnnouncementItem, Category, GradeItem, LessonItem};

pub const DEFAULT_SUBJECT_PREFIX: &str = "[PortalNotify]";

/// One outbound message: a whole category batch rendered as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub category: Category,
    pub subject: String,
    pub body: String,
}

pub fn subject_line(prefix: &str, category: Category) -> String {
    let title = match category {
        Category::Grades => "New grade",
        Category::CancelledLessons => "Cancelled lessons",
        Category::Announcements => "New announcement",
    };
    format!("{prefix} {title}")
}

/// Returns `None` for an empty batch; nothing is dispatched then.
pub fn grades_notification(prefix: &str, grades: &[GradeItem]) -> Option<Notification> {
    if grades.is_empty() {
        return None;
    }
    let mut body = String::new();
    for grade in grades {
        let _ = write!(
            body,
            "{}\nOn {}\nCoefficient: {}\nClass average: {}\nMax: {}\nMin: {}\n\n",
            grade.subject,
            grade.date.format("%Y-%m-%d"),
            grade.coefficient,
            grade.average,
            grade.max,
            grade.min,
        );
    }
    Some(Notification {
        category: Category::Grades,
        subject: subject_line(prefix, Category::Grades),
        body,
    })
}

pub fn cancelled_lessons_notification(
    prefix: &str,
    lessons: &[LessonItem],
) -> Option<Notification> {
    if lessons.is_empty() {
        return None;
    }
    let mut body = String::new();
    for lesson in lessons {
        let _ = writeln!(
            body,
            "{} {}h-{}h: {}",
            lesson.start.format("%d/%m/%Y"),
            lesson.start.format("%H"),
            lesson.end.format("%H"),
            lesson.subject,
        );
    }
    Some(Notification {
        category: Category::CancelledLessons,
        subject: subject_line(prefix, Category::CancelledLessons),
        body,
    })
}

pub fn announcements_notification(
    prefix: &str,
    announcements: &[AnnouncementItem],
) -> Option<Notification> {
    if announcements.is_empty() {
        return None;
    }
    let mut body = String::new();
    for announcement in announcements {
        let marker = if announcement.survey { "SURVEY - " } else { "" };
        let _ = write!(
            body,
            "{} - {} - {}{} :\n\n{}\n\n",
            announcement.start_date.format("%Y-%m-%d"),
            announcement.author,
            marker,
            announcement.title,
            announcement.content,
        );
    }
    Some(Notification {
        category: Category::Announcements,
        subject: subject_line(prefix, Category::Announcements),
        body,
    })
}
