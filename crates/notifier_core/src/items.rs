use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// The three independently tracked kinds of portal updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Grades,
    CancelledLessons,
    Announcements,
}

impl Category {
    /// Processing order of a run.
    pub const ALL: [Category; 3] = [
        Category::Announcements,
        Category::CancelledLessons,
        Category::Grades,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Grades => write!(f, "grades"),
            Category::CancelledLessons => write!(f, "cancelled lessons"),
            Category::Announcements => write!(f, "announcements"),
        }
    }
}

/// Anything whose novelty is decided by a derived string key.
pub trait Observed {
    fn identifier(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeItem {
    pub date: NaiveDate,
    pub subject: String,
    pub coefficient: String,
    pub average: String,
    pub max: String,
    pub min: String,
    pub grade: String,
}

impl Observed for GradeItem {
    /// Date followed by the grade value, e.g. `2024-01-1015`.
    ///
    /// Two grades with the same value on the same day collide.
    fn identifier(&self) -> String {
        format!("{}{}", self.date.format("%Y-%m-%d"), self.grade)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonItem {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub subject: String,
    pub cancelled: bool,
}

impl Observed for LessonItem {
    fn identifier(&self) -> String {
        self.start.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementItem {
    pub title: String,
    pub author: String,
    pub start_date: NaiveDateTime,
    pub content: String,
    pub read: bool,
    pub survey: bool,
}

impl Observed for AnnouncementItem {
    /// Titles only: a title reused later counts as already seen.
    fn identifier(&self) -> String {
        self.title.clone()
    }
}
