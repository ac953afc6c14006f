use std::collections::BTreeSet;

use crate::Category;

/// Grow-only set of identifiers already seen for one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KnownIds {
    ids: BTreeSet<String>,
}

impl KnownIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` when the identifier was not known before.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KnownIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for KnownIds {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

/// Every identifier observed by any previous run, one set per category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObservationRecord {
    known_grades: KnownIds,
    known_cancelled_lessons: KnownIds,
    known_announcement_titles: KnownIds,
}

impl ObservationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        known_grades: KnownIds,
        known_cancelled_lessons: KnownIds,
        known_announcement_titles: KnownIds,
    ) -> Self {
        Self {
            known_grades,
            known_cancelled_lessons,
            known_announcement_titles,
        }
    }

    pub fn known(&self, category: Category) -> &KnownIds {
        match category {
            Category::Grades => &self.known_grades,
            Category::CancelledLessons => &self.known_cancelled_lessons,
            Category::Announcements => &self.known_announcement_titles,
        }
    }

    pub(crate) fn known_mut(&mut self, category: Category) -> &mut KnownIds {
        match category {
            Category::Grades => &mut self.known_grades,
            Category::CancelledLessons => &mut self.known_cancelled_lessons,
            Category::Announcements => &mut self.known_announcement_titles,
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL
            .iter()
            .all(|category| self.known(*category).is_empty())
    }
}
