use crate::{Category, KnownIds, ObservationRecord, Observed};

/// What to do when a category has never been observed before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// An empty set is filled with every current identifier and nothing is reported.
    SeedWhenEmpty,
    /// Unknown identifiers are always reported, even on the first run.
    ReportAll,
}

impl Baseline {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Grades | Category::Announcements => Baseline::SeedWhenEmpty,
            // The lesson scan only looks forward, there is no history to flood.
            Category::CancelledLessons => Baseline::ReportAll,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection<T> {
    pub new_items: Vec<T>,
    pub seeded: bool,
}

impl<T> Detection<T> {
    /// Whether the updated identifiers must be written back.
    pub fn needs_save(&self) -> bool {
        self.seeded || !self.new_items.is_empty()
    }
}

/// Pure change detection: partitions `current` against `known` and returns
/// the grown identifier set together with the items that were not known.
///
/// Source order is preserved. `known` is never shrunk.
pub fn detect<T: Observed>(
    mut known: KnownIds,
    current: Vec<T>,
    baseline: Baseline,
) -> (KnownIds, Detection<T>) {
    if baseline == Baseline::SeedWhenEmpty && known.is_empty() {
        known.extend(current.iter().map(Observed::identifier));
        return (
            known,
            Detection {
                new_items: Vec::new(),
                seeded: true,
            },
        );
    }

    let new_items = current
        .into_iter()
        .filter(|item| known.insert(item.identifier()))
        .collect();

    (
        known,
        Detection {
            new_items,
            seeded: false,
        },
    )
}

impl ObservationRecord {
    /// Runs [`detect`] against the identifier set of `category`, updating it in place.
    pub fn detect<T: Observed>(&mut self, category: Category, current: Vec<T>) -> Detection<T> {
        let known = std::mem::take(self.known_mut(category));
        let (known, detection) = detect(known, current, Baseline::for_category(category));
        *self.known_mut(category) = known;
        detection
    }
}
