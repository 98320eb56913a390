//! Lookup of courses by group ID or course code.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::course::Course;

/// Which curriculum periods count as currently active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PeriodFilter {
    /// Retain every course.
    #[default]
    All,
    /// Retain courses with a curriculum period ID containing this substring.
    Containing(String),
}

impl PeriodFilter {
    /// Whether the course passes the filter.
    #[must_use]
    pub fn retains(&self, course: &Course) -> bool {
        match self {
            Self::All => true,
            Self::Containing(period) => course.is_offered_in(period),
        }
    }
}

/// An immutable index over the retained courses of a catalog.
///
/// Every retained course is reachable both by its `groupId` and by its
/// `code`. The two namespaces share a single key space; if a key is
/// inserted twice the later course wins.
#[derive(Debug, Clone, Default)]
pub struct CourseIndex {
    /// Retained courses, in catalog order.
    courses: Vec<Course>,

    /// Key (group ID or code) to position in `courses`.
    keys: HashMap<String, usize>,
}

impl CourseIndex {
    /// Builds an index from the raw catalog, keeping only the courses that
    /// pass `filter`.
    #[instrument(level = "debug", skip(courses))]
    pub fn build(courses: impl IntoIterator<Item = Course>, filter: &PeriodFilter) -> Self {
        let mut total = 0usize;
        let courses: Vec<Course> = courses
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|course| filter.retains(course))
            .collect();

        let mut keys = HashMap::with_capacity(courses.len() * 2);
        for (position, course) in courses.iter().enumerate() {
            for key in [&course.group_id, &course.code] {
                if let Some(previous) = keys.insert(key.clone(), position) {
                    if previous != position {
                        debug!(
                            key = key.as_str(),
                            replaced = courses[previous].code.as_str(),
                            by = course.code.as_str(),
                            "duplicate course key"
                        );
                    }
                }
            }
        }

        debug!(retained = courses.len(), total, "built course index");

        Self { courses, keys }
    }

    /// Looks up a course by group ID or course code.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Course> {
        self.keys.get(key).map(|&position| &self.courses[position])
    }

    /// Whether `key` resolves to a course.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// The codes of the retained courses, in catalog order.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.courses.iter().map(|course| course.code.as_str())
    }

    /// The retained courses, in catalog order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// The number of retained courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether no course was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
