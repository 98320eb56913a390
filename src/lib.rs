//! Course Prerequisite Trees
//!
//! Builds a display tree of a course's compulsory and recommended
//! prerequisites from a flat course catalog.

pub mod domain;
pub use domain::{
    Config, Course, CourseIndex, DisplayNode, Language, LocalizedString, PeriodFilter,
    Prerequisite, PrerequisiteGroup, PrerequisiteKind, TreeBuilder,
};

/// Loading course catalogs from disk.
pub mod storage;
pub use storage::{Catalog, LoadError};
