//! Domain models for prerequisite trees.
//!
//! This module contains the course records, the course index, the display
//! tree and the algorithm that builds one from the other.

mod config;
pub use config::Config;

/// Course records and prerequisite entries.
pub mod course;
pub use course::{Course, Prerequisite, PrerequisiteGroup, PrerequisiteKind};

/// Whole-catalog graph analysis.
pub mod graph;
pub use graph::{DanglingReference, EntryCounts, PrerequisiteGraph};

mod index;
pub use index::{CourseIndex, PeriodFilter};

/// Bilingual text and language selection.
pub mod language;
pub use language::{Language, LocalizedString};

mod node;
pub use node::{DisplayNode, NO_DATA, NodeAttributes, NodeKind};

mod tree;
pub use tree::{TreeBuilder, collapse};
