//! Course records as they appear in the catalog dataset.
//!
//! The dataset is produced by a study-information system and is loosely
//! typed: optional collections may be missing or `null`, and prerequisite
//! entries distinguish course references from module references only by
//! which identifier field is present. Deserialization normalises both into
//! the explicit shapes defined here.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::language::LocalizedString;

/// Whether a prerequisite group is compulsory or merely recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrerequisiteKind {
    /// The prerequisite must be completed first.
    Compulsory,
    /// The prerequisite is recommended but not required.
    #[serde(alias = "optional")]
    Recommended,
}

impl PrerequisiteKind {
    /// Prefix used when naming the groups of this kind (`C1`, `O1`, ...).
    #[must_use]
    pub const fn group_prefix(self) -> char {
        match self {
            Self::Compulsory => 'C',
            Self::Recommended => 'O',
        }
    }
}

impl fmt::Display for PrerequisiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compulsory => f.write_str("compulsory"),
            Self::Recommended => f.write_str("recommended"),
        }
    }
}

/// A single entry of a prerequisite group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPrerequisite", into = "RawPrerequisite")]
pub enum Prerequisite {
    /// A reference to a course unit by its group ID.
    CourseRef {
        /// Group ID of the referenced course unit.
        group_id: String,
        /// Module group ID given alongside the course reference, if any.
        module_group_id: Option<String>,
    },
    /// A reference to a study module by its group ID.
    ModuleRef(String),
    /// An entry carrying neither kind of reference.
    Unknown,
}

impl Prerequisite {
    /// Creates a course reference.
    pub fn course(group_id: impl Into<String>) -> Self {
        Self::CourseRef {
            group_id: group_id.into(),
            module_group_id: None,
        }
    }

    /// Creates a study-module reference.
    pub fn module(group_id: impl Into<String>) -> Self {
        Self::ModuleRef(group_id.into())
    }
}

/// The wire shape of a prerequisite entry.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrerequisite {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    course_unit_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    module_group_id: Option<String>,
}

impl From<RawPrerequisite> for Prerequisite {
    fn from(raw: RawPrerequisite) -> Self {
        let non_empty = |id: Option<String>| id.filter(|id| !id.is_empty());

        let module_group_id = non_empty(raw.module_group_id);

        match (non_empty(raw.course_unit_group_id), module_group_id) {
            (Some(group_id), module_group_id) => Self::CourseRef {
                group_id,
                module_group_id,
            },
            (None, Some(id)) => Self::ModuleRef(id),
            (None, None) => Self::Unknown,
        }
    }
}

impl From<Prerequisite> for RawPrerequisite {
    fn from(prerequisite: Prerequisite) -> Self {
        match prerequisite {
            Prerequisite::CourseRef {
                group_id,
                module_group_id,
            } => Self {
                kind: Some("CourseUnitPrerequisite".to_string()),
                course_unit_group_id: Some(group_id),
                module_group_id,
            },
            Prerequisite::ModuleRef(id) => Self {
                kind: Some("ModulePrerequisite".to_string()),
                course_unit_group_id: None,
                module_group_id: Some(id),
            },
            Prerequisite::Unknown => Self::default(),
        }
    }
}

/// An ordered set of alternative-or-joint prerequisite entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteGroup {
    /// The entries of the group, in declaration order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prerequisites: Vec<Prerequisite>,
}

impl PrerequisiteGroup {
    /// Creates a group from its entries.
    #[must_use]
    pub const fn new(prerequisites: Vec<Prerequisite>) -> Self {
        Self { prerequisites }
    }

    /// Whether the group has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prerequisites.is_empty()
    }

    /// Iterates over the entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Prerequisite> {
        self.prerequisites.iter()
    }
}

impl FromIterator<Prerequisite> for PrerequisiteGroup {
    fn from_iter<I: IntoIterator<Item = Prerequisite>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A course unit of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Public, human-facing course code (e.g. `COMP.CS.140`).
    pub code: String,

    /// Internal identifier, stable across curriculum periods.
    pub group_id: String,

    /// Version-specific identifier of the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The course name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,

    /// Curriculum periods the course is offered in.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub curriculum_period_ids: Vec<String>,

    /// Prerequisite groups that must be satisfied.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub compulsory_formal_prerequisites: Vec<PrerequisiteGroup>,

    /// Prerequisite groups that are recommended.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recommended_formal_prerequisites: Vec<PrerequisiteGroup>,

    /// Free-text description of the prerequisites.
    #[serde(
        default,
        rename = "prereqisites",
        alias = "prerequisites",
        skip_serializing_if = "Option::is_none"
    )]
    pub prerequisites: Option<LocalizedString>,

    /// Study level, e.g. `basic-studies`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_level: Option<String>,

    /// Course unit type, e.g. `regular`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_unit_type: Option<String>,

    /// Free-text description of equivalent courses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalent_courses_info: Option<LocalizedString>,
}

impl Course {
    /// Creates a course with no prerequisites and no curriculum periods.
    pub fn new(code: impl Into<String>, group_id: impl Into<String>, name: LocalizedString) -> Self {
        Self {
            code: code.into(),
            group_id: group_id.into(),
            id: None,
            name: Some(name),
            curriculum_period_ids: Vec::new(),
            compulsory_formal_prerequisites: Vec::new(),
            recommended_formal_prerequisites: Vec::new(),
            prerequisites: None,
            study_level: None,
            course_unit_type: None,
            equivalent_courses_info: None,
        }
    }

    /// Adds a curriculum period.
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.curriculum_period_ids.push(period.into());
        self
    }

    /// Appends a compulsory prerequisite group.
    #[must_use]
    pub fn with_compulsory(mut self, group: PrerequisiteGroup) -> Self {
        self.compulsory_formal_prerequisites.push(group);
        self
    }

    /// Appends a recommended prerequisite group.
    #[must_use]
    pub fn with_recommended(mut self, group: PrerequisiteGroup) -> Self {
        self.recommended_formal_prerequisites.push(group);
        self
    }

    /// The prerequisite groups of the given kind, in declaration order.
    #[must_use]
    pub fn prerequisite_groups(&self, kind: PrerequisiteKind) -> &[PrerequisiteGroup] {
        match kind {
            PrerequisiteKind::Compulsory => &self.compulsory_formal_prerequisites,
            PrerequisiteKind::Recommended => &self.recommended_formal_prerequisites,
        }
    }

    /// Whether any of the course's curriculum periods contains `period`.
    #[must_use]
    pub fn is_offered_in(&self, period: &str) -> bool {
        self.curriculum_period_ids
            .iter()
            .any(|id| id.contains(period))
    }

    /// Whether the course declares at least one non-empty prerequisite group.
    #[must_use]
    pub fn has_prerequisites(&self) -> bool {
        self.compulsory_formal_prerequisites
            .iter()
            .chain(&self.recommended_formal_prerequisites)
            .any(|group| !group.is_empty())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
