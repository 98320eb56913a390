//! Whole-catalog analysis of the prerequisite relation.
//!
//! The tree builder only ever looks at one course at a time. This module
//! views the index as a directed graph (course → prerequisite course) to
//! report problems a catalog maintainer would want to fix: cycles, and course
//! references that do not resolve.

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use serde::Serialize;
use tracing::instrument;

use crate::domain::{
    course::{Prerequisite, PrerequisiteKind},
    index::CourseIndex,
};

/// A course reference that does not resolve in the index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DanglingReference {
    /// Code of the course declaring the prerequisite.
    pub course: String,
    /// The kind of group the reference appears in.
    pub kind: PrerequisiteKind,
    /// The unresolved group ID.
    pub reference: String,
}

/// Counts of prerequisite entries the tree renders as placeholders without
/// them being errors in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    /// Resolved course references.
    pub courses: usize,
    /// Study-module references.
    pub modules: usize,
    /// Entries carrying no reference at all.
    pub unknown: usize,
}

/// The prerequisite relation of a catalog as a directed graph over course
/// codes.
#[derive(Debug)]
pub struct PrerequisiteGraph<'a> {
    index: &'a CourseIndex,
    /// Edges point from a course to its prerequisite.
    graph: DiGraphMap<&'a str, PrerequisiteKind>,
    dangling: Vec<DanglingReference>,
    counts: EntryCounts,
}

impl<'a> PrerequisiteGraph<'a> {
    /// Builds the graph of all retained courses of `index`.
    #[must_use]
    #[instrument(level = "debug", skip_all)]
    pub fn from_index(index: &'a CourseIndex) -> Self {
        let mut graph = DiGraphMap::with_capacity(index.len(), index.len() * 2);
        let mut dangling = Vec::new();
        let mut counts = EntryCounts::default();

        for course in index.courses() {
            let from = course.code.as_str();
            graph.add_node(from);

            for kind in [PrerequisiteKind::Compulsory, PrerequisiteKind::Recommended] {
                for prerequisite in course.prerequisite_groups(kind).iter().flat_map(|group| group.iter()) {
                    match prerequisite {
                        Prerequisite::CourseRef { group_id, .. } => match index.lookup(group_id) {
                            Some(target) => {
                                counts.courses += 1;
                                // A compulsory edge is never downgraded by a
                                // later recommended one.
                                let kind = graph
                                    .edge_weight(from, target.code.as_str())
                                    .map_or(kind, |existing: &PrerequisiteKind| (*existing).min(kind));
                                graph.add_edge(from, target.code.as_str(), kind);
                            }
                            None => dangling.push(DanglingReference {
                                course: course.code.clone(),
                                kind,
                                reference: group_id.clone(),
                            }),
                        },
                        Prerequisite::ModuleRef(_) => counts.modules += 1,
                        Prerequisite::Unknown => counts.unknown += 1,
                    }
                }
            }
        }

        dangling.sort();

        Self {
            index,
            graph,
            dangling,
            counts,
        }
    }

    /// Direct prerequisites of a course, with the strongest kind linking them.
    pub fn prerequisites_of(&self, code: &str) -> impl Iterator<Item = (&'a str, PrerequisiteKind)> + '_ {
        self.node(code)
            .into_iter()
            .flat_map(|key| self.graph.edges(key))
            .map(|(_, target, kind)| (target, *kind))
    }

    /// Courses that list `code` as a direct prerequisite.
    pub fn dependents_of(&self, code: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.node(code).into_iter().flat_map(|key| {
            self.graph
                .neighbors_directed(key, petgraph::Direction::Incoming)
        })
    }

    /// Resolves a code or group ID to the key of its graph node.
    fn node(&self, code: &str) -> Option<&'a str> {
        self.index
            .lookup(code)
            .map(|course| course.code.as_str())
            .filter(|key| self.graph.contains_node(*key))
    }

    /// Whether the prerequisite relation contains a cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }

    /// All cycles, each as a sorted set of course codes.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<&'a str>> {
        let mut cycles = Vec::new();

        for mut component in tarjan_scc(&self.graph) {
            if component.len() > 1 {
                component.sort_unstable();
                cycles.push(component);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if self.graph.contains_edge(node, node) {
                cycles.push(vec![node]);
            }
        }

        cycles.sort();
        cycles
    }

    /// Course references that do not resolve, sorted by declaring course.
    #[must_use]
    pub fn dangling_references(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// How many entries of each kind the catalog contains.
    #[must_use]
    pub const fn entry_counts(&self) -> EntryCounts {
        self.counts
    }

    /// Number of distinct course-to-course links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        course::{Course, PrerequisiteGroup},
        index::PeriodFilter,
        language::LocalizedString,
    };

    fn course(code: &str) -> Course {
        Course::new(code, format!("g-{code}"), LocalizedString::finnish(code))
    }

    fn refs(ids: &[&str]) -> PrerequisiteGroup {
        ids.iter().map(|id| Prerequisite::course(*id)).collect()
    }

    #[test]
    fn acyclic_catalog_has_no_cycles() {
        let index = CourseIndex::build(
            [course("A").with_compulsory(refs(&["g-B"])), course("B")],
            &PeriodFilter::All,
        );
        let graph = PrerequisiteGraph::from_index(&index);

        assert!(!graph.has_cycles());
        assert_eq!(
            graph.prerequisites_of("A").collect::<Vec<_>>(),
            [("B", PrerequisiteKind::Compulsory)]
        );
        assert_eq!(graph.dependents_of("B").collect::<Vec<_>>(), ["A"]);
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn reports_cycles_and_self_loops() {
        let index = CourseIndex::build(
            [
                course("C").with_compulsory(refs(&["g-A"])),
                course("A").with_compulsory(refs(&["g-B"])),
                course("B").with_recommended(refs(&["g-C"])),
                course("S").with_compulsory(refs(&["S"])),
                course("D").with_compulsory(refs(&["g-A"])),
            ],
            &PeriodFilter::All,
        );
        let graph = PrerequisiteGraph::from_index(&index);

        assert_eq!(graph.cycles(), vec![vec!["A", "B", "C"], vec!["S"]]);
    }

    #[test]
    fn collects_dangling_references_and_counts_entries() {
        let group = PrerequisiteGroup::new(vec![
            Prerequisite::course("g-B"),
            Prerequisite::course("missing"),
            Prerequisite::module("sm-1"),
            Prerequisite::Unknown,
        ]);
        let index = CourseIndex::build(
            [course("A").with_recommended(group), course("B")],
            &PeriodFilter::All,
        );
        let graph = PrerequisiteGraph::from_index(&index);

        assert_eq!(
            graph.dangling_references(),
            [DanglingReference {
                course: "A".to_string(),
                kind: PrerequisiteKind::Recommended,
                reference: "missing".to_string(),
            }]
        );
        assert_eq!(
            graph.entry_counts(),
            EntryCounts {
                courses: 1,
                modules: 1,
                unknown: 1,
            }
        );
    }

    #[test]
    fn compulsory_link_wins_over_recommended() {
        let index = CourseIndex::build(
            [
                course("A")
                    .with_compulsory(refs(&["g-B"]))
                    .with_recommended(refs(&["g-B"])),
                course("B"),
            ],
            &PeriodFilter::All,
        );
        let graph = PrerequisiteGraph::from_index(&index);

        assert_eq!(
            graph.prerequisites_of("A").collect::<Vec<_>>(),
            [("B", PrerequisiteKind::Compulsory)]
        );
    }

    #[test]
    fn unknown_course_has_no_neighbours() {
        let index = CourseIndex::build([course("A")], &PeriodFilter::All);
        let graph = PrerequisiteGraph::from_index(&index);

        assert_eq!(graph.prerequisites_of("Z").count(), 0);
        assert_eq!(graph.dependents_of("Z").count(), 0);
    }
}
