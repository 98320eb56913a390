//! Prerequisite tree construction.
//!
//! A [`TreeBuilder`] turns one course of a [`CourseIndex`] into a tree of
//! [`DisplayNode`]s. The prerequisite relation between courses is a graph
//! which may share sub-courses or even contain cycles; the builder unwinds it
//! into a tree by resolving every reference afresh. Courses already on the
//! current path are not expanded again, which bounds the recursion on cyclic
//! catalogs.
//!
//! Shape of a tree:
//!
//! ```text
//! Programming 2                      root (no attributes)
//! ├── Group C1                       one node per non-empty group ...
//! │   └── Programming 1              ... resolved course references
//! └── Group O1
//!     └── Introduction to Databases
//! ```
//!
//! When a course has exactly one non-empty group, the group layer is
//! collapsed and the group's entries become direct children.

use tracing::{instrument, trace};

use crate::domain::{
    course::{Course, Prerequisite, PrerequisiteGroup, PrerequisiteKind},
    index::CourseIndex,
    language::{self, Language},
    node::{DisplayNode, NO_DATA},
};

/// Builds prerequisite trees over an immutable course index.
///
/// The builder holds no mutable state, so a single instance can serve any
/// number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    index: &'a CourseIndex,
    language: Language,
}

impl<'a> TreeBuilder<'a> {
    /// Creates a builder that names nodes in `language`.
    #[must_use]
    pub const fn new(index: &'a CourseIndex, language: Language) -> Self {
        Self { index, language }
    }

    /// The index courses are resolved against.
    #[must_use]
    pub const fn index(&self) -> &'a CourseIndex {
        self.index
    }

    /// The preferred display language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Builds the prerequisite tree for the course with the given code (or
    /// group ID).
    ///
    /// Returns the "No data" sentinel if the course is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn build_tree(&self, code: &str) -> DisplayNode {
        let Some(course) = self.index.lookup(code) else {
            trace!(code, "course not found");
            return DisplayNode::empty_tree();
        };

        let mut path = vec![course.group_id.as_str()];
        let children = collapse(self.subtree(course, &mut path));

        DisplayNode::root(self.display_name(course), children)
    }

    /// Builds one group node per non-empty prerequisite group of `course`:
    /// compulsory groups first (`Group C1`, ...), then recommended groups
    /// (`Group O1`, ...). Groups are numbered by their declared position.
    #[must_use]
    pub fn build_subtree(&self, course: &Course) -> Vec<DisplayNode> {
        let mut path = vec![course.group_id.as_str()];
        self.subtree(course, &mut path)
    }

    /// Resolves each entry of `group` into a display node, preserving order.
    #[must_use]
    pub fn resolve_group(&self, group: &PrerequisiteGroup, kind: PrerequisiteKind) -> Vec<DisplayNode> {
        let mut path = Vec::new();
        self.resolve(group, kind, &mut path)
    }

    fn subtree<'p>(&self, course: &'p Course, path: &mut Vec<&'p str>) -> Vec<DisplayNode>
    where
        'a: 'p,
    {
        let mut nodes = Vec::new();

        for kind in [PrerequisiteKind::Compulsory, PrerequisiteKind::Recommended] {
            // Groups keep their declared position, so skipped empty groups
            // leave a gap in the numbering.
            let groups = course
                .prerequisite_groups(kind)
                .iter()
                .enumerate()
                .filter(|(_, group)| !group.is_empty());

            for (position, group) in groups {
                let name = format!("Group {}{}", kind.group_prefix(), position + 1);
                let children = self.resolve(group, kind, path);
                nodes.push(DisplayNode::group(name, kind, children));
            }
        }

        nodes
    }

    fn resolve<'p>(
        &self,
        group: &'p PrerequisiteGroup,
        kind: PrerequisiteKind,
        path: &mut Vec<&'p str>,
    ) -> Vec<DisplayNode>
    where
        'a: 'p,
    {
        group
            .iter()
            .map(|prerequisite| self.resolve_entry(prerequisite, kind, path))
            .collect()
    }

    fn resolve_entry<'p>(
        &self,
        prerequisite: &'p Prerequisite,
        kind: PrerequisiteKind,
        path: &mut Vec<&'p str>,
    ) -> DisplayNode
    where
        'a: 'p,
    {
        match prerequisite {
            Prerequisite::CourseRef {
                group_id,
                module_group_id,
            } => match self.index.lookup(group_id) {
                Some(course) => self.course_node(course, kind, path),
                None => {
                    trace!(group_id = group_id.as_str(), "unresolved course reference");
                    DisplayNode::leaf(module_group_id.as_deref().unwrap_or(NO_DATA))
                }
            },
            Prerequisite::ModuleRef(module_group_id) => DisplayNode::leaf(module_group_id.as_str()),
            Prerequisite::Unknown => DisplayNode::leaf(NO_DATA),
        }
    }

    fn course_node<'p>(
        &self,
        course: &'a Course,
        kind: PrerequisiteKind,
        path: &mut Vec<&'p str>,
    ) -> DisplayNode
    where
        'a: 'p,
    {
        let name = self.display_name(course);

        if path.contains(&course.group_id.as_str()) {
            trace!(code = course.code.as_str(), "cyclic prerequisite reference");
            return DisplayNode::course(
                format!("Cyclic reference: {name}"),
                course.code.as_str(),
                kind,
                None,
            );
        }

        path.push(course.group_id.as_str());
        let children = collapse(self.subtree(course, path));
        path.pop();

        DisplayNode::course(name, course.code.as_str(), kind, Some(children))
    }

    fn display_name<'c>(&self, course: &'c Course) -> &'c str {
        language::select(course.name.as_ref(), self.language)
    }
}

/// Replaces a lone group node by its own children.
///
/// A subtree with zero or several group nodes is returned unchanged.
#[must_use]
pub fn collapse(mut subtree: Vec<DisplayNode>) -> Vec<DisplayNode> {
    if subtree.len() == 1 && subtree[0].is_group() {
        if let Some(group) = subtree.pop() {
            return group.children.unwrap_or_default();
        }
    }
    subtree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        index::PeriodFilter,
        language::LocalizedString,
        node::{NodeAttributes, NodeKind},
    };

    fn course(code: &str) -> Course {
        Course::new(
            code,
            format!("g-{code}"),
            LocalizedString::new(format!("{code} fi"), format!("{code} en")),
        )
    }

    fn refs(codes: &[&str]) -> PrerequisiteGroup {
        codes
            .iter()
            .map(|code| Prerequisite::course(format!("g-{code}")))
            .collect()
    }

    fn index(courses: Vec<Course>) -> CourseIndex {
        CourseIndex::build(courses, &PeriodFilter::All)
    }

    fn names(nodes: &[DisplayNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.name.as_str()).collect()
    }

    #[test]
    fn unknown_root_yields_sentinel() {
        let index = index(vec![course("X")]);
        let tree = TreeBuilder::new(&index, Language::Fi).build_tree("NOPE");

        assert_eq!(tree, DisplayNode::empty_tree());
        assert_eq!(tree.name, NO_DATA);
        assert!(tree.children.is_none());
        assert!(tree.attributes.is_none());
    }

    #[test]
    fn root_is_named_in_preferred_language() {
        let index = index(vec![course("X")]);

        let finnish = TreeBuilder::new(&index, Language::Fi).build_tree("X");
        let english = TreeBuilder::new(&index, Language::En).build_tree("X");

        assert_eq!(finnish.name, "X fi");
        assert_eq!(english.name, "X en");
        assert!(english.attributes.is_none());
        assert_eq!(english.children, Some(Vec::new()));
    }

    #[test]
    fn root_resolves_by_group_id() {
        let index = index(vec![course("X")]);
        let tree = TreeBuilder::new(&index, Language::En).build_tree("g-X");

        assert_eq!(tree.name, "X en");
    }

    #[test]
    fn single_group_collapses_at_every_level() {
        let x = course("X").with_compulsory(refs(&["Y"]));
        let index = index(vec![x, course("Y")]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");

        let expected = DisplayNode::root(
            "X en",
            vec![DisplayNode {
                name: "Y en".to_string(),
                children: Some(Vec::new()),
                attributes: Some(NodeAttributes {
                    node: Some(NodeKind::Course),
                    code: Some("Y".to_string()),
                    kind: Some(PrerequisiteKind::Compulsory),
                }),
            }],
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn nested_single_group_is_collapsed_inside_course_nodes() {
        let x = course("X").with_compulsory(refs(&["Y"]));
        let y = course("Y").with_recommended(refs(&["Z", "W"]));
        let index = index(vec![x, y, course("Z"), course("W")]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");
        let y_node = &tree.children()[0];

        assert_eq!(names(y_node.children()), ["Z en", "W en"]);
        assert!(y_node
            .children()
            .iter()
            .all(|node| node.prerequisite_kind() == Some(PrerequisiteKind::Recommended)));
    }

    #[test]
    fn several_groups_are_kept_with_compulsory_first() {
        let x = course("X")
            .with_recommended(refs(&["R"]))
            .with_compulsory(refs(&["A"]))
            .with_compulsory(refs(&["B"]));
        let index = index(vec![x, course("A"), course("B"), course("R")]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");

        assert_eq!(names(tree.children()), ["Group C1", "Group C2", "Group O1"]);
        let kinds: Vec<_> = tree
            .children()
            .iter()
            .map(DisplayNode::prerequisite_kind)
            .collect();
        assert_eq!(
            kinds,
            [
                Some(PrerequisiteKind::Compulsory),
                Some(PrerequisiteKind::Compulsory),
                Some(PrerequisiteKind::Recommended),
            ]
        );
        assert!(tree.children().iter().all(DisplayNode::is_group));
        assert_eq!(names(tree.children()[2].children()), ["R en"]);
    }

    #[test]
    fn empty_groups_are_skipped_but_keep_their_number() {
        let x = course("X")
            .with_compulsory(PrerequisiteGroup::default())
            .with_compulsory(refs(&["A"]))
            .with_recommended(refs(&["B"]));
        let index = index(vec![x, course("A"), course("B")]);

        let x = index.lookup("X").unwrap();
        let subtree = TreeBuilder::new(&index, Language::En).build_subtree(x);

        assert_eq!(names(&subtree), ["Group C2", "Group O1"]);
    }

    #[test]
    fn groups_are_numbered_by_declared_position() {
        let x = course("X")
            .with_compulsory(PrerequisiteGroup::default())
            .with_compulsory(refs(&["A"]))
            .with_compulsory(refs(&["B"]));
        let index = index(vec![x, course("A"), course("B")]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");

        assert_eq!(names(tree.children()), ["Group C2", "Group C3"]);
        assert_eq!(names(tree.children()[1].children()), ["B en"]);
    }

    #[test]
    fn only_empty_groups_yield_no_children() {
        let x = course("X").with_compulsory(PrerequisiteGroup::default());
        let index = index(vec![x]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");

        assert_eq!(tree.children, Some(Vec::new()));
    }

    #[test]
    fn unresolved_course_reference_falls_back_to_module_id() {
        let entry: Prerequisite = serde_json::from_value(serde_json::json!({
            "courseUnitGroupId": "ZZZ",
            "moduleGroupId": "sm-9",
        }))
        .unwrap();
        let group = PrerequisiteGroup::new(vec![entry]);
        let index = index(vec![course("A")]);

        let nodes = TreeBuilder::new(&index, Language::Fi)
            .resolve_group(&group, PrerequisiteKind::Compulsory);

        assert_eq!(names(&nodes), ["sm-9"]);
        assert!(nodes[0].children.is_none());
    }

    #[test]
    fn resolve_group_preserves_order_and_duplicates() {
        let index = index(vec![course("A"), course("B")]);
        let group = refs(&["B", "A", "B"]);

        let nodes = TreeBuilder::new(&index, Language::En)
            .resolve_group(&group, PrerequisiteKind::Compulsory);

        assert_eq!(names(&nodes), ["B en", "A en", "B en"]);
        assert_eq!(nodes[0].code(), Some("B"));
    }

    #[test]
    fn unresolvable_entries_become_placeholder_leaves() {
        let group = PrerequisiteGroup::new(vec![
            Prerequisite::course("ZZZ"),
            Prerequisite::course("g-A"),
            Prerequisite::module("tut-sm-g-7"),
            Prerequisite::Unknown,
        ]);
        let index = index(vec![course("A")]);

        let nodes = TreeBuilder::new(&index, Language::Fi)
            .resolve_group(&group, PrerequisiteKind::Recommended);

        assert_eq!(names(&nodes), [NO_DATA, "A fi", "tut-sm-g-7", NO_DATA]);
        for leaf in [&nodes[0], &nodes[2], &nodes[3]] {
            assert!(leaf.children.is_none());
            assert!(leaf.attributes.is_none());
        }
    }

    #[test]
    fn shared_prerequisites_are_expanded_in_every_branch() {
        let x = course("X")
            .with_compulsory(refs(&["A"]))
            .with_compulsory(refs(&["B"]));
        let a = course("A").with_compulsory(refs(&["S"]));
        let b = course("B").with_compulsory(refs(&["S"]));
        let s = course("S").with_compulsory(refs(&["T"]));
        let index = index(vec![x, a, b, s, course("T")]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");

        for group in tree.children() {
            let shared = &group.children()[0].children()[0];
            assert_eq!(shared.code(), Some("S"));
            assert_eq!(names(shared.children()), ["T en"]);
        }
        assert_eq!(tree.node_count(), 9);
    }

    #[test]
    fn cycles_terminate_with_marked_leaf() {
        let a = course("A").with_compulsory(refs(&["B"]));
        let b = course("B").with_compulsory(refs(&["A"]));
        let index = index(vec![a, b]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("A");

        let b_node = &tree.children()[0];
        assert_eq!(b_node.code(), Some("B"));
        let back = &b_node.children()[0];
        assert_eq!(back.name, "Cyclic reference: A en");
        assert_eq!(back.code(), Some("A"));
        assert!(back.children.is_none());
    }

    #[test]
    fn self_reference_is_cyclic() {
        let a = course("A").with_compulsory(refs(&["A", "B"]));
        let index = index(vec![a, course("B")]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("A");

        assert_eq!(
            names(tree.children()),
            ["Cyclic reference: A en", "B en"]
        );
    }

    #[test]
    fn filtered_out_prerequisite_resolves_as_placeholder() {
        let x = course("X").with_period("2024").with_compulsory(refs(&["OLD", "NEW"]));
        let old = course("OLD").with_period("2019");
        let new = course("NEW").with_period("2024");
        let index = CourseIndex::build(vec![x, old, new], &PeriodFilter::Containing("2024".into()));

        let builder = TreeBuilder::new(&index, Language::En);

        assert_eq!(names(builder.build_tree("X").children()), [NO_DATA, "NEW en"]);
        assert_eq!(builder.build_tree("OLD"), DisplayNode::empty_tree());
    }

    #[test]
    fn missing_name_uses_placeholder_text() {
        let mut nameless = course("X");
        nameless.name = None;
        let index = index(vec![nameless]);

        let tree = TreeBuilder::new(&index, Language::En).build_tree("X");

        assert_eq!(tree.name, "error");
    }

    #[test]
    fn collapse_leaves_non_group_and_multi_group_subtrees_alone() {
        let leaves = vec![DisplayNode::leaf("a")];
        assert_eq!(collapse(leaves.clone()), leaves);

        let groups = vec![
            DisplayNode::group("Group C1", PrerequisiteKind::Compulsory, leaves.clone()),
            DisplayNode::group("Group O1", PrerequisiteKind::Recommended, leaves.clone()),
        ];
        assert_eq!(collapse(groups.clone()), groups);

        let single = vec![DisplayNode::group(
            "Group C1",
            PrerequisiteKind::Compulsory,
            leaves.clone(),
        )];
        assert_eq!(collapse(single), leaves);
        assert!(collapse(Vec::new()).is_empty());
    }
}
