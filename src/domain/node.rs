//! Display nodes handed to the tree renderer.
//!
//! The serialized form is the contract with the rendering widget: every node
//! has a `name`, and optionally `children` and `attributes`. Absent optional
//! fields are omitted rather than written as `null`.

use serde::{Deserialize, Serialize};

use crate::domain::course::PrerequisiteKind;

/// Name of the node returned when the requested course does not exist.
pub const NO_DATA: &str = "No data";

/// What a display node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A course; the node carries the course code.
    Course,
    /// A prerequisite group of the parent course.
    Group,
}

/// Optional attributes of a display node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// What the node stands for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeKind>,

    /// The course code, for course nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Whether the prerequisite is compulsory or recommended.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PrerequisiteKind>,
}

/// A node of a prerequisite tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNode {
    /// Display text.
    pub name: String,

    /// Child nodes, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Self>>,

    /// Node attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<NodeAttributes>,
}

impl DisplayNode {
    /// A node with no children and no attributes.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
            attributes: None,
        }
    }

    /// The tree returned for a course that cannot be found.
    #[must_use]
    pub fn empty_tree() -> Self {
        Self::leaf(NO_DATA)
    }

    /// A root node: children but no attributes.
    pub fn root(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
            attributes: None,
        }
    }

    /// A course node.
    pub fn course(
        name: impl Into<String>,
        code: impl Into<String>,
        kind: PrerequisiteKind,
        children: Option<Vec<Self>>,
    ) -> Self {
        Self {
            name: name.into(),
            children,
            attributes: Some(NodeAttributes {
                node: Some(NodeKind::Course),
                code: Some(code.into()),
                kind: Some(kind),
            }),
        }
    }

    /// A prerequisite-group node.
    pub fn group(name: impl Into<String>, kind: PrerequisiteKind, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
            attributes: Some(NodeAttributes {
                node: Some(NodeKind::Group),
                code: None,
                kind: Some(kind),
            }),
        }
    }

    /// The children of the node; empty when there are none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }

    /// What the node stands for, if attributed.
    #[must_use]
    pub fn kind(&self) -> Option<NodeKind> {
        self.attributes.as_ref().and_then(|attributes| attributes.node)
    }

    /// Whether the node is a prerequisite-group node.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind() == Some(NodeKind::Group)
    }

    /// The course code carried by the node.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attributes| attributes.code.as_deref())
    }

    /// The prerequisite kind carried by the node.
    #[must_use]
    pub fn prerequisite_kind(&self) -> Option<PrerequisiteKind> {
        self.attributes.as_ref().and_then(|attributes| attributes.kind)
    }

    /// The number of nodes in the tree rooted here.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }

    /// The number of levels below and including this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Self::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sentinel_serializes_to_name_only() {
        let value = serde_json::to_value(DisplayNode::empty_tree()).unwrap();
        assert_eq!(value, json!({ "name": "No data" }));
    }

    #[test]
    fn course_node_serializes_attributes() {
        let node = DisplayNode::course(
            "Ohjelmointi 1",
            "COMP.CS.110",
            PrerequisiteKind::Recommended,
            Some(Vec::new()),
        );

        let value = serde_json::to_value(node).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Ohjelmointi 1",
                "children": [],
                "attributes": { "node": "course", "code": "COMP.CS.110", "type": "recommended" }
            })
        );
    }

    #[test]
    fn group_node_omits_code() {
        let node = DisplayNode::group("Group C1", PrerequisiteKind::Compulsory, Vec::new());
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(
            value["attributes"],
            json!({ "node": "group", "type": "compulsory" })
        );
        assert!(node.is_group());
        assert_eq!(node.code(), None);
    }

    #[test]
    fn counts_nodes_and_levels() {
        let tree = DisplayNode::root(
            "root",
            vec![
                DisplayNode::leaf("a"),
                DisplayNode::root("b", vec![DisplayNode::leaf("c")]),
            ],
        );

        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(DisplayNode::empty_tree().depth(), 1);
        assert_eq!(DisplayNode::empty_tree().node_count(), 1);
    }

    #[test]
    fn deserializes_renderer_payload() {
        let node: DisplayNode = serde_json::from_value(json!({
            "name": "Group O1",
            "children": [{ "name": "No data" }],
            "attributes": { "node": "group", "type": "optional" }
        }))
        .unwrap();

        assert_eq!(node.prerequisite_kind(), Some(PrerequisiteKind::Recommended));
        assert_eq!(node.children(), [DisplayNode::empty_tree()]);
    }
}
