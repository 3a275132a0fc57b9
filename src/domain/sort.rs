//! Stable, recursive ordering of siblings.

use std::cmp::Ordering;

use tracing::instrument;

use crate::domain::Node;

/// Options for [`Node::sort`]. Applied identically at every level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Place branches before leaves regardless of label.
    pub branches_first: bool,
}

impl SortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branches_first(mut self, value: bool) -> Self {
        self.branches_first = value;
        self
    }
}

/// Sibling comparator shared by the in-place sort and render-time ordering.
///
/// With both keys disabled every pair compares equal, so a stable sort keeps
/// insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SiblingOrder {
    pub branches_first: bool,
    pub by_label: bool,
}

impl SiblingOrder {
    pub fn is_identity(&self) -> bool {
        !self.branches_first && !self.by_label
    }

    pub fn compare(&self, a: &Node, b: &Node) -> Ordering {
        if self.branches_first {
            match (a.is_branch(), b.is_branch()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
        if self.by_label {
            a.label.as_bytes().cmp(b.label.as_bytes())
        } else {
            Ordering::Equal
        }
    }
}

impl From<SortOptions> for SiblingOrder {
    fn from(options: SortOptions) -> Self {
        Self {
            branches_first: options.branches_first,
            by_label: true,
        }
    }
}

impl Node {
    /// Recursively sort children by label, in place, and return `self`.
    ///
    /// The sort is stable: siblings with equal labels and equal branch status
    /// keep their relative order.
    ///
    /// ```
    /// use asciitree::{Node, SortOptions};
    ///
    /// let mut root = Node::new_branch("albums");
    /// root.add_leaves(["ONUKA.jpg"]).add_branches(["VIDLIK", "KOLIR"]);
    /// root.sort(SortOptions::new().branches_first(true));
    ///
    /// let labels: Vec<_> = root.children().iter().map(|c| c.label()).collect();
    /// assert_eq!(labels, ["KOLIR", "VIDLIK", "ONUKA.jpg"]);
    /// ```
    #[instrument(level = "trace", skip(self), fields(label = %self.label))]
    pub fn sort(&mut self, options: SortOptions) -> &mut Self {
        self.sort_children(SiblingOrder::from(options));
        self
    }

    fn sort_children(&mut self, order: SiblingOrder) {
        if self.children.is_empty() {
            return;
        }
        // Vec::sort_by is stable
        self.children.sort_by(|a, b| order.compare(a, b));
        for child in &mut self.children {
            child.sort_children(order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn labels(node: &Node) -> Vec<&str> {
        node.children().iter().map(Node::label).collect()
    }

    #[rstest]
    #[case::insertion_order(false, false, Ordering::Equal)]
    #[case::branches_first_only(true, false, Ordering::Greater)]
    #[case::labels_only(false, true, Ordering::Less)]
    #[case::both(true, true, Ordering::Greater)]
    fn given_leaf_and_branch_when_comparing_then_respects_toggles(
        #[case] branches_first: bool,
        #[case] by_label: bool,
        #[case] expected: Ordering,
    ) {
        let order = SiblingOrder {
            branches_first,
            by_label,
        };
        let got = order.compare(&Node::new_leaf("a"), &Node::new_branch("b"));
        assert_eq!(got, expected);
    }

    #[test]
    fn given_identity_order_when_checked_then_reports_identity() {
        assert!(SiblingOrder::default().is_identity());
        assert!(!SiblingOrder::from(SortOptions::new()).is_identity());
    }

    #[test]
    fn given_labels_when_compared_then_uses_byte_order() {
        let order = SiblingOrder::from(SortOptions::new());
        // uppercase sorts before lowercase, '.' before letters
        assert_eq!(
            order.compare(&Node::new_leaf("Zulu"), &Node::new_leaf("alfa")),
            Ordering::Less
        );
        assert_eq!(
            order.compare(&Node::new_leaf(".hidden"), &Node::new_leaf("Alfa")),
            Ordering::Less
        );
    }

    #[test]
    fn given_childless_node_when_sort_then_unchanged() {
        let mut node = Node::new_leaf("alfa");
        node.sort(SortOptions::new());
        assert_eq!(node, Node::new_leaf("alfa"));
    }

    #[test]
    fn given_equal_labels_when_sort_then_keeps_original_order() {
        let mut root = Node::new_leaf("root").with_children([
            Node::new_leaf("same").with_leaves(["first"]),
            Node::new_leaf("alfa"),
            Node::new_leaf("same").with_leaves(["second"]),
        ]);
        root.sort(SortOptions::new());

        assert_eq!(labels(&root), ["alfa", "same", "same"]);
        assert_eq!(root.children()[1].children()[0].label(), "first");
        assert_eq!(root.children()[2].children()[0].label(), "second");
    }

    #[test]
    fn given_derived_branch_when_branches_first_then_precedes_leaves() {
        // "zulu" is a branch only because it has children
        let mut root = Node::new_leaf("root").with_children([
            Node::new_leaf("alfa"),
            Node::new_leaf("zulu").with_leaves(["x"]),
        ]);
        root.sort(SortOptions::new().branches_first(true));
        assert_eq!(labels(&root), ["zulu", "alfa"]);
    }
}
