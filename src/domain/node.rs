//! Owned tree of labeled nodes.

/// A labeled tree node owning its children.
///
/// A node is a *branch* if it has children or was created with
/// [`Node::new_branch`]; otherwise it is a *leaf*. The forced-branch flag lets
/// an empty directory still count as expandable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub(crate) label: String,
    pub(crate) forced_branch: bool,
    pub(crate) children: Vec<Node>,
}

impl Node {
    /// Create a leaf node.
    pub fn new_leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            forced_branch: false,
            children: Vec::new(),
        }
    }

    /// Create a node that is a branch even without children.
    pub fn new_branch(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            forced_branch: true,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_forced_branch(&self) -> bool {
        self.forced_branch
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// True if the node was created as a branch or has at least one child.
    pub fn is_branch(&self) -> bool {
        self.forced_branch || !self.children.is_empty()
    }

    /// Append already-built nodes in the given order.
    pub fn add_children<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = Node>,
    {
        self.children.extend(children);
        self
    }

    /// Append one leaf per label.
    pub fn add_leaves<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_children(labels.into_iter().map(Node::new_leaf))
    }

    /// Append one forced branch per label.
    pub fn add_branches<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_children(labels.into_iter().map(Node::new_branch))
    }

    /// Append a new leaf and return it, not `self`.
    pub fn add_leaf(&mut self, label: impl Into<String>) -> &mut Node {
        self.push_child(Node::new_leaf(label))
    }

    /// Append a new forced branch and return it, not `self`.
    ///
    /// ```
    /// use asciitree::Node;
    ///
    /// let mut root = Node::new_branch("albums");
    /// root.add_branch("VIDLIK").add_leaves(["Svitanok.mp3", "Vidlik.mp3"]);
    /// assert_eq!(root.children()[0].children().len(), 2);
    /// ```
    pub fn add_branch(&mut self, label: impl Into<String>) -> &mut Node {
        self.push_child(Node::new_branch(label))
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Owned variant of [`Node::add_children`] for building trees in one expression.
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        self.add_children(children);
        self
    }

    pub fn with_leaves<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_leaves(labels);
        self
    }

    pub fn with_branches<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_branches(labels);
        self
    }

    /// Number of levels, counting a lone node as 1.
    pub fn depth(&self) -> usize {
        1 + self.iter().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Total number of nodes including `self`.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Labels of all leaves in pre-order. Forced branches without children
    /// are not leaves.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, node)| !node.is_branch())
            .map(|(_, node)| node.label())
            .collect()
    }

    /// Pre-order traversal yielding `(depth, node)`, root at depth 0.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    fn push_child(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = (usize, &'a Node);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Explicit-stack pre-order iterator, safe for trees of any depth.
pub struct Iter<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iter<'a> {
    fn new(root: &'a Node) -> Self {
        Self {
            stack: vec![(0, root)],
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
