//! ASCII-art rendering of a [`Node`] tree.
//!
//! ```text
//! alfa
//! ├── bravo.txt
//! └── charlie
//!     └── delta.txt
//! ```
//!
//! The root label is written verbatim. Every child line starts with the
//! accumulated prefix and a connector; embedded line breaks in a child label
//! continue under the connector column.

use std::fmt::{self, Write};

use tracing::instrument;

use crate::domain::sort::SiblingOrder;
use crate::domain::Node;

const CONNECTOR: &str = "├── ";
const LAST_CONNECTOR: &str = "└── ";
const SPACER: &str = "│   ";
const LAST_SPACER: &str = "    ";

/// Render-time sibling ordering. The tree itself is never reordered.
///
/// The two toggles are independent: `branches_first` alone groups branches
/// ahead of leaves while keeping insertion order inside each group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub branches_first: bool,
    pub sort_labels: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branches_first(mut self, value: bool) -> Self {
        self.branches_first = value;
        self
    }

    pub fn sort_labels(mut self, value: bool) -> Self {
        self.sort_labels = value;
        self
    }
}

impl From<RenderOptions> for SiblingOrder {
    fn from(options: RenderOptions) -> Self {
        Self {
            branches_first: options.branches_first,
            by_label: options.sort_labels,
        }
    }
}

/// Borrowed view of a tree that renders through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    root: &'a Node,
    order: SiblingOrder,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root.label)?;
        let mut prefix = String::new();
        write_children(f, self.root, &mut prefix, self.order)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(RenderOptions::default()), f)
    }
}

impl Node {
    /// Render the tree in its current child order. No trailing line break.
    #[instrument(level = "trace", skip(self), fields(label = %self.label))]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Render with siblings ordered per `options`, leaving `self` untouched.
    #[instrument(level = "trace", skip(self), fields(label = %self.label))]
    pub fn render_with(&self, options: RenderOptions) -> String {
        self.display_with(options).to_string()
    }

    /// Lazily rendered view, useful with `write!` and `println!`.
    pub fn display_with(&self, options: RenderOptions) -> Rendered<'_> {
        Rendered {
            root: self,
            order: SiblingOrder::from(options),
        }
    }
}

fn write_children<W: Write>(
    out: &mut W,
    node: &Node,
    prefix: &mut String,
    order: SiblingOrder,
) -> fmt::Result {
    let mut children: Vec<&Node> = node.children.iter().collect();
    if !order.is_identity() {
        children.sort_by(|a, b| order.compare(a, b));
    }

    let last = children.len().saturating_sub(1);
    for (i, child) in children.into_iter().enumerate() {
        let (connector, spacer) = if i == last {
            (LAST_CONNECTOR, LAST_SPACER)
        } else {
            (CONNECTOR, SPACER)
        };

        out.write_char('\n')?;
        out.write_str(prefix)?;
        out.write_str(connector)?;
        write_label(out, &child.label, prefix, spacer)?;

        let len = prefix.len();
        prefix.push_str(spacer);
        write_children(out, child, prefix, order)?;
        prefix.truncate(len);
    }
    Ok(())
}

fn write_label<W: Write>(out: &mut W, label: &str, prefix: &str, spacer: &str) -> fmt::Result {
    let mut lines = label.split('\n');
    if let Some(first) = lines.next() {
        out.write_str(first)?;
    }
    for line in lines {
        out.write_char('\n')?;
        out.write_str(prefix)?;
        out.write_str(spacer)?;
        out.write_str(line)?;
    }
    Ok(())
}
