//! Render labeled trees as ASCII-art diagrams.
//!
//! ```
//! use asciitree::{Node, SortOptions};
//!
//! let mut tree = Node::new_branch("alfa");
//! tree.add_leaves(["bravo.txt"])
//!     .add_branch("charlie")
//!     .add_leaves(["delta.txt"]);
//! tree.sort(SortOptions::new());
//!
//! assert_eq!(
//!     tree.render(),
//!     "alfa\n├── bravo.txt\n└── charlie\n    └── delta.txt"
//! );
//! ```
//!
//! The `domain` layer holds the tree, sorting and rendering and does no I/O.
//! The remaining layers back the `asciitree` binary, which scans a directory
//! into a tree and prints it.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{Node, RenderOptions, Rendered, SortOptions};
