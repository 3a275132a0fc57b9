//! Domain layer: the tree, its ordering and its rendering
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod node;
pub mod render;
pub mod sort;

pub use node::{Iter, Node};
pub use render::{Rendered, RenderOptions};
pub use sort::SortOptions;
