//! Directory scanning service
//!
//! Walks a directory and builds the [`Node`] tree handed to the renderer.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::Node;
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// Filters and label decorations applied while scanning.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Include entries whose name starts with `.`
    pub show_hidden: bool,
    /// Descend into symlinked directories
    pub follow_links: bool,
    /// Append a `[size]` line to file labels
    pub show_size: bool,
    /// Maximum directory depth below the root
    pub max_depth: Option<usize>,
    /// Entries whose file name matches any pattern are skipped
    pub exclude: Vec<Regex>,
}

impl ScanOptions {
    /// Build scan options from settings, compiling the exclude patterns.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let exclude = settings
            .exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ApplicationError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        Ok(Self {
            show_hidden: settings.show_hidden,
            follow_links: settings.follow_links,
            show_size: settings.show_size,
            max_depth: settings.max_depth,
            exclude,
        })
    }

    fn includes(&self, entry: &DirEntry) -> bool {
        self.includes_path(entry.path())
    }

    fn includes_path(&self, path: &Path) -> bool {
        if !self.show_hidden && path.is_hidden() {
            return false;
        }
        let name = path.file_label();
        !self.exclude.iter().any(|re| re.is_match(&name))
    }
}

/// Service turning a directory into a labeled tree.
pub struct DirectoryScanner {
    fs: Arc<dyn FileSystem>,
}

impl DirectoryScanner {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Scan `root` into a tree whose root label is `root` as given.
    ///
    /// Directories become forced branches, so empty directories still count
    /// as branches. Symlinks that cannot be followed (dangling, looping) are
    /// kept as `name -> target` leaves. Other entries below the root that
    /// cannot be read are logged and skipped; failing to read the root itself
    /// is an error.
    #[instrument(level = "debug", skip(self, options))]
    pub fn scan(&self, root: &Path, options: &ScanOptions) -> ApplicationResult<Node> {
        if !self.fs.exists(root) {
            return Err(ApplicationError::NotFound(root.to_path_buf()));
        }
        if !self.fs.is_dir(root) {
            return Err(ApplicationError::NotADirectory(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root).follow_links(options.follow_links);
        if let Some(max_depth) = options.max_depth {
            walker = walker.max_depth(max_depth);
        }

        // stack[d] is the open node at depth d; walkdir yields parents before children
        let mut stack: Vec<Node> = Vec::new();
        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || options.includes(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() > 0 => {
                    self.recover_link(&mut stack, &e, options);
                    continue;
                }
                Err(e) => {
                    return Err(ApplicationError::OperationFailed {
                        context: format!("read directory {}", root.display()),
                        source: Box::new(e),
                    })
                }
            };

            if entry.depth() == 0 {
                stack.push(Node::new_branch(root.display().to_string()));
                continue;
            }
            let node = self.entry_node(&entry, options);
            attach(&mut stack, entry.depth(), node);
        }

        while stack.len() > 1 {
            close_level(&mut stack);
        }
        let tree = stack
            .pop()
            .ok_or_else(|| ApplicationError::NotFound(root.to_path_buf()))?;
        debug!("scan: {} nodes, depth {}", tree.len(), tree.depth());
        Ok(tree)
    }

    fn entry_node(&self, entry: &DirEntry, options: &ScanOptions) -> Node {
        let mut label = entry.path().file_label();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return Node::new_branch(label);
        }
        if file_type.is_symlink() {
            if let Ok(target) = self.fs.read_link(entry.path()) {
                label = link_label(entry.path(), &target);
            }
        } else if options.show_size {
            match entry.metadata() {
                Ok(meta) => {
                    label.push_str("\n[");
                    label.push_str(&format_size(meta.len()));
                    label.push(']');
                }
                Err(e) => debug!("no size for {}: {}", entry.path().display(), e),
            }
        }
        Node::new_leaf(label)
    }

    /// Walk errors below the root: a link walkdir could not follow is still
    /// listed, anything else is skipped with a warning.
    fn recover_link(
        &self,
        stack: &mut Vec<Node>,
        err: &walkdir::Error,
        options: &ScanOptions,
    ) {
        let Some(path) = err.path() else {
            warn!("skipping unreadable entry: {}", err);
            return;
        };
        if !options.includes_path(path) {
            return;
        }
        // a followed link to an unreadable directory was already listed
        if err.loop_ancestor().is_none() && self.fs.is_dir(path) {
            warn!("skipping unreadable entry: {}", err);
            return;
        }
        match self.fs.read_link(path) {
            Ok(target) => {
                debug!("cannot follow {}: {}", path.display(), err);
                attach(stack, err.depth(), Node::new_leaf(link_label(path, &target)));
            }
            Err(_) => warn!("skipping unreadable entry: {}", err),
        }
    }
}

fn link_label(path: &Path, target: &Path) -> String {
    format!("{} -> {}", path.file_label(), target.display())
}

/// Push `node` as the open node at `depth`, closing deeper levels first.
fn attach(stack: &mut Vec<Node>, depth: usize, node: Node) {
    while stack.len() > depth {
        close_level(stack);
    }
    stack.push(node);
}

fn close_level(stack: &mut Vec<Node>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.add_children([done]);
        }
    }
}

/// Human-readable byte count using binary units, e.g. `1.5 KiB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
