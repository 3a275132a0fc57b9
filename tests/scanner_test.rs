//! Tests for DirectoryScanner
//!
//! Fixture layout (all tests start from this):
//! ```text
//! root
//! ├── .hidden
//! ├── a_dir
//! │   └── nested.txt
//! ├── b.txt          (5 bytes)
//! ├── empty_dir
//! └── target
//!     └── out.bin    (1 byte)
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use asciitree::application::services::{DirectoryScanner, ScanOptions};
use asciitree::application::ApplicationError;
use asciitree::infrastructure::traits::RealFileSystem;
use asciitree::util::testing::init_test_setup;
use asciitree::{Node, RenderOptions};

#[fixture]
fn project() -> TempDir {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join(".hidden"), "").unwrap();
    fs::create_dir(root.join("a_dir")).unwrap();
    fs::write(root.join("a_dir/nested.txt"), "").unwrap();
    fs::write(root.join("b.txt"), "hello").unwrap();
    fs::create_dir(root.join("empty_dir")).unwrap();
    fs::create_dir(root.join("target")).unwrap();
    fs::write(root.join("target/out.bin"), "x").unwrap();
    temp
}

fn scanner() -> DirectoryScanner {
    DirectoryScanner::new(Arc::new(RealFileSystem))
}

/// Scan and render sorted, with a fixed root label so output is stable.
fn scan_sorted(root: &Path, options: &ScanOptions, branches_first: bool) -> String {
    let mut tree = scanner().scan(root, options).unwrap();
    tree.set_label("root");
    tree.render_with(
        RenderOptions::new()
            .sort_labels(true)
            .branches_first(branches_first),
    )
}

fn child<'a>(tree: &'a Node, label: &str) -> Option<&'a Node> {
    tree.children().iter().find(|c| c.label() == label)
}

// ============================================================
// Structure
// ============================================================

#[rstest]
fn given_directory_when_scan_with_defaults_then_hidden_entries_skipped(project: TempDir) {
    let rendered = scan_sorted(project.path(), &ScanOptions::default(), false);

    let want = [
        "root",
        "├── a_dir",
        "│   └── nested.txt",
        "├── b.txt",
        "├── empty_dir",
        "└── target",
        "    └── out.bin",
    ]
    .join("\n");
    assert_eq!(rendered, want);
}

#[rstest]
fn given_directory_when_scan_then_root_label_is_path_as_given(project: TempDir) {
    let tree = scanner()
        .scan(project.path(), &ScanOptions::default())
        .unwrap();
    assert_eq!(tree.label(), project.path().display().to_string());
    assert!(tree.is_branch());
}

#[rstest]
fn given_empty_directory_when_scan_then_forced_branch(project: TempDir) {
    let tree = scanner()
        .scan(project.path(), &ScanOptions::default())
        .unwrap();

    let empty = child(&tree, "empty_dir").expect("empty_dir scanned");
    assert!(empty.children().is_empty());
    assert!(empty.is_forced_branch());
    assert!(empty.is_branch());

    let file = child(&tree, "b.txt").expect("b.txt scanned");
    assert!(!file.is_branch());
}

#[rstest]
fn given_show_hidden_when_scan_then_dotfiles_listed(project: TempDir) {
    let options = ScanOptions {
        show_hidden: true,
        ..ScanOptions::default()
    };
    let rendered = scan_sorted(project.path(), &options, false);
    assert!(rendered.starts_with("root\n├── .hidden\n├── a_dir"));
}

#[rstest]
fn given_exclude_pattern_when_scan_then_matching_subtree_pruned(project: TempDir) {
    let options = ScanOptions {
        exclude: vec![Regex::new("^target$").unwrap()],
        ..ScanOptions::default()
    };
    let rendered = scan_sorted(project.path(), &options, false);

    assert!(!rendered.contains("target"));
    assert!(!rendered.contains("out.bin"));
    assert!(rendered.ends_with("└── empty_dir"));
}

#[rstest]
fn given_max_depth_one_when_scan_then_only_direct_children(project: TempDir) {
    let options = ScanOptions {
        max_depth: Some(1),
        ..ScanOptions::default()
    };
    let tree = scanner().scan(project.path(), &options).unwrap();

    assert_eq!(tree.depth(), 2);
    assert!(tree.leaf_labels().iter().all(|label| *label != "nested.txt"));
    // directories cut off by the depth limit still render as branches
    assert!(child(&tree, "a_dir").unwrap().is_branch());
}

#[rstest]
fn given_dirs_first_when_render_then_directories_precede_files(project: TempDir) {
    let rendered = scan_sorted(project.path(), &ScanOptions::default(), true);

    let want = [
        "root",
        "├── a_dir",
        "│   └── nested.txt",
        "├── empty_dir",
        "├── target",
        "│   └── out.bin",
        "└── b.txt",
    ]
    .join("\n");
    assert_eq!(rendered, want);
}

#[rstest]
fn given_show_size_when_scan_then_size_on_second_label_line(project: TempDir) {
    let options = ScanOptions {
        show_size: true,
        ..ScanOptions::default()
    };
    let tree = scanner().scan(project.path(), &options).unwrap();
    assert_eq!(child(&tree, "b.txt\n[5 B]").map(Node::is_branch), Some(false));

    let rendered = scan_sorted(project.path(), &options, false);
    assert!(rendered.contains("├── b.txt\n│   [5 B]\n├── empty_dir"));
    assert!(rendered.ends_with("    └── out.bin\n        [1 B]"));
}

// ============================================================
// Symlinks
// ============================================================

#[cfg(unix)]
#[rstest]
fn given_symlink_when_scan_then_label_shows_target(project: TempDir) {
    std::os::unix::fs::symlink("b.txt", project.path().join("link")).unwrap();

    let tree = scanner()
        .scan(project.path(), &ScanOptions::default())
        .unwrap();

    let link = child(&tree, "link -> b.txt").expect("symlink scanned");
    assert!(!link.is_branch());
}

#[cfg(unix)]
#[rstest]
#[case::not_followed(false, "linked -> a_dir", false)]
#[case::followed(true, "linked", true)]
fn given_symlinked_directory_when_scan_then_descends_only_when_following(
    project: TempDir,
    #[case] follow_links: bool,
    #[case] label: &str,
    #[case] has_children: bool,
) {
    std::os::unix::fs::symlink("a_dir", project.path().join("linked")).unwrap();
    let options = ScanOptions {
        follow_links,
        ..ScanOptions::default()
    };

    let tree = scanner().scan(project.path(), &options).unwrap();

    let linked = child(&tree, label).expect("symlinked directory scanned");
    assert_eq!(!linked.children().is_empty(), has_children);
    if has_children {
        assert_eq!(linked.children()[0].label(), "nested.txt");
    }
}

#[cfg(unix)]
#[rstest]
#[case::not_followed(false)]
#[case::followed(true)]
fn given_dangling_symlink_when_scan_then_listed_with_target(
    project: TempDir,
    #[case] follow_links: bool,
) {
    std::os::unix::fs::symlink("missing", project.path().join("dangling")).unwrap();
    let options = ScanOptions {
        follow_links,
        ..ScanOptions::default()
    };

    let rendered = scan_sorted(project.path(), &options, false);

    assert!(rendered.contains("├── b.txt\n├── dangling -> missing\n├── empty_dir"));
}

#[cfg(unix)]
#[rstest]
fn given_dangling_symlink_matching_exclude_when_following_then_skipped(project: TempDir) {
    std::os::unix::fs::symlink("missing", project.path().join("dangling")).unwrap();
    let options = ScanOptions {
        follow_links: true,
        exclude: vec![Regex::new("^dangling$").unwrap()],
        ..ScanOptions::default()
    };

    let rendered = scan_sorted(project.path(), &options, false);
    assert!(!rendered.contains("dangling"));
}

#[cfg(unix)]
#[rstest]
fn given_symlink_loop_when_following_then_listed_as_link(project: TempDir) {
    std::os::unix::fs::symlink("..", project.path().join("a_dir/up")).unwrap();
    let options = ScanOptions {
        follow_links: true,
        ..ScanOptions::default()
    };

    let rendered = scan_sorted(project.path(), &options, false);
    assert!(rendered.contains("├── a_dir\n│   ├── nested.txt\n│   └── up -> ..\n├── b.txt"));
}

// ============================================================
// Unreadable entries
// ============================================================

/// Remove all permissions from `dir`. Returns false when they are not
/// enforced (e.g. running as root), in which case the test has nothing to check.
#[cfg(unix)]
fn lock(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(dir).is_ok() {
        unlock(dir);
        return false;
    }
    true
}

#[cfg(unix)]
fn unlock(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[rstest]
fn given_unreadable_subdirectory_when_scan_then_listed_empty_and_rest_kept(project: TempDir) {
    let locked = project.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("secret.txt"), "").unwrap();
    if !lock(&locked) {
        return;
    }

    let result = scanner().scan(project.path(), &ScanOptions::default());
    unlock(&locked);

    let tree = result.expect("unreadable subdirectory is not fatal");
    let locked_node = child(&tree, "locked").expect("locked directory listed");
    assert!(locked_node.is_branch());
    assert!(locked_node.children().is_empty());
    assert!(child(&tree, "b.txt").is_some());
    assert_eq!(child(&tree, "a_dir").unwrap().children().len(), 1);
}

#[cfg(unix)]
#[rstest]
fn given_unreadable_root_when_scan_then_operation_failed(project: TempDir) {
    let root = project.path().join("root");
    fs::create_dir(&root).unwrap();
    if !lock(&root) {
        return;
    }

    let result = scanner().scan(&root, &ScanOptions::default());
    unlock(&root);

    assert!(matches!(
        result,
        Err(ApplicationError::OperationFailed { .. })
    ));
}

// ============================================================
// Errors
// ============================================================

#[rstest]
fn given_missing_path_when_scan_then_not_found(project: TempDir) {
    let missing = project.path().join("missing");
    let err = scanner()
        .scan(&missing, &ScanOptions::default())
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(ref p) if p == &missing));
}

#[rstest]
fn given_file_path_when_scan_then_not_a_directory(project: TempDir) {
    let file = project.path().join("b.txt");
    let err = scanner().scan(&file, &ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ApplicationError::NotADirectory(ref p) if p == &file));
}
