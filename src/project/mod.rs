//! Project discovery
//!
//! Walks the configured roots to a bounded depth and turns every qualifying
//! directory into a project [`Item`]. Discovery is best effort: a root that
//! cannot be read contributes nothing, and the problem is reported as a
//! warning next to the items instead of failing the caller.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::catalog::{sort_by_title, Item};

/// A non-fatal problem met while scanning one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    /// Root being scanned when the problem occurred
    pub root: PathBuf,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.root.display(), self.message)
    }
}

/// Result of a project scan: whatever could be found, plus diagnostics
#[derive(Debug, Clone, Default)]
pub struct ProjectScan {
    /// Project items, sorted by title
    pub items: Vec<Item>,
    /// Per-root problems (unreadable roots, permission errors)
    pub warnings: Vec<ScanWarning>,
}

/// Scan `roots` for project directories between depth 1 and `max_depth`
///
/// Dot-directories and directories named in `skip_dirs` are pruned together
/// with everything below them.
pub fn scan_projects(
    roots: &[PathBuf],
    home: &Path,
    max_depth: usize,
    skip_dirs: &[String],
) -> ProjectScan {
    let mut scan = ProjectScan::default();

    for root in roots {
        if let Err(e) = std::fs::read_dir(root) {
            scan.warnings.push(ScanWarning {
                root: root.clone(),
                message: e.to_string(),
            });
            continue;
        }

        if root
            .components()
            .any(|c| matches!(c, Component::Normal(n) if skip_dirs.iter().any(|s| n == s.as_str())))
        {
            continue;
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || is_candidate(e, skip_dirs));

        for entry in walker {
            match entry {
                Ok(entry) => scan.items.push(project_item(entry.path(), home)),
                Err(e) => scan.warnings.push(ScanWarning {
                    root: root.clone(),
                    message: e.to_string(),
                }),
            }
        }
    }

    sort_by_title(&mut scan.items);
    scan
}

/// Directories only, never hidden, never a dependency cache
fn is_candidate(entry: &DirEntry, skip_dirs: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    !name.starts_with('.') && !skip_dirs.iter().any(|s| name == s.as_str())
}

fn project_item(path: &Path, home: &Path) -> Item {
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Item::project(title, display_path(path, home), path.to_path_buf())
}

/// Convert a path to a display string with `~` for the home directory
pub fn display_path(path: &Path, home: &Path) -> String {
    if !home.as_os_str().is_empty() {
        if let Ok(stripped) = path.strip_prefix(home) {
            if stripped.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn skip() -> Vec<String> {
        vec!["node_modules".to_string()]
    }

    fn titles(scan: &ProjectScan) -> Vec<&str> {
        scan.items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_hidden_directories_are_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/alpha")).unwrap();
        fs::create_dir_all(home.join("dev/.hidden")).unwrap();

        let scan = scan_projects(&[home.join("dev")], home, 1, &skip());
        assert_eq!(titles(&scan), vec!["alpha"]);
        assert_eq!(scan.items[0].description, "~/dev/alpha");
        assert!(scan.warnings.is_empty());
    }

    #[test]
    fn test_depth_bounds() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/a/b/c/d")).unwrap();

        let shallow = scan_projects(&[home.join("dev")], home, 1, &skip());
        assert_eq!(titles(&shallow), vec!["a"]);

        let deep = scan_projects(&[home.join("dev")], home, 3, &skip());
        assert_eq!(titles(&deep), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_hidden_ancestors_and_dependency_caches_are_pruned() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/.config/nested")).unwrap();
        fs::create_dir_all(home.join("dev/web/node_modules/pkg")).unwrap();
        fs::create_dir_all(home.join("dev/web/src")).unwrap();

        let scan = scan_projects(&[home.join("dev")], home, 3, &skip());
        assert_eq!(titles(&scan), vec!["src", "web"]);
    }

    #[test]
    fn test_files_are_not_projects() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/app")).unwrap();
        fs::write(home.join("dev/notes.txt"), "x").unwrap();

        let scan = scan_projects(&[home.join("dev")], home, 2, &skip());
        assert_eq!(titles(&scan), vec!["app"]);
    }

    #[test]
    fn test_missing_root_is_a_warning_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/alpha")).unwrap();

        let roots = vec![home.join("missing"), home.join("dev")];
        let scan = scan_projects(&roots, home, 1, &skip());
        assert_eq!(titles(&scan), vec!["alpha"]);
        assert_eq!(scan.warnings.len(), 1);
        assert_eq!(scan.warnings[0].root, home.join("missing"));
    }

    #[test]
    fn test_results_sorted_across_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/zeta")).unwrap();
        fs::create_dir_all(home.join("personal/Beta")).unwrap();
        fs::create_dir_all(home.join("personal/alpha")).unwrap();

        let roots = vec![home.join("dev"), home.join("personal")];
        let scan = scan_projects(&roots, home, 1, &skip());
        assert_eq!(titles(&scan), vec!["Beta", "alpha", "zeta"]);
    }

    #[test]
    fn test_project_target_is_full_path() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        fs::create_dir_all(home.join("dev/alpha")).unwrap();

        let scan = scan_projects(&[home.join("dev")], home, 1, &skip());
        assert_eq!(
            scan.items[0].target,
            home.join("dev/alpha").to_string_lossy()
        );
    }

    #[test]
    fn test_display_path() {
        let home = Path::new("/home/u");
        assert_eq!(display_path(Path::new("/home/u/dev/x"), home), "~/dev/x");
        assert_eq!(display_path(Path::new("/home/u"), home), "~");
        assert_eq!(display_path(Path::new("/srv/x"), home), "/srv/x");
    }
}
