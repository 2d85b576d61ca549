use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;

use voxmap_core::{IndexConfig, Result, VoxmapError};

/// Extensions registered in the file map.
pub const TRACKED_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "vue", "scss", "css", "less", "json", "md",
];

/// Extensions that additionally go through symbol extraction.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "vue"];

/// Options controlling tree enumeration and watch event filtering.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Glob patterns matched against individual path components.
    pub excludes: Vec<String>,
    /// Respect `.gitignore` files during enumeration.
    pub use_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            excludes: vec!["node_modules".to_string()],
            use_gitignore: true,
        }
    }
}

impl From<&IndexConfig> for WalkOptions {
    fn from(config: &IndexConfig) -> Self {
        Self {
            excludes: config.excludes.clone(),
            use_gitignore: config.use_gitignore,
        }
    }
}

/// Returns true if the file's extension is in the tracked set.
///
/// Extensions compare case-insensitively, so `Button.TSX` is tracked.
pub fn is_tracked(path: &Path) -> bool {
    has_extension_in(path, TRACKED_EXTENSIONS)
}

/// Returns true if the file is source code eligible for symbol extraction.
pub fn is_source(path: &Path) -> bool {
    has_extension_in(path, SOURCE_EXTENSIONS)
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    extensions.contains(&ext.as_str())
}

/// Compiles exclude strings into glob patterns, skipping invalid ones.
pub fn compile_excludes(excludes: &[String]) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for exclude in excludes {
        if let Ok(pattern) = Pattern::new(exclude) {
            patterns.push(pattern);
        } else {
            tracing::warn!("ignoring invalid exclude pattern: {exclude}");
        }
    }
    patterns
}

/// Returns true if any component of `path` matches any exclude pattern.
pub fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    path.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        patterns.iter().any(|pattern| pattern.matches(&name))
    })
}

/// Enumerates all tracked files under `root`.
///
/// Hidden entries are skipped, excluded directories are pruned, and
/// `.gitignore` rules apply when `options.use_gitignore` is set. Unreadable
/// entries are skipped rather than aborting the walk.
///
/// # Errors
///
/// Returns [`VoxmapError::NotFound`] if `root` is not a directory.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use voxmap_index::walker::{enumerate_tree, WalkOptions};
///
/// let files = enumerate_tree(Path::new("."), &WalkOptions::default()).unwrap();
/// for file in files {
///     println!("{}", file.display());
/// }
/// ```
pub fn enumerate_tree(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(VoxmapError::NotFound(root.to_path_buf()));
    }

    let patterns = compile_excludes(&options.excludes);
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(options.use_gitignore)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            !patterns.iter().any(|pattern| pattern.matches(&name))
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        if is_tracked(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_temp_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("components")).unwrap();
        fs::create_dir_all(root.join("utils")).unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("components/Button.tsx"), "export class Button {}").unwrap();
        fs::write(root.join("utils/helper.ts"), "export function helper() {}").unwrap();
        fs::write(root.join("styles.css"), "body {}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("binary.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("node_modules/react/index.js"), "module.exports = {}").unwrap();
        dir
    }

    #[test]
    fn enumerates_tracked_files_only() {
        let dir = make_temp_tree();
        let files = enumerate_tree(dir.path(), &WalkOptions::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"Button.tsx".to_string()));
        assert!(names.contains(&"helper.ts".to_string()));
        assert!(names.contains(&"styles.css".to_string()));
        assert!(names.contains(&"README.md".to_string()));
        assert!(!names.contains(&"binary.png".to_string()));
    }

    #[test]
    fn default_excludes_prune_node_modules() {
        let dir = make_temp_tree();
        let files = enumerate_tree(dir.path(), &WalkOptions::default()).unwrap();
        assert!(!files.iter().any(|p| p.to_string_lossy().contains("node_modules")));
    }

    #[test]
    fn custom_excludes_prune_additional_directories() {
        let dir = make_temp_tree();
        let options = WalkOptions {
            excludes: vec!["node_modules".into(), "utils".into()],
            use_gitignore: true,
        };
        let files = enumerate_tree(dir.path(), &options).unwrap();
        assert!(!files.iter().any(|p| p.to_string_lossy().contains("helper.ts")));
        assert!(files.iter().any(|p| p.ends_with("components/Button.tsx")));
    }

    #[test]
    fn invalid_exclude_patterns_are_skipped() {
        let dir = make_temp_tree();
        let options = WalkOptions {
            excludes: vec!["[invalid".into()],
            use_gitignore: true,
        };
        let files = enumerate_tree(dir.path(), &options).unwrap();
        assert!(files.iter().any(|p| p.ends_with("components/Button.tsx")));
    }

    #[test]
    fn gitignore_rules_apply_inside_git_repos() {
        let dir = make_temp_tree();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/bundle.js"), "var x = 1;").unwrap();
        fs::write(root.join(".gitignore"), "dist/\n").unwrap();

        let files = enumerate_tree(root, &WalkOptions::default()).unwrap();
        assert!(!files.iter().any(|p| p.to_string_lossy().contains("bundle.js")));

        let options = WalkOptions {
            use_gitignore: false,
            ..WalkOptions::default()
        };
        let files = enumerate_tree(root, &options).unwrap();
        assert!(files.iter().any(|p| p.to_string_lossy().contains("bundle.js")));
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = enumerate_tree(Path::new("/nonexistent/tree"), &WalkOptions::default());
        assert!(matches!(result, Err(VoxmapError::NotFound(_))));
    }

    #[test]
    fn tracked_and_source_sets_are_case_insensitive() {
        assert!(is_tracked(Path::new("a/Button.TSX")));
        assert!(is_tracked(Path::new("notes.md")));
        assert!(!is_tracked(Path::new("image.png")));
        assert!(!is_tracked(Path::new("Makefile")));
        assert!(is_source(Path::new("app.vue")));
        assert!(is_source(Path::new("app.JSX")));
        assert!(!is_source(Path::new("styles.css")));
    }

    #[test]
    fn excluded_paths_match_any_component() {
        let patterns = compile_excludes(&["node_modules".to_string(), "dist*".to_string()]);
        assert!(is_excluded(Path::new("/a/node_modules/b/c.ts"), &patterns));
        assert!(is_excluded(Path::new("/a/dist-prod/c.ts"), &patterns));
        assert!(!is_excluded(Path::new("/a/src/c.ts"), &patterns));
    }
}
