use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::extractor::{SourceLanguage, SymbolExtractor, SymbolKind, TreeSitterExtractor};
use crate::walker::{self, WalkOptions};

/// Source files larger than this skip symbol extraction; their name keys are
/// still registered.
const MAX_SOURCE_SIZE: u64 = 1_048_576;

/// Entry counts per index map.
///
/// `file_keys` counts keys, not files: each file contributes its base name
/// and its stem, so a file usually counts twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub file_keys: usize,
    pub folders: usize,
    pub components: usize,
    pub functions: usize,
}

/// A component or function registered in the index.
///
/// The map key is the lowercased name; the entry keeps the declared casing
/// for back-reference display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub path: PathBuf,
}

/// The live index over one session root.
///
/// Four maps keyed by lowercased names: file name keys, folder names,
/// component declarations, and function declarations. All maps preserve
/// insertion order, and re-inserting an existing key updates its value while
/// keeping the key's original position. Matching walks the maps in that
/// order, so earlier discoveries win ties.
pub struct ArtifactIndex {
    root: PathBuf,
    options: WalkOptions,
    extractor: Box<dyn SymbolExtractor + Send + Sync>,
    files: IndexMap<String, PathBuf>,
    folders: IndexMap<String, PathBuf>,
    components: IndexMap<String, SymbolEntry>,
    functions: IndexMap<String, SymbolEntry>,
    initialized: bool,
}

impl ArtifactIndex {
    /// Creates an empty index over `root` with default options and the
    /// tree-sitter extractor.
    pub fn new(root: &Path) -> Self {
        Self::with_options(root, WalkOptions::default())
    }

    /// Creates an empty index with explicit walk options.
    pub fn with_options(root: &Path, options: WalkOptions) -> Self {
        Self::with_extractor(root, options, Box::new(TreeSitterExtractor))
    }

    /// Creates an empty index with an explicit extractor implementation.
    pub fn with_extractor(
        root: &Path,
        options: WalkOptions,
        extractor: Box<dyn SymbolExtractor + Send + Sync>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            options,
            extractor,
            files: IndexMap::new(),
            folders: IndexMap::new(),
            components: IndexMap::new(),
            functions: IndexMap::new(),
            initialized: false,
        }
    }

    /// Registers every file from a bulk enumeration.
    ///
    /// Does nothing if the index is already initialized. Per-file extraction
    /// failures are logged and skipped.
    pub fn initialize(&mut self, bulk_files: &[PathBuf]) {
        if self.initialized {
            return;
        }
        for file in bulk_files {
            self.handle_create(file);
        }
        self.initialized = true;
        tracing::debug!("registered {} files under {}", bulk_files.len(), self.root.display());
    }

    /// Registers one file: name keys, ancestor folders, and symbols for
    /// source files.
    ///
    /// Untracked extensions are ignored. Re-registering an existing name
    /// updates its path while keeping the name's original map position.
    pub fn handle_create(&mut self, path: &Path) {
        if !walker::is_tracked(path) {
            return;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        self.files.insert(file_name.to_lowercase(), path.to_path_buf());
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.files.insert(stem.to_lowercase(), path.to_path_buf());
        }
        self.register_folders(path);
        if walker::is_source(path) {
            self.scan_symbols(path);
        }
    }

    /// Unregisters one file: its name keys, symbols recorded at its path,
    /// and any folders left without tracked files.
    ///
    /// The folder map is rebuilt from the current tree, so a folder name
    /// disappears exactly when its last tracked file is gone.
    pub fn handle_delete(&mut self, path: &Path) {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            self.files.shift_remove(file_name.to_lowercase().as_str());
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.files.shift_remove(stem.to_lowercase().as_str());
        }
        self.components.retain(|_, entry| entry.path != path);
        self.functions.retain(|_, entry| entry.path != path);
        self.rebuild_folders();
    }

    /// Re-extracts symbols after a content change.
    ///
    /// Only source files are affected; file and folder maps never change
    /// here because the path did not.
    pub fn handle_change(&mut self, path: &Path) {
        if !walker::is_source(path) {
            return;
        }
        self.components.retain(|_, entry| entry.path != path);
        self.functions.retain(|_, entry| entry.path != path);
        self.scan_symbols(path);
    }

    /// Clears all four maps and the initialized flag.
    pub fn reset(&mut self) {
        self.files.clear();
        self.folders.clear();
        self.components.clear();
        self.functions.clear();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn walk_options(&self) -> &WalkOptions {
        &self.options
    }

    /// Entry counts per map.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            file_keys: self.files.len(),
            folders: self.folders.len(),
            components: self.components.len(),
            functions: self.functions.len(),
        }
    }

    /// File name keys in insertion order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.files.iter().map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Folder names in insertion order.
    pub fn folders(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.folders.iter().map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Component entries in insertion order, keyed by lowercased name.
    pub fn components(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> + '_ {
        self.components.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Function entries in insertion order, keyed by lowercased name.
    pub fn functions(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> + '_ {
        self.functions.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn file(&self, key: &str) -> Option<&Path> {
        self.files.get(key).map(PathBuf::as_path)
    }

    pub fn folder(&self, key: &str) -> Option<&Path> {
        self.folders.get(key).map(PathBuf::as_path)
    }

    pub fn component(&self, key: &str) -> Option<&SymbolEntry> {
        self.components.get(key)
    }

    pub fn function(&self, key: &str) -> Option<&SymbolEntry> {
        self.functions.get(key)
    }

    /// Registers every directory between `path` and the root, exclusive.
    fn register_folders(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor == self.root {
                break;
            }
            let Some(name) = ancestor.file_name().and_then(|n| n.to_str()) else {
                break;
            };
            self.folders.insert(name.to_lowercase(), ancestor.to_path_buf());
        }
    }

    fn rebuild_folders(&mut self) {
        self.folders.clear();
        let files = match walker::enumerate_tree(&self.root, &self.options) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("folder rebuild failed for {}: {e}", self.root.display());
                return;
            }
        };
        for file in files {
            self.register_folders(&file);
        }
    }

    fn scan_symbols(&mut self, path: &Path) {
        let Some(language) = SourceLanguage::from_path(path) else {
            return;
        };
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > MAX_SOURCE_SIZE => {
                tracing::debug!("skipping symbol extraction for large file {}", path.display());
                return;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("failed to stat {}: {e}", path.display());
                return;
            }
        }
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                return;
            }
        };
        let declarations = match self.extractor.extract(&source, language) {
            Ok(declarations) => declarations,
            Err(e) => {
                tracing::warn!("symbol extraction failed for {}: {e}", path.display());
                return;
            }
        };
        for declaration in declarations {
            let target = match declaration.classify() {
                SymbolKind::Component => &mut self.components,
                SymbolKind::Function => &mut self.functions,
            };
            target.insert(
                declaration.name.to_lowercase(),
                SymbolEntry {
                    name: declaration.name,
                    path: path.to_path_buf(),
                },
            );
        }
    }
}

impl fmt::Debug for ArtifactIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactIndex")
            .field("root", &self.root)
            .field("files", &self.files.len())
            .field("folders", &self.folders.len())
            .field("components", &self.components.len())
            .field("functions", &self.functions.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}
