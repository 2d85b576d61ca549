use std::path::Path;

use tree_sitter::{Node, Parser};

use voxmap_core::{Result, VoxmapError};

/// Source languages eligible for symbol extraction.
///
/// `.vue` files are parsed with the TSX grammar on a best-effort basis;
/// extraction failures are logged and skipped, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    TypeScript,
    Tsx,
    JavaScript,
    Vue,
}

impl SourceLanguage {
    /// Maps a file path to its extraction language via the extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_extension(&ext)
    }

    /// Maps a lowercase extension to its extraction language.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxmap_index::extractor::SourceLanguage;
    ///
    /// assert_eq!(SourceLanguage::from_extension("tsx"), Some(SourceLanguage::Tsx));
    /// assert_eq!(SourceLanguage::from_extension("css"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            "js" | "jsx" => Some(SourceLanguage::JavaScript),
            "vue" => Some(SourceLanguage::Vue),
            _ => None,
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx | SourceLanguage::Vue => tree_sitter_typescript::LANGUAGE_TSX.into(),
            SourceLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

/// How a declaration appeared in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `class Foo { }`
    Class,
    /// `function foo() { }`
    Function,
    /// `const foo = () => { }` or `const foo = function () { }`
    FunctionExpression,
}

/// Which index map a declaration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Component,
    Function,
}

/// A named top-level or nested declaration found in a source file.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
}

impl Declaration {
    /// Classifies the declaration into its index map.
    ///
    /// Classes are always components. Functions and function expressions are
    /// components when their name starts with an uppercase letter, functions
    /// otherwise.
    pub fn classify(&self) -> SymbolKind {
        match self.kind {
            DeclarationKind::Class => SymbolKind::Component,
            DeclarationKind::Function | DeclarationKind::FunctionExpression => {
                if self.name.chars().next().is_some_and(char::is_uppercase) {
                    SymbolKind::Component
                } else {
                    SymbolKind::Function
                }
            }
        }
    }
}

/// Extracts named declarations from source text.
///
/// The seam exists so the index can be exercised without a real parser and so
/// other grammars can be plugged in later.
pub trait SymbolExtractor {
    /// Extracts all class, function, and assigned-function declarations.
    ///
    /// Implementations must tolerate malformed input: syntax errors yield
    /// partial results rather than failure.
    fn extract(&self, source: &str, language: SourceLanguage) -> Result<Vec<Declaration>>;
}

/// Tree-sitter backed [`SymbolExtractor`] for JavaScript and TypeScript.
///
/// Tree-sitter is error-tolerant, so files with syntax errors still yield
/// the declarations that did parse.
///
/// # Examples
///
/// ```
/// use voxmap_index::extractor::{SourceLanguage, SymbolExtractor, TreeSitterExtractor};
///
/// let extractor = TreeSitterExtractor;
/// let decls = extractor
///     .extract("function greet() {}", SourceLanguage::TypeScript)
///     .unwrap();
/// assert_eq!(decls.len(), 1);
/// assert_eq!(decls[0].name, "greet");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterExtractor;

impl SymbolExtractor for TreeSitterExtractor {
    fn extract(&self, source: &str, language: SourceLanguage) -> Result<Vec<Declaration>> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|e| VoxmapError::Parse(format!("failed to set language: {e}")))?;

        let Some(tree) = parser.parse(source, None) else {
            return Ok(Vec::new());
        };

        let mut declarations = Vec::new();
        collect_declarations(tree.root_node(), source.as_bytes(), &mut declarations);
        Ok(declarations)
    }
}

fn collect_declarations(node: Node, source: &[u8], declarations: &mut Vec<Declaration>) {
    match node.kind() {
        "class_declaration" => {
            let name = find_child_text(&node, "type_identifier", source)
                .or_else(|| find_child_text(&node, "identifier", source));
            if let Some(name) = name {
                declarations.push(Declaration {
                    name,
                    kind: DeclarationKind::Class,
                });
            }
        }
        "function_declaration" | "generator_function_declaration" => {
            if let Some(name) = find_child_text(&node, "identifier", source) {
                declarations.push(Declaration {
                    name,
                    kind: DeclarationKind::Function,
                });
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            // const foo = () => {} / var foo = function () {}
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() != "variable_declarator" {
                    continue;
                }
                let is_function = child_has_kind(&child, "arrow_function")
                    || child_has_kind(&child, "function_expression");
                if !is_function {
                    continue;
                }
                // Destructuring patterns have no identifier child and are skipped.
                if let Some(name) = find_child_text(&child, "identifier", source) {
                    declarations.push(Declaration {
                        name,
                        kind: DeclarationKind::FunctionExpression,
                    });
                }
            }
        }
        _ => {}
    }

    // Declarations nested in class bodies or function bodies count too.
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_declarations(child, source, declarations);
    }
}

fn node_text(node: &Node, source: &[u8]) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    if start >= source.len() || end > source.len() {
        return String::new();
    }
    String::from_utf8_lossy(&source[start..end]).to_string()
}

fn find_child_text(node: &Node, kind: &str, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            let text = node_text(&child, source);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn child_has_kind(node: &Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            return true;
        }
    }
    false
}
