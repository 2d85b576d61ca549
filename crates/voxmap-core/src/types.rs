use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of artifact a transcript phrase can resolve to.
///
/// Kinds mirror the four index maps: file names, folder names, component
/// declarations, and function declarations. Folders are indexed but never
/// offered as match candidates.
///
/// # Examples
///
/// ```
/// use voxmap_core::ArtifactKind;
///
/// assert_eq!(ArtifactKind::Component.to_string(), "component");
/// assert_eq!("file".parse::<ArtifactKind>().unwrap(), ArtifactKind::File);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A tracked file, keyed by its lowercased base name and stem.
    File,
    /// A directory between a tracked file and the session root.
    Folder,
    /// A class declaration, or a function whose name starts uppercase.
    Component,
    /// A declared or assigned function whose name starts lowercase.
    Function,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::File => "file",
            ArtifactKind::Folder => "folder",
            ArtifactKind::Component => "component",
            ArtifactKind::Function => "function",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(ArtifactKind::File),
            "folder" => Ok(ArtifactKind::Folder),
            "component" => Ok(ArtifactKind::Component),
            "function" => Ok(ArtifactKind::Function),
            _ => Err(format!("unknown artifact kind: {s}")),
        }
    }
}

/// A single resolved artifact with its relevance score.
///
/// `name` is the display name: components and functions render as
/// `Name (file.ext)`, files render as their base name in original case.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use voxmap_core::{ArtifactKind, MatchCandidate};
///
/// let candidate = MatchCandidate {
///     name: "Button (Button.tsx)".into(),
///     path: PathBuf::from("/repo/components/Button.tsx"),
///     kind: ArtifactKind::Component,
///     score: 1.0,
/// };
/// assert_eq!(candidate.kind, ArtifactKind::Component);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    /// Display name of the artifact.
    pub name: String,
    /// Absolute path of the artifact on disk.
    pub path: PathBuf,
    /// Which index map the artifact came from.
    pub kind: ArtifactKind,
    /// Relevance in `[0.0, 1.0]`; higher is a stronger match.
    pub score: f64,
}

/// The result of resolving one transcript against the index.
///
/// `annotated_transcript` is the transcript with matched tokens rewritten to
/// `@DisplayName` back-references and consumed phrase tokens removed.
/// `matches` is sorted by descending score; ties keep discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMatch {
    /// Transcript text with matched tokens rewritten in place.
    pub annotated_transcript: String,
    /// All accepted candidates, highest score first.
    pub matches: Vec<MatchCandidate>,
}

impl TranscriptMatch {
    /// Renders the result as a Markdown fragment with a match table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("## Transcript\n\n");
        out.push_str(&format!("> {}\n\n", self.annotated_transcript));
        if self.matches.is_empty() {
            out.push_str("No matches found.\n");
            return out;
        }
        out.push_str("| # | Artifact | Kind | Score | Path |\n");
        out.push_str("|---|----------|------|-------|------|\n");
        for (i, m) in self.matches.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {} | {:.2} | `{}` |\n",
                i + 1,
                m.name,
                m.kind,
                m.score,
                m.path.display()
            ));
        }
        out
    }
}

impl fmt::Display for TranscriptMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.annotated_transcript)?;
        writeln!(f)?;
        if self.matches.is_empty() {
            writeln!(f, "No matches found.")?;
            return Ok(());
        }
        for (i, m) in self.matches.iter().enumerate() {
            writeln!(f, "{:>3}. {} [{}] score {:.2}", i + 1, m.name, m.kind, m.score)?;
            writeln!(f, "     {}", m.path.display())?;
        }
        Ok(())
    }
}

/// Output format for command results.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use voxmap_core::OutputFormat;
///
/// let format: OutputFormat = "json".parse().unwrap();
/// assert_eq!(format, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown, suitable for pasting into issues or docs.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("unknown output format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_kind_round_trips_through_strings() {
        for kind in [
            ArtifactKind::File,
            ArtifactKind::Folder,
            ArtifactKind::Component,
            ArtifactKind::Function,
        ] {
            let parsed: ArtifactKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("widget".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn match_candidate_serializes_camel_case() {
        let candidate = MatchCandidate {
            name: "helper.ts".into(),
            path: PathBuf::from("/repo/utils/helper.ts"),
            kind: ArtifactKind::File,
            score: 0.9,
        };
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["kind"], "file");
        assert_eq!(value["score"], 0.9);
        assert!(value["path"].as_str().unwrap().ends_with("helper.ts"));
    }

    #[test]
    fn transcript_match_serializes_camel_case() {
        let result = TranscriptMatch {
            annotated_transcript: "open @helper.ts".into(),
            matches: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["annotatedTranscript"], "open @helper.ts");
        assert!(value["matches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn display_lists_matches_in_order() {
        let result = TranscriptMatch {
            annotated_transcript: "open @Button (Button.tsx)".into(),
            matches: vec![
                MatchCandidate {
                    name: "Button (Button.tsx)".into(),
                    path: PathBuf::from("/repo/components/Button.tsx"),
                    kind: ArtifactKind::Component,
                    score: 1.0,
                },
                MatchCandidate {
                    name: "helper.ts".into(),
                    path: PathBuf::from("/repo/utils/helper.ts"),
                    kind: ArtifactKind::File,
                    score: 0.8,
                },
            ],
        };
        let text = result.to_string();
        let button = text.find("Button (Button.tsx)").unwrap();
        let helper = text.find("helper.ts").unwrap();
        assert!(button < helper);
        assert!(text.contains("score 1.00"));
    }

    #[test]
    fn markdown_includes_table_when_matches_exist() {
        let result = TranscriptMatch {
            annotated_transcript: "open @helper.ts".into(),
            matches: vec![MatchCandidate {
                name: "helper.ts".into(),
                path: PathBuf::from("/repo/utils/helper.ts"),
                kind: ArtifactKind::File,
                score: 0.9,
            }],
        };
        let md = result.to_markdown();
        assert!(md.contains("| # | Artifact | Kind | Score | Path |"));
        assert!(md.contains("| 1 | helper.ts | file | 0.90 |"));
    }

    #[test]
    fn markdown_reports_empty_result() {
        let result = TranscriptMatch {
            annotated_transcript: "nothing here".into(),
            matches: vec![],
        };
        assert!(result.to_markdown().contains("No matches found."));
    }

    #[test]
    fn output_format_parses_aliases() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
