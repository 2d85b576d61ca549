use std::collections::HashSet;
use std::path::{Path, PathBuf};

use voxmap_core::{ArtifactKind, MatchCandidate, MatchConfig, TranscriptMatch};
use voxmap_index::{ArtifactIndex, SymbolEntry};

use crate::score;

/// Word-pass candidates must strictly exceed this score to be accepted.
pub const WORD_MATCH_THRESHOLD: f64 = 0.7;

/// Connective and command words never matched on their own.
const STOP_WORDS: &[&str] = &[
    "the", "to", "and", "in", "on", "at", "with", "by", "from", "up", "down", "for", "of",
    "above", "below", "change", "update", "modify", "set", "get", "make", "do", "does",
    "section", "some", "want", "need", "please", "can", "could", "would", "should", "will",
    "show", "me", "my", "open", "close", "save", "delete", "remove", "add", "new", "create",
];

/// Options for transcript matching.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Additional stop words (lowercase) skipped during the word pass.
    pub extra_stop_words: Vec<String>,
}

impl From<&MatchConfig> for MatchOptions {
    fn from(config: &MatchConfig) -> Self {
        Self {
            extra_stop_words: config
                .extra_stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }
}

/// Resolves a transcript against the index with default options.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use voxmap_index::{build_index, WalkOptions};
/// use voxmap_match::find_in_transcript;
///
/// let index = build_index(Path::new("."), WalkOptions::default()).unwrap();
/// let result = find_in_transcript(&index, "open the user profile");
/// println!("{}", result.annotated_transcript);
/// ```
pub fn find_in_transcript(index: &ArtifactIndex, transcript: &str) -> TranscriptMatch {
    find_in_transcript_with(index, transcript, &MatchOptions::default())
}

/// Resolves a transcript against the index.
///
/// Two passes over the whitespace-split tokens. The phrase pass greedily
/// tries two-word then three-word phrases against component and file names,
/// left to right without backtracking; consumed tokens are blanked. The word
/// pass scores every remaining token against files, components, and
/// functions, accepting the best candidate above [`WORD_MATCH_THRESHOLD`].
/// Each artifact path is claimed at most once per call.
///
/// Matched tokens are rewritten to `@DisplayName` back-references; the
/// annotated transcript is the non-blank tokens joined with single spaces.
/// Matches come back sorted by descending score, discovery order on ties.
pub fn find_in_transcript_with(
    index: &ArtifactIndex,
    transcript: &str,
    options: &MatchOptions,
) -> TranscriptMatch {
    let words: Vec<String> = transcript
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let mut annotated: Vec<String> = transcript
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let mut matches: Vec<MatchCandidate> = Vec::new();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    // Phrase pass. A successful phrase keeps its first token as the
    // back-reference and blanks the rest of the span; the scan resumes
    // after the span.
    let mut i = 0;
    while i + 1 < words.len() {
        let two_word = format!("{} {}", words[i], words[i + 1]);
        if try_phrase_match(index, &two_word, &mut matches, &mut claimed) {
            if let Some(found) = matches.last() {
                annotated[i] = format!("@{}", found.name);
            }
            annotated[i + 1].clear();
            i += 2;
            continue;
        }
        if i + 2 < words.len() {
            let three_word = format!("{} {} {}", words[i], words[i + 1], words[i + 2]);
            if try_phrase_match(index, &three_word, &mut matches, &mut claimed) {
                if let Some(found) = matches.last() {
                    annotated[i] = format!("@{}", found.name);
                }
                annotated[i + 1].clear();
                annotated[i + 2].clear();
                i += 3;
                continue;
            }
        }
        i += 1;
    }

    // Word pass, stricter: stop words and short tokens are skipped, and a
    // candidate whose path is already claimed leaves the token unmatched.
    for i in 0..words.len() {
        if annotated[i].is_empty() {
            continue;
        }
        let word = &words[i];
        if is_stop_word(word, &options.extra_stop_words) || word.len() < 3 {
            continue;
        }
        let Some(candidate) = find_best_match(index, word) else {
            continue;
        };
        if claimed.contains(&candidate.path) {
            continue;
        }
        annotated[i] = format!("@{}", candidate.name);
        claimed.insert(candidate.path.clone());
        matches.push(candidate);
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    let annotated_transcript = annotated
        .iter()
        .filter(|token| !token.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    TranscriptMatch {
        annotated_transcript,
        matches,
    }
}

/// Tries one phrase against component and file names.
///
/// Candidate keys have punctuation replaced by spaces before comparison.
/// The exact tier runs first, then the containment tier; each tier scans
/// components before files, in insertion order. First fit, not best fit.
fn try_phrase_match(
    index: &ArtifactIndex,
    phrase: &str,
    matches: &mut Vec<MatchCandidate>,
    claimed: &mut HashSet<PathBuf>,
) -> bool {
    let found = find_phrase_candidate(index, claimed, |name| name == phrase)
        .map(|hit| (hit, 1.0))
        .or_else(|| {
            find_phrase_candidate(index, claimed, |name| name.contains(phrase))
                .map(|hit| (hit, 0.9))
        });
    let Some(((name, path, kind), score)) = found else {
        return false;
    };
    claimed.insert(path.clone());
    matches.push(MatchCandidate {
        name,
        path,
        kind,
        score,
    });
    true
}

/// Returns the first unclaimed component or file whose normalized key
/// satisfies the predicate, with its display name.
fn find_phrase_candidate(
    index: &ArtifactIndex,
    claimed: &HashSet<PathBuf>,
    hit: impl Fn(&str) -> bool,
) -> Option<(String, PathBuf, ArtifactKind)> {
    for (key, entry) in index.components() {
        if hit(&normalize_phrase_name(key)) && !claimed.contains(&entry.path) {
            return Some((
                symbol_display(entry),
                entry.path.clone(),
                ArtifactKind::Component,
            ));
        }
    }
    for (key, path) in index.files() {
        if hit(&normalize_phrase_name(key)) && !claimed.contains(path) {
            return Some((base_name(path).to_string(), path.to_path_buf(), ArtifactKind::File));
        }
    }
    None
}

/// Finds the single best word-pass candidate, or none above the threshold.
///
/// Files are scanned first, then components, then functions; replacement
/// requires a strictly greater score, so earlier maps win ties. Functions
/// only compete for tokens longer than four characters.
fn find_best_match(index: &ArtifactIndex, word: &str) -> Option<MatchCandidate> {
    let mut best: Option<MatchCandidate> = None;
    let mut best_score = WORD_MATCH_THRESHOLD;

    for (key, path) in index.files() {
        let score = score::score(word, key);
        if score > best_score {
            best_score = score;
            best = Some(MatchCandidate {
                name: base_name(path).to_string(),
                path: path.to_path_buf(),
                kind: ArtifactKind::File,
                score,
            });
        }
    }
    for (key, entry) in index.components() {
        let score = score::score(word, key);
        if score > best_score {
            best_score = score;
            best = Some(symbol_candidate(entry, ArtifactKind::Component, score));
        }
    }
    if word.len() > 4 {
        for (key, entry) in index.functions() {
            let score = score::score(word, key);
            if score > best_score {
                best_score = score;
                best = Some(symbol_candidate(entry, ArtifactKind::Function, score));
            }
        }
    }
    best
}

fn symbol_candidate(entry: &SymbolEntry, kind: ArtifactKind, score: f64) -> MatchCandidate {
    MatchCandidate {
        name: symbol_display(entry),
        path: entry.path.clone(),
        kind,
        score,
    }
}

/// Display form for a symbol: declared name plus its defining file.
fn symbol_display(entry: &SymbolEntry) -> String {
    format!("{} ({})", entry.name, base_name(&entry.path))
}

fn base_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Replaces punctuation in an already-lowercased key with spaces, so
/// hyphenated and dotted names can match multi-word phrases.
fn normalize_phrase_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn is_stop_word(word: &str, extra: &[String]) -> bool {
    STOP_WORDS.contains(&word) || extra.iter().any(|w| w == word)
}
