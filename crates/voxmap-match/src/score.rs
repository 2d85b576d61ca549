//! Similarity scoring between a query token and a candidate name.
//!
//! A substring and hyphen-boundary heuristic, not edit distance. Camel-case
//! boundaries are not treated specially.

/// Scores how well `query` matches `candidate`, both pre-lowercased.
///
/// Non-alphanumeric characters are stripped from both sides before
/// comparison. Tiers:
///
/// - equal after stripping: `1.0`
/// - candidate contains query: `0.9` when the occurrence aligns with hyphen
///   boundaries in the raw candidate, `0.8` otherwise
/// - query contains candidate, and the stripped candidate is longer than 3
///   characters: `0.7`
/// - otherwise: `0.0`
///
/// # Examples
///
/// ```
/// use voxmap_match::score::score;
///
/// assert_eq!(score("userprofile", "user-profile"), 1.0);
/// assert_eq!(score("profile", "user-profile"), 0.9);
/// assert_eq!(score("rofil", "user-profile"), 0.8);
/// assert_eq!(score("formatters", "format"), 0.7);
/// assert_eq!(score("button", "sidebar"), 0.0);
/// ```
pub fn score(query: &str, candidate: &str) -> f64 {
    let stripped_query = strip_non_alphanumeric(query);
    let stripped_candidate = strip_non_alphanumeric(candidate);

    if stripped_candidate == stripped_query {
        return 1.0;
    }

    if stripped_candidate.contains(&stripped_query) {
        if hyphen_boundary_aligned(candidate, &stripped_query) {
            return 0.9;
        }
        return 0.8;
    }

    if stripped_query.contains(&stripped_candidate) && stripped_candidate.len() > 3 {
        return 0.7;
    }

    0.0
}

/// Keeps only lowercase ASCII letters and digits, mirroring how queries and
/// candidate names are normalized before comparison.
fn strip_non_alphanumeric(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Checks whether `query` sits on hyphen boundaries within the raw
/// candidate: the whole name, a leading `query-`, a trailing `-query`, or an
/// interior `-query-`.
fn hyphen_boundary_aligned(candidate: &str, query: &str) -> bool {
    candidate == query
        || candidate.starts_with(&format!("{query}-"))
        || candidate.ends_with(&format!("-{query}"))
        || candidate.contains(&format!("-{query}-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_after_stripping_scores_one() {
        assert_eq!(score("button", "button"), 1.0);
        assert_eq!(score("userprofile", "user-profile"), 1.0);
        assert_eq!(score("helper", "helper.ts"), 0.8);
        assert_eq!(score("helperts", "helper.ts"), 1.0);
    }

    #[test]
    fn containment_scores_point_eight() {
        assert_eq!(score("butt", "button"), 0.8);
        assert_eq!(score("helper", "date_helper"), 0.8);
    }

    #[test]
    fn hyphen_boundaries_upgrade_containment() {
        assert_eq!(score("user", "user-profile"), 0.9);
        assert_eq!(score("profile", "user-profile"), 0.9);
        assert_eq!(score("error", "api-error-handler"), 0.9);
        // Inside a segment, no boundary alignment.
        assert_eq!(score("rofil", "user-profile"), 0.8);
        assert_eq!(score("use", "user-profile"), 0.8);
    }

    #[test]
    fn reverse_containment_needs_a_long_candidate() {
        assert_eq!(score("formatters", "format"), 0.7);
        assert_eq!(score("buttons", "butt"), 0.7);
        // Three characters or fewer never win the reverse tier.
        assert_eq!(score("into", "int"), 0.0);
        assert_eq!(score("formatted", "fmt"), 0.0);
    }

    #[test]
    fn unrelated_names_score_zero() {
        assert_eq!(score("button", "sidebar"), 0.0);
        assert_eq!(score("alpha", "beta"), 0.0);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let queries = ["button", "user", "x", "user-profile", "formatters", ""];
        let candidates = ["button", "user-profile", "b", "format", "", "api-error-handler"];
        for query in queries {
            for candidate in candidates {
                let s = score(query, candidate);
                assert!((0.0..=1.0).contains(&s), "score({query:?}, {candidate:?}) = {s}");
            }
        }
    }

    #[test]
    fn punctuation_is_ignored_on_both_sides() {
        assert_eq!(score("button,", "button"), 1.0);
        assert_eq!(score("button", "button.tsx"), 0.8);
    }
}
