// Similarity guard.
//
// Decides whether two words are too similar to follow one another in a
// poem, e.g. if one is the other plus "s". A heuristic, not a linguistic
// analyzer: false negatives on other inflections are expected and
// acceptable. Symmetric in its arguments.

/// Closed-class words that read as the same word in adjacent positions.
const NEAR_SYNONYM_CLUSTER: &[&str] = &["the", "thee", "them"];

/// `full` == `base` + `suffix`, byte-wise.
fn extends_with(base: &str, suffix: &str, full: &str) -> bool {
    full.len() == base.len() + suffix.len() && full.starts_with(base) && full.ends_with(suffix)
}

/// Naive past tense: `longer` is `shorter` + "d" where `shorter` ends in
/// "e" (riposte → riposted). Both originals must be longer than 2 chars.
fn past_tense_pair(shorter: &str, longer: &str) -> bool {
    shorter.len() > 2 && longer.len() > 2 && shorter.ends_with('e') && extends_with(shorter, "d", longer)
}

/// Check whether two words are too similar to co-occur adjacently.
///
/// True when: exact match; one is the other plus a trailing "s" (plural);
/// plus "ly" (adverb); plus "d" on an "e"-stem (past tense); or both sit in
/// the near-synonym stopword cluster. Empty tokens are never similar.
pub fn too_similar(word1: &str, word2: &str) -> bool {
    if word1.is_empty() || word2.is_empty() {
        return false;
    }
    if word1 == word2 {
        return true;
    }
    if extends_with(word1, "s", word2) || extends_with(word2, "s", word1) {
        return true;
    }
    if extends_with(word1, "ly", word2) || extends_with(word2, "ly", word1) {
        return true;
    }
    if past_tense_pair(word1, word2) || past_tense_pair(word2, word1) {
        return true;
    }
    if NEAR_SYNONYM_CLUSTER.contains(&word1) && NEAR_SYNONYM_CLUSTER.contains(&word2) {
        return true;
    }
    false
}

/// Check a word against every member of a comparison set.
pub fn too_similar_to_any<'a, I>(word: &str, others: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    others.into_iter().any(|other| too_similar(word, other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert!(too_similar("dog", "dog"));
        assert!(!too_similar("self", "other"));
    }

    #[test]
    fn test_plural_both_directions() {
        assert!(too_similar("dog", "dogs"));
        assert!(too_similar("dogs", "dog"));
    }

    #[test]
    fn test_adverb_both_directions() {
        assert!(too_similar("spherical", "spherically"));
        assert!(too_similar("spherically", "spherical"));
    }

    #[test]
    fn test_past_tense_both_directions() {
        assert!(too_similar("riposte", "riposted"));
        assert!(too_similar("riposted", "riposte"));
        // The "e"-stem requirement: "ban"/"band" is not a past-tense pair.
        assert!(!too_similar("ban", "band"));
    }

    #[test]
    fn test_near_synonym_cluster() {
        assert!(too_similar("thee", "the"));
        assert!(too_similar("the", "them"));
        assert!(!too_similar("the", "theme"));
    }

    #[test]
    fn test_empty_tokens_never_similar() {
        assert!(!too_similar("", "dog"));
        assert!(!too_similar("dog", ""));
    }

    #[test]
    fn test_against_list() {
        let words = ["dogs".to_string(), "mushroom".to_string(), "riposted".to_string()];
        assert!(too_similar_to_any("riposte", words.iter().map(String::as_str)));
        let words = ["dogs".to_string(), "mushroom".to_string(), "quails".to_string()];
        assert!(!too_similar_to_any("riposte", words.iter().map(String::as_str)));
    }
}
