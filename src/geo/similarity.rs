//! String similarity scoring for approximate gazetteer matching.

/// Scores how alike two already-normalized strings are, 0 (unrelated) to 100 (identical).
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, candidate: &str, reference: &str) -> u8;
}

/// Edit-distance ratio over the whole string.
#[derive(Debug, Default, Clone, Copy)]
pub struct LevenshteinRatio;

impl SimilarityScorer for LevenshteinRatio {
    fn score(&self, candidate: &str, reference: &str) -> u8 {
        ratio(candidate, reference)
    }
}

/// Edit-distance ratio after sorting whitespace tokens, so word order does not matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenSortRatio;

impl SimilarityScorer for TokenSortRatio {
    fn score(&self, candidate: &str, reference: &str) -> u8 {
        ratio(&sort_tokens(candidate), &sort_tokens(reference))
    }
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// `100 * (1 - distance / longest)`, rounded to the nearest integer.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longest = len_a.max(len_b);
    if len_a == 0 || len_b == 0 {
        return 0;
    }
    let distance = levenshtein(a, b);
    let same = longest - distance;
    ((100 * same + longest / 2) / longest) as u8
}

/// Levenshtein distance over chars, two-row dynamic programming.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("cuiba", "cuiaba"), 1);
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio("sinop", "sinop"), 100);
        assert_eq!(ratio("", "sinop"), 0);
        assert_eq!(ratio("abc", "xyz"), 0);
    }

    #[test]
    fn test_ratio_rounding() {
        // 4 of 5 chars survive
        assert_eq!(ratio("sinoo", "sinop"), 80);
        // 5 of 6
        assert_eq!(ratio("cuiba", "cuiaba"), 83);
    }

    #[test]
    fn test_token_sort_ignores_word_order() {
        let scorer = TokenSortRatio;
        assert_eq!(scorer.score("grande varzea", "varzea grande"), 100);
        assert!(LevenshteinRatio.score("grande varzea", "varzea grande") < 100);
    }

    #[test]
    fn test_scorer_is_symmetric() {
        let scorer = TokenSortRatio;
        assert_eq!(
            scorer.score("rondonopolis", "rondonpolis"),
            scorer.score("rondonpolis", "rondonopolis")
        );
    }
}
