//! Location-independent edit distance
//!
//! [`substring_distance`] is the semi-global (Sellers) variant of
//! Levenshtein distance: the pattern may align with any window of the text,
//! so leading and trailing text is free. The result is the minimum number of
//! insertions, deletions and substitutions needed to turn the pattern into
//! some substring of the text.

/// Minimum edit distance between `pattern` and any substring of `text`
///
/// Always in `0..=pattern.len()`; an empty pattern costs nothing.
#[must_use]
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }

    // Row 0 is all zeros: the alignment may start at any text offset.
    let mut prev = vec![0usize; text.len() + 1];
    let mut curr = vec![0usize; text.len() + 1];

    for (i, &pc) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &tc) in text.iter().enumerate() {
            let substitution = prev[j] + usize::from(pc != tc);
            let skip_text = curr[j] + 1;
            let skip_pattern = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(skip_text).min(skip_pattern);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    // Row m: the alignment may end at any text offset.
    prev.into_iter().min().unwrap_or(pattern.len())
}

/// [`substring_distance`] divided by the pattern length, in `[0, 1]`
///
/// `0.0` is an exact occurrence, `1.0` means nothing lines up.
#[must_use]
pub fn normalized_cost(pattern: &[char], text: &[char]) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let cost = substring_distance(pattern, text) as f64 / pattern.len() as f64;
    cost
}
