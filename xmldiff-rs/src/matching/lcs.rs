//! Longest-common-subsequence alignment.

/// One aligned position: a node from each side, or from only one of them.
pub type Slot<T> = (Option<T>, Option<T>);

/// Fills the (|a|+1)×(|b|+1) score table, row-major.
fn score_table<K: PartialEq, T>(a: &[(K, T)], b: &[(K, T)]) -> Vec<u32> {
    let width = b.len() + 1;
    let mut score = vec![0u32; (a.len() + 1) * width];

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            score[i * width + j] = if a[i - 1].0 == b[j - 1].0 {
                score[(i - 1) * width + j - 1] + 1
            } else {
                score[(i - 1) * width + j].max(score[i * width + j - 1])
            };
        }
    }
    score
}

/// Aligns two keyed sequences.
///
/// The number of slots holding both sides equals the LCS length of the two
/// key sequences. Ties are broken the same way every time: where dropping
/// the current `a` item scores at least as well as dropping the current `b`
/// item, the path that already consumed `b` wins and the `a`-only slot is
/// appended last. On an equal-length replacement the insertion therefore
/// precedes the deletion.
pub fn align<K: PartialEq, T: Copy>(a: &[(K, T)], b: &[(K, T)]) -> Vec<Slot<T>> {
    let width = b.len() + 1;
    let score = score_table(a, b);

    let mut slots = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        if i == 0 {
            slots.push((None, Some(b[j - 1].1)));
            j -= 1;
        } else if j == 0 {
            slots.push((Some(a[i - 1].1), None));
            i -= 1;
        } else if a[i - 1].0 == b[j - 1].0 {
            slots.push((Some(a[i - 1].1), Some(b[j - 1].1)));
            i -= 1;
            j -= 1;
        } else if score[(i - 1) * width + j] >= score[i * width + j - 1] {
            slots.push((Some(a[i - 1].1), None));
            i -= 1;
        } else {
            slots.push((None, Some(b[j - 1].1)));
            j -= 1;
        }
    }
    slots.reverse();
    slots
}

/// Length of the longest common subsequence of two key sequences.
pub fn lcs_length<K: PartialEq, T>(a: &[(K, T)], b: &[(K, T)]) -> usize {
    let score = score_table(a, b);
    score.last().copied().unwrap_or(0) as usize
}
