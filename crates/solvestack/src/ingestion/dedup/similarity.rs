//! Longest-common-block similarity (Ratcliff/Obershelp).
//!
//! The ratio is `2 * M / T`, where `M` is the number of characters covered by the recursively
//! discovered matching blocks and `T` the combined length of both inputs. No junk heuristics are
//! applied, so the result depends on the two inputs alone.

/// Case-insensitive title similarity in `[0.0, 1.0]`.
pub fn title_similarity(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.to_lowercase().chars().collect();
    let right: Vec<char> = right.to_lowercase().chars().collect();
    sequence_ratio(&left, &right)
}

pub fn sequence_ratio<T: PartialEq>(left: &[T], right: &[T]) -> f64 {
    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_characters(left, right);
    (2 * matched) as f64 / total as f64
}

fn matching_characters<T: PartialEq>(left: &[T], right: &[T]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, left.len(), 0, right.len())];

    while let Some((left_lo, left_hi, right_lo, right_hi)) = pending.pop() {
        let block = longest_block(left, right, left_lo, left_hi, right_lo, right_hi);
        if block.size == 0 {
            continue;
        }
        matched += block.size;

        if left_lo < block.left && right_lo < block.right {
            pending.push((left_lo, block.left, right_lo, block.right));
        }
        let left_end = block.left + block.size;
        let right_end = block.right + block.size;
        if left_end < left_hi && right_end < right_hi {
            pending.push((left_end, left_hi, right_end, right_hi));
        }
    }

    matched
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    left: usize,
    right: usize,
    size: usize,
}

/// Longest common run within the given windows. Ties resolve to the run starting earliest in
/// `left`, then earliest in `right`.
fn longest_block<T: PartialEq>(
    left: &[T],
    right: &[T],
    left_lo: usize,
    left_hi: usize,
    right_lo: usize,
    right_hi: usize,
) -> Block {
    let width = right_hi - right_lo;
    let mut best = Block {
        left: left_lo,
        right: right_lo,
        size: 0,
    };
    let mut previous = vec![0usize; width + 1];
    let mut current = vec![0usize; width + 1];

    for i in left_lo..left_hi {
        for j in right_lo..right_hi {
            let column = j - right_lo + 1;
            if left[i] == right[j] {
                let run = previous[column - 1] + 1;
                current[column] = run;
                if run > best.size {
                    best = Block {
                        left: i + 1 - run,
                        right: j + 1 - run,
                        size: run,
                    };
                }
            } else {
                current[column] = 0;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    best
}
