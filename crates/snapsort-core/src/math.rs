//! Shared math utilities.

/// Softmax over a slice of logits, max-subtracted for numerical stability.
///
/// Returns an empty vector for empty input; otherwise the result sums to 1.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return vec![];
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&x| x / sum).collect()
}

/// Index of the maximum value, first occurrence winning on exact ties.
///
/// Uses a strict `>` comparison so that equal scores resolve to the
/// lowest index. NaN values never displace an existing maximum.
pub fn argmax_first(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_stable_with_large_logits() {
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_uniform_on_equal_logits() {
        let probs = softmax(&[0.5, 0.5, 0.5, 0.5]);
        for p in &probs {
            assert!((p - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn test_argmax_first_basic() {
        assert_eq!(argmax_first(&[0.1, 0.7, 0.2]), Some(1));
    }

    #[test]
    fn test_argmax_first_tie_picks_lowest_index() {
        assert_eq!(argmax_first(&[0.3, 0.5, 0.5, 0.1]), Some(1));
        assert_eq!(argmax_first(&[0.5, 0.5]), Some(0));
    }

    #[test]
    fn test_argmax_first_empty() {
        assert_eq!(argmax_first(&[]), None);
    }

    #[test]
    fn test_argmax_first_ignores_nan() {
        assert_eq!(argmax_first(&[0.2, f32::NAN, 0.4]), Some(2));
    }
}
