use std::collections::HashMap;

use ark_bls12_381::Fq12;
use ark_ff::{Field, One};

/// Find `z` in `[-bound, bound]` such that `base^z == target`, using
/// baby-step giant-step over the shifted range `[0, 2 * bound]`.
///
/// `bound` must not exceed `crate::MAX_BOUND`.
pub(crate) fn discrete_log(base: Fq12, target: Fq12, bound: u64) -> Option<i64> {
    let span = 2 * bound + 1;
    let mut m = span.isqrt();
    if m * m < span {
        m += 1;
    }

    let mut baby_steps = HashMap::with_capacity(m as usize);
    let mut step = Fq12::one();
    for j in 0..m {
        baby_steps.entry(step).or_insert(j);
        step *= base;
    }

    // step is now base^m
    let giant = step.inverse()?;
    let mut current = target * base.pow([bound]);
    for i in 0..m {
        if let Some(j) = baby_steps.get(&current) {
            let shifted = i * m + j;
            return (shifted < span).then(|| shifted as i64 - bound as i64);
        }
        current *= giant;
    }

    None
}
