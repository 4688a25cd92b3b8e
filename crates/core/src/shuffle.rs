//! Deterministic, seed-keyed option ordering.
//!
//! Options for a scenario are shuffled with its id as the seed, so the order
//! is stable across renders and sessions without being stored anywhere.

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Folds the UTF-16 code units of `seed` into a 32-bit hash (`h * 31 + c`).
#[must_use]
pub fn seed_hash(seed: &str) -> u32 {
    seed.encode_utf16().fold(0u32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(u32::from(unit))
    })
}

/// Returns a copy of `items` permuted by a Fisher-Yates walk from the end,
/// driven by a linear congruential generator seeded from [`seed_hash`].
///
/// The same `seed` always yields the same permutation for a given length.
#[must_use]
pub fn shuffle_with_seed<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut out = items.to_vec();
    let mut hash = seed_hash(seed);
    for i in (1..out.len()).rev() {
        hash = hash.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        // i + 1 <= len, which came from a slice, so it fits in u32 for any
        // realistic option list; fall back to the full hash otherwise.
        let bound = u32::try_from(i + 1).unwrap_or(u32::MAX);
        let j = (hash % bound) as usize;
        out.swap(i, j);
    }
    out
}
