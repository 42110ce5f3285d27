//! Randomness shared by the study engines.
//!
//! Every engine owns its own generator so a seeded session replays exactly.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Generator type used by all engines.
pub type StudyRng = Mcg128Xsl64;

/// Seeded generator for reproducible sessions, entropy-seeded otherwise.
pub fn study_rng(seed: Option<u64>) -> StudyRng {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

/// Uniform random permutation (Fisher-Yates) of `items`, leaving the input
/// untouched.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut StudyRng) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
