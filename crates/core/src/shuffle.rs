use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Randomness provider for question and option ordering.
///
/// `Thread` draws from the process-wide generator and is not reproducible.
/// `Seeded` owns its own generator so a given seed always yields the same
/// sequence of permutations.
#[derive(Debug, Clone, Default)]
pub enum Shuffler {
    #[default]
    Thread,
    Seeded(StdRng),
}

impl Shuffler {
    #[must_use]
    pub fn thread() -> Self {
        Self::Thread
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    /// Returns a uniformly random permutation of `items`.
    ///
    /// The input is copied before the Fisher-Yates pass, so callers keep their
    /// original ordering. Empty and single-element inputs come back unchanged.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        if out.len() < 2 {
            return out;
        }
        match self {
            Shuffler::Thread => out.shuffle(&mut rand::rng()),
            Shuffler::Seeded(rng) => out.shuffle(rng),
        }
        out
    }
}
