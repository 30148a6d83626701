use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random levels for faction bands and encounter zones.
#[cfg_attr(test, mockall::automock)]
pub trait LevelRoller {
    /// Uniform level in `[min, max]`, inclusive. Returns `min` when the band
    /// is empty or inverted.
    fn roll(&mut self, min: i32, max: i32) -> i32;
}

/// Deterministic roller; the same seed always produces the same patch.
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LevelRoller for SeededRoller {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}
