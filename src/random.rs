use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of hole indices for new frogs.
pub(crate) trait HolePicker {
    /// Uniform integer in `[min, max)`. `max` must be greater than `min`.
    fn random_int(&mut self, min: usize, max: usize) -> usize;
}

pub(crate) struct RandomScheduler {
    rng: StdRng,
}

impl RandomScheduler {
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl HolePicker for RandomScheduler {
    fn random_int(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        let mut r = RandomScheduler::seeded(7);
        for _ in 0..1000 {
            let i = r.random_int(2, 5);
            assert!((2..5).contains(&i));
        }
    }

    #[test]
    fn single_slot_range() {
        let mut r = RandomScheduler::seeded(1);
        assert_eq!(r.random_int(0, 1), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomScheduler::seeded(0xC0FFEE);
        let mut b = RandomScheduler::seeded(0xC0FFEE);
        let xs: Vec<usize> = (0..32).map(|_| a.random_int(0, 5)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.random_int(0, 5)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn covers_every_hole_eventually() {
        let mut r = RandomScheduler::seeded(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[r.random_int(0, 5)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
