use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Random numbers consumed by the simulator and the vision stub.
pub trait SimulationSource: Send + Sync {
    /// Uniform sample from the closed interval `[low, high]`.
    fn uniform(&self, low: f64, high: f64) -> f64;

    /// Fair coin.
    fn coin_flip(&self) -> bool;
}

/// [`SimulationSource`] backed by a `StdRng`.
pub struct RandSource {
    rng: Mutex<StdRng>,
}

impl RandSource {
    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic generator, same seed gives the same sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable generator
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut rng)
    }
}

impl SimulationSource for RandSource {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.with_rng(|rng| rng.random_range(low..=high))
    }

    fn coin_flip(&self) -> bool {
        self.with_rng(|rng| rng.random_bool(0.5))
    }
}

impl std::fmt::Debug for RandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandSource").finish_non_exhaustive()
    }
}
