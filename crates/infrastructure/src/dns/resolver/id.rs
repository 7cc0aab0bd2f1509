use std::sync::Mutex;

/// Supplies transaction ids, one per query.
pub trait TransactionIdSource: Send + Sync {
    fn next_id(&self) -> u16;
}

/// Uniformly random ids from a `fastrand` generator.
pub struct RandomIds {
    rng: Mutex<fastrand::Rng>,
}

impl RandomIds {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Reproducible sequence, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionIdSource for RandomIds {
    fn next_id(&self) -> u16 {
        match self.rng.lock() {
            Ok(mut rng) => rng.u16(..),
            Err(poisoned) => poisoned.into_inner().u16(..),
        }
    }
}
