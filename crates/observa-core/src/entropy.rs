use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shared random source, injected through context so views stay testable.
#[derive(Clone)]
pub struct Entropy {
    rng: Rc<RefCell<SmallRng>>,
}

impl Entropy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Rc::new(RefCell::new(SmallRng::seed_from_u64(seed))),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Rc::new(RefCell::new(SmallRng::from_entropy())),
        }
    }

    /// Uniform pick; `None` only for an empty slice.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut *self.rng.borrow_mut())
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy").finish_non_exhaustive()
    }
}
