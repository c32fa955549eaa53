//! Random tuple identifiers for PIDF bodies

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Length of every generated tuple id
pub const TUPLE_ID_LEN: usize = 8;

/// Produces short alphanumeric ids for the `tuple/@id` attribute.
///
/// The generator is seeded once and shared; the mutex serializes workers.
/// Ids are not unique across processes and carry no cryptographic strength.
#[derive(Debug)]
pub struct TupleIdGenerator {
    rng: Mutex<SmallRng>,
}

impl TupleIdGenerator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Create a deterministic generator
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Generate one id of [`TUPLE_ID_LEN`] characters from `[a-zA-Z0-9]`
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock();
        (0..TUPLE_ID_LEN).map(|_| random_char(&mut *rng)).collect()
    }
}

impl Default for TupleIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Pick the class first (lower, upper, digit), then a character inside it.
fn random_char<R: Rng + ?Sized>(rng: &mut R) -> char {
    match rng.gen_range(0..3u8) {
        0 => char::from(b'a' + rng.gen_range(0..26u8)),
        1 => char::from(b'A' + rng.gen_range(0..26u8)),
        _ => char::from(b'0' + rng.gen_range(0..10u8)),
    }
}
