use std::{fmt::Write as _, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;

use crate::ShapeKind;

/// How the next shape kind is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Randomizer {
    /// Independent uniform choice over all seven kinds, repeats allowed.
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds, dealt one bag at a time.
    ///
    /// Not the classic behavior of this game; offered as an opt-in.
    Bag,
}

/// Seed for deterministic piece generation.
///
/// Displayed and parsed as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed, Randomizer};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut a = PieceGenerator::with_seed(Randomizer::Uniform, seed);
/// let mut b = PieceGenerator::with_seed(Randomizer::Uniform, seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParsePieceSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePieceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl std::fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut hex = String::with_capacity(2 * self.0.len());
        for byte in self.0 {
            write!(&mut hex, "{byte:02x}")?;
        }
        f.write_str(&hex)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Source of shape kinds for newly spawned pieces.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    seed: PieceSeed,
    randomizer: Randomizer,
    bag: ArrayVec<ShapeKind, { ShapeKind::LEN }>,
}

impl PieceGenerator {
    /// Creates a generator seeded from the thread-local RNG.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_seed(randomizer, rand::rng().random())
    }

    /// Like [`Self::new`], but reproducible from `seed`.
    #[must_use]
    pub fn with_seed(randomizer: Randomizer, seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            seed,
            randomizer,
            bag: ArrayVec::new(),
        }
    }

    /// The seed this generator started from; replaying it yields the same kinds.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Draws the kind of the next piece.
    pub fn pop_next(&mut self) -> ShapeKind {
        match self.randomizer {
            Randomizer::Uniform => self.rng.random(),
            Randomizer::Bag => {
                if self.bag.is_empty() {
                    self.bag = ArrayVec::from(ShapeKind::ALL);
                    self.bag.shuffle(&mut self.rng);
                }
                self.bag.pop().unwrap_or_else(|| self.rng.random())
            }
        }
    }
}
