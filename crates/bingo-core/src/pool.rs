//! The draw pool: a shuffled permutation of `1..=75` consumed front to back.

use std::collections::{BTreeSet, VecDeque};

use bingo_types::{Ball, POOL_SIZE};
use rand::Rng;
use rand::seq::SliceRandom;

/// Errors produced when building a draw sequence from explicit numbers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A number lies outside `1..=75`.
    #[error("number {number} is outside the pool 1..={POOL_SIZE}")]
    OutOfRange {
        /// The offending number.
        number: u8,
    },

    /// A number appears more than once.
    #[error("number {number} appears more than once")]
    Duplicate {
        /// The repeated number.
        number: u8,
    },
}

/// The balls still to be drawn in the current game.
///
/// Every number is distinct and within the pool, so a sequence yields at
/// most 75 balls. Running out is the normal "no balls left" ending, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawSequence {
    remaining: VecDeque<u8>,
}

impl DrawSequence {
    /// A uniformly shuffled sequence of the whole pool.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut numbers: Vec<u8> = (1..=POOL_SIZE).collect();
        numbers.shuffle(rng);
        Self {
            remaining: numbers.into(),
        }
    }

    /// A sequence drawing exactly `numbers`, in the given order.
    ///
    /// The sequence need not cover the whole pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfRange`] for a number outside `1..=75` and
    /// [`PoolError::Duplicate`] for a repeated number.
    pub fn from_numbers(numbers: impl IntoIterator<Item = u8>) -> Result<Self, PoolError> {
        let mut seen = BTreeSet::new();
        let mut remaining = VecDeque::new();
        for number in numbers {
            if Ball::new(number).is_none() {
                return Err(PoolError::OutOfRange { number });
            }
            if !seen.insert(number) {
                return Err(PoolError::Duplicate { number });
            }
            remaining.push_back(number);
        }
        Ok(Self { remaining })
    }

    /// Number of balls left.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether every ball has been drawn.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl Iterator for DrawSequence {
    type Item = Ball;

    fn next(&mut self) -> Option<Ball> {
        self.remaining.pop_front().and_then(Ball::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining.len(), Some(self.remaining.len()))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn shuffled_sequence_is_a_permutation_of_the_pool() {
        let mut rng = SmallRng::seed_from_u64(3);
        let sequence = DrawSequence::shuffled(&mut rng);
        assert_eq!(sequence.remaining(), 75);

        let mut numbers: Vec<u8> = sequence.map(|ball| ball.number).collect();
        numbers.sort_unstable();
        let expected: Vec<u8> = (1..=75).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn sequence_yields_exactly_seventy_five_balls() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut sequence = DrawSequence::shuffled(&mut rng);
        let mut drawn = 0;
        while sequence.next().is_some() {
            drawn += 1;
        }
        assert_eq!(drawn, 75);
        assert!(sequence.is_exhausted());
        assert!(sequence.next().is_none());
    }

    #[test]
    fn balls_carry_their_band_letter() {
        let mut rng = SmallRng::seed_from_u64(21);
        for ball in DrawSequence::shuffled(&mut rng) {
            assert!(ball.letter.contains(ball.number), "{ball}");
        }
    }

    #[test]
    fn shuffle_depends_on_seed() {
        let a: Vec<Ball> = DrawSequence::shuffled(&mut SmallRng::seed_from_u64(1)).collect();
        let b: Vec<Ball> = DrawSequence::shuffled(&mut SmallRng::seed_from_u64(2)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn explicit_sequence_keeps_order() {
        let sequence = DrawSequence::from_numbers([70, 3, 33]);
        let numbers: Vec<u8> = sequence
            .map(|s| s.map(|ball| ball.number).collect())
            .unwrap_or_default();
        assert_eq!(numbers, vec![70, 3, 33]);
    }

    #[test]
    fn explicit_sequence_rejects_out_of_range() {
        assert_eq!(
            DrawSequence::from_numbers([1, 0]),
            Err(PoolError::OutOfRange { number: 0 })
        );
        assert_eq!(
            DrawSequence::from_numbers([76]),
            Err(PoolError::OutOfRange { number: 76 })
        );
    }

    #[test]
    fn explicit_sequence_rejects_duplicates() {
        assert_eq!(
            DrawSequence::from_numbers([5, 9, 5]),
            Err(PoolError::Duplicate { number: 5 })
        );
    }
}
