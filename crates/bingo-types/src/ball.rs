//! Balls and the band letters derived from them.
//!
//! The pool holds the numbers `1..=75`, split into five disjoint bands of
//! fifteen values. Each band owns one card column and one letter of the
//! word `BINGO`. A ball's letter is a pure function of its number and is
//! never stored separately.

use core::fmt;
use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Highest number in the draw pool (the pool is `1..=POOL_SIZE`).
pub const POOL_SIZE: u8 = 75;

/// Number of values in each band.
pub const BAND_WIDTH: u8 = 15;

/// The letter of a band, one per card column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BallLetter {
    /// Column 0, numbers 1-15.
    B,
    /// Column 1, numbers 16-30.
    I,
    /// Column 2, numbers 31-45.
    N,
    /// Column 3, numbers 46-60.
    G,
    /// Column 4, numbers 61-75.
    O,
}

impl BallLetter {
    /// All letters in column order.
    pub const ALL: [Self; 5] = [Self::B, Self::I, Self::N, Self::G, Self::O];

    /// The letter whose band contains `number`, or `None` outside `1..=75`.
    pub const fn for_number(number: u8) -> Option<Self> {
        match number {
            1..=15 => Some(Self::B),
            16..=30 => Some(Self::I),
            31..=45 => Some(Self::N),
            46..=60 => Some(Self::G),
            61..=75 => Some(Self::O),
            _ => None,
        }
    }

    /// The letter owning card column `column`.
    pub fn from_column(column: usize) -> Option<Self> {
        Self::ALL.get(column).copied()
    }

    /// Zero-based card column of this band.
    pub const fn column(self) -> usize {
        match self {
            Self::B => 0,
            Self::I => 1,
            Self::N => 2,
            Self::G => 3,
            Self::O => 4,
        }
    }

    /// Inclusive range of numbers belonging to this band.
    pub const fn range(self) -> RangeInclusive<u8> {
        match self {
            Self::B => 1..=15,
            Self::I => 16..=30,
            Self::N => 31..=45,
            Self::G => 46..=60,
            Self::O => 61..=75,
        }
    }

    /// Whether `number` falls inside this band.
    pub fn contains(self, number: u8) -> bool {
        self.range().contains(&number)
    }

    /// The single-character name of the letter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::I => "I",
            Self::N => "N",
            Self::G => "G",
            Self::O => "O",
        }
    }
}

impl fmt::Display for BallLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One drawn number paired with its band letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Ball {
    /// Band letter derived from `number`.
    pub letter: BallLetter,
    /// The drawn number, in `1..=75`.
    pub number: u8,
}

impl Ball {
    /// Build the ball for `number`, or `None` if it is outside the pool.
    pub const fn new(number: u8) -> Option<Self> {
        match BallLetter::for_number(number) {
            Some(letter) => Some(Self { letter, number }),
            None => None,
        }
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(BallLetter::for_number(0), None);
        assert_eq!(BallLetter::for_number(1), Some(BallLetter::B));
        assert_eq!(BallLetter::for_number(15), Some(BallLetter::B));
        assert_eq!(BallLetter::for_number(16), Some(BallLetter::I));
        assert_eq!(BallLetter::for_number(45), Some(BallLetter::N));
        assert_eq!(BallLetter::for_number(46), Some(BallLetter::G));
        assert_eq!(BallLetter::for_number(75), Some(BallLetter::O));
        assert_eq!(BallLetter::for_number(76), None);
    }

    #[test]
    fn every_pool_number_belongs_to_its_letter_band() {
        for number in 1..=POOL_SIZE {
            let letter = BallLetter::for_number(number);
            assert!(letter.is_some_and(|l| l.contains(number)), "{number}");
        }
    }

    #[test]
    fn bands_are_fifteen_wide_and_column_ordered() {
        for (column, letter) in BallLetter::ALL.iter().enumerate() {
            assert_eq!(letter.column(), column);
            assert_eq!(BallLetter::from_column(column), Some(*letter));
            assert_eq!(letter.range().count(), usize::from(BAND_WIDTH));
        }
        assert_eq!(BallLetter::from_column(5), None);
    }

    #[test]
    fn ball_display_joins_letter_and_number() {
        assert_eq!(Ball::new(7).map(|b| b.to_string()), Some("B7".to_owned()));
        assert_eq!(Ball::new(75).map(|b| b.to_string()), Some("O75".to_owned()));
        assert!(Ball::new(0).is_none());
    }

    #[test]
    fn ball_serializes_letter_as_string() {
        let ball = Ball::new(33);
        let json = serde_json::to_value(ball).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({ "letter": "N", "number": 33 }))
        );
    }
}
