//! Bingo cards: generation, validation, and the text codec.
//!
//! A card is a 5x5 grid. Column `c` holds five distinct numbers from band
//! `c` (`B` = 1-15 through `O` = 61-75), and the centre cell is a free
//! cell carrying no number. Because the bands are disjoint, every number
//! on a card is unique across the whole card.
//!
//! # Text form
//!
//! ```text
//! B  I  N  G  O
//! 3 17 33 50 70
//! 1 16 31 46 61
//! 2 18 * 47 62
//! 4 19 34 48 63
//! 5 20 35 49 64
//! ```
//!
//! The header names the bands in column order, each following line is one
//! row of five whitespace-separated tokens, and the free cell is `*`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use bingo_types::BallLetter;
use rand::Rng;
use rand::seq::SliceRandom;

/// Number of rows and columns on a card.
pub const GRID_SIZE: usize = 5;

/// `(row, column)` of the free cell.
pub const FREE_CELL: (usize, usize) = (2, 2);

/// Token standing for the free cell in the text form.
pub const FREE_TOKEN: &str = "*";

/// Header line of the text form.
pub const HEADER: &str = "B  I  N  G  O";

/// Errors produced when a card fails validation or cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    /// The payload contained no lines at all.
    #[error("card payload is empty")]
    Empty,

    /// The first line does not name the five bands in order.
    #[error("invalid card header: {found:?}")]
    InvalidHeader {
        /// The header line as received.
        found: String,
    },

    /// The payload does not contain exactly five rows.
    #[error("expected {GRID_SIZE} rows, found {found}")]
    RowCount {
        /// Number of rows present.
        found: usize,
    },

    /// A row does not contain exactly five tokens.
    #[error("row {row}: expected {GRID_SIZE} columns, found {found}")]
    ColumnCount {
        /// Zero-based row index.
        row: usize,
        /// Number of tokens present.
        found: usize,
    },

    /// A token is neither a number nor the free-cell marker.
    #[error("row {row}, column {column}: invalid token {token:?}")]
    InvalidToken {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// The offending token.
        token: String,
    },

    /// A number lies outside its column's band.
    #[error("row {row}, column {column}: {number} is outside band {letter}")]
    OutOfBand {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// The offending number.
        number: u8,
        /// Letter of the column's band.
        letter: BallLetter,
    },

    /// A number appears more than once.
    #[error("number {number} appears more than once")]
    DuplicateNumber {
        /// The repeated number.
        number: u8,
    },

    /// The free-cell marker appears somewhere other than the centre.
    #[error("free cell at row {row}, column {column}; only the centre may be free")]
    MisplacedFree {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },

    /// The centre cell holds a number instead of the free marker.
    #[error("centre cell must be free")]
    MissingFree,
}

/// One cell of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// The centre cell, marked from creation.
    Free,
    /// A numbered cell.
    Number(u8),
}

/// Row-major cell grid.
pub type Grid = [[Cell; GRID_SIZE]; GRID_SIZE];

/// A validated bingo card. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    rows: Grid,
}

impl Card {
    /// Generate a random card.
    ///
    /// Each column samples five distinct numbers uniformly from its band
    /// (shuffle the band, keep the first five), columns are laid out in
    /// band order, and the centre is overwritten with the free cell.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let columns = BallLetter::ALL.map(|letter| sample_band(&mut *rng, letter));

        let mut rows = [[Cell::Free; GRID_SIZE]; GRID_SIZE];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, (cell, column)) in row.iter_mut().zip(&columns).enumerate() {
                if (r, c) == FREE_CELL {
                    continue;
                }
                if let Some(&number) = column.get(r) {
                    *cell = Cell::Number(number);
                }
            }
        }

        Self { rows }
    }

    /// Build a card from an explicit grid.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::MissingFree`] or [`CardError::MisplacedFree`]
    /// if the free cell is not exactly the centre,
    /// [`CardError::OutOfBand`] if a number is outside its column's band,
    /// and [`CardError::DuplicateNumber`] if a number repeats.
    pub fn from_rows(rows: Grid) -> Result<Self, CardError> {
        let mut seen = BTreeSet::new();

        for (r, row) in rows.iter().enumerate() {
            for (c, (cell, letter)) in row.iter().zip(BallLetter::ALL).enumerate() {
                match (*cell, (r, c) == FREE_CELL) {
                    (Cell::Free, true) => {}
                    (Cell::Number(_), true) => return Err(CardError::MissingFree),
                    (Cell::Free, false) => {
                        return Err(CardError::MisplacedFree { row: r, column: c });
                    }
                    (Cell::Number(number), false) => {
                        if !letter.contains(number) {
                            return Err(CardError::OutOfBand {
                                row: r,
                                column: c,
                                number,
                                letter,
                            });
                        }
                        if !seen.insert(number) {
                            return Err(CardError::DuplicateNumber { number });
                        }
                    }
                }
            }
        }

        Ok(Self { rows })
    }

    /// Parse a card from its text form.
    ///
    /// Blank lines and surrounding whitespace are ignored; tokens may be
    /// separated by any amount of whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`CardError`] naming the first structural problem: empty
    /// payload, bad header, wrong row or column count, an unparseable
    /// token, or any violation reported by [`Card::from_rows`].
    pub fn from_text(text: &str) -> Result<Self, CardError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines.next().ok_or(CardError::Empty)?;
        let letters: Vec<&str> = header.split_whitespace().collect();
        let expected: Vec<&str> = BallLetter::ALL.iter().map(|l| l.as_str()).collect();
        if letters != expected {
            return Err(CardError::InvalidHeader {
                found: header.to_owned(),
            });
        }

        let row_lines: Vec<&str> = lines.collect();
        if row_lines.len() != GRID_SIZE {
            return Err(CardError::RowCount {
                found: row_lines.len(),
            });
        }

        let mut rows = [[Cell::Free; GRID_SIZE]; GRID_SIZE];
        for (r, (row, line)) in rows.iter_mut().zip(&row_lines).enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != GRID_SIZE {
                return Err(CardError::ColumnCount {
                    row: r,
                    found: tokens.len(),
                });
            }
            for (c, (cell, token)) in row.iter_mut().zip(&tokens).enumerate() {
                *cell = parse_token(token).ok_or_else(|| CardError::InvalidToken {
                    row: r,
                    column: c,
                    token: (*token).to_owned(),
                })?;
            }
        }

        Self::from_rows(rows)
    }

    /// Render the card in its text form.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(GRID_SIZE.saturating_add(1));
        lines.push(HEADER.to_owned());
        for row in &self.rows {
            let tokens: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Free => FREE_TOKEN.to_owned(),
                    Cell::Number(number) => number.to_string(),
                })
                .collect();
            lines.push(tokens.join(" "));
        }
        lines.join("\n")
    }

    /// The cell grid, row-major.
    pub const fn rows(&self) -> &Grid {
        &self.rows
    }

    /// The cell at `(row, column)`, or `None` when out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Position of `number` on the card, if present.
    pub fn position_of(&self, number: u8) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|cell| *cell == Cell::Number(number))
                .map(|c| (r, c))
        })
    }

    /// Numbers in a given column, top to bottom, skipping the free cell.
    pub fn column_numbers(&self, column: usize) -> Vec<u8> {
        self.rows
            .iter()
            .filter_map(|row| match row.get(column) {
                Some(Cell::Number(number)) => Some(*number),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

/// Pick five distinct numbers from `letter`'s band in random order.
fn sample_band(rng: &mut impl Rng, letter: BallLetter) -> [u8; GRID_SIZE] {
    let mut band: Vec<u8> = letter.range().collect();
    band.shuffle(rng);

    let mut picked = [0; GRID_SIZE];
    for (slot, number) in picked.iter_mut().zip(band) {
        *slot = number;
    }
    picked
}

fn parse_token(token: &str) -> Option<Cell> {
    if token == FREE_TOKEN {
        return Some(Cell::Free);
    }
    token.parse::<u8>().ok().map(Cell::Number)
}
