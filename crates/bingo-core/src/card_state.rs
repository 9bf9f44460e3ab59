//! Per-participant marking state and win detection.
//!
//! A [`CardState`] pairs an immutable [`Card`] with a [`MarkMap`]. Marks
//! are only ever added: drawing a number sets the mark of the one cell
//! holding it, and nothing un-marks a cell for the lifetime of the state.
//!
//! A card wins when any full row or any full column is marked. Diagonals
//! and full-card coverage do not count.

use crate::card::{Card, Cell, FREE_CELL, GRID_SIZE};

/// 5x5 marking matrix, same shape as the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkMap {
    marks: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl MarkMap {
    /// A fresh map with only the free cell marked.
    pub fn new() -> Self {
        let mut marks = [[false; GRID_SIZE]; GRID_SIZE];
        let (row, column) = FREE_CELL;
        if let Some(cell) = marks.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = true;
        }
        Self { marks }
    }

    /// Whether `(row, column)` is marked. Out-of-range cells are unmarked.
    pub fn is_marked(&self, row: usize, column: usize) -> bool {
        self.marks
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(false)
    }

    /// The marks, row-major.
    pub const fn rows(&self) -> &[[bool; GRID_SIZE]; GRID_SIZE] {
        &self.marks
    }

    /// Number of marked cells, including the free cell.
    pub fn marked_count(&self) -> usize {
        self.marks.iter().flatten().filter(|marked| **marked).count()
    }

    /// Whether any row or any column is fully marked.
    pub fn has_full_line(&self) -> bool {
        let full_row = self.marks.iter().any(|row| row.iter().all(|m| *m));
        let full_column =
            (0..GRID_SIZE).any(|column| (0..GRID_SIZE).all(|row| self.is_marked(row, column)));
        full_row || full_column
    }

    fn set(&mut self, row: usize, column: usize) {
        if let Some(cell) = self.marks.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = true;
        }
    }
}

impl Default for MarkMap {
    fn default() -> Self {
        Self::new()
    }
}

/// A card together with its marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    card: Card,
    marks: MarkMap,
}

impl CardState {
    /// Wrap a card with a fresh mark map.
    pub fn new(card: Card) -> Self {
        Self {
            card,
            marks: MarkMap::new(),
        }
    }

    /// Mark every cell equal to `number`.
    ///
    /// Returns whether the card holds `number`. Numbers absent from the
    /// card are a no-op, and marking the same number again changes nothing.
    pub fn mark(&mut self, number: u8) -> bool {
        let mut hit = false;
        for (r, row) in self.card.rows().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if *cell == Cell::Number(number) {
                    self.marks.set(r, c);
                    hit = true;
                }
            }
        }
        hit
    }

    /// Whether a full row or full column is marked.
    pub fn has_win(&self) -> bool {
        self.marks.has_full_line()
    }

    /// The underlying card.
    pub const fn card(&self) -> &Card {
        &self.card
    }

    /// The current marks.
    pub const fn marks(&self) -> &MarkMap {
        &self.marks
    }

    /// Render the card in its text form for delivery to a client.
    pub fn serialize(&self) -> String {
        self.card.to_text()
    }

    /// Rebuild an unmarked state from a card's text form.
    ///
    /// # Errors
    ///
    /// Returns the [`CardError`](crate::card::CardError) reported by
    /// [`Card::from_text`].
    pub fn deserialize(text: &str) -> Result<Self, crate::card::CardError> {
        Card::from_text(text).map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use super::*;

    const SAMPLE: &str = "B  I  N  G  O\n\
                          3 17 33 50 70\n\
                          1 16 31 46 61\n\
                          2 18 * 47 62\n\
                          4 19 34 48 63\n\
                          5 20 35 49 64";

    fn sample_state() -> CardState {
        CardState::deserialize(SAMPLE).unwrap()
    }

    /// Reference win check computed from the card and a drawn set, with no
    /// access to the mark map.
    fn wins_by_draws(card: &Card, drawn: &BTreeSet<u8>) -> bool {
        let covered = |cell: &Cell| match cell {
            Cell::Free => true,
            Cell::Number(n) => drawn.contains(n),
        };
        let rows = card.rows();
        let any_row = rows.iter().any(|row| row.iter().all(covered));
        let any_column = (0..GRID_SIZE).any(|c| {
            rows.iter()
                .all(|row| row.get(c).is_some_and(covered))
        });
        any_row || any_column
    }

    #[test]
    fn fresh_state_marks_only_the_free_cell() {
        let state = sample_state();
        assert!(state.marks().is_marked(2, 2));
        assert_eq!(state.marks().marked_count(), 1);
        assert!(!state.has_win());
    }

    #[test]
    fn row_completes_on_fifth_mark_in_any_order() {
        let row: [u8; 5] = [3, 17, 33, 50, 70];
        let mut orderings = Vec::new();
        for rotation in 0..row.len() {
            let mut order = row;
            order.rotate_left(rotation);
            orderings.push(order);
            order.reverse();
            orderings.push(order);
        }

        for ordering in orderings {
            let mut state = sample_state();
            for (i, number) in ordering.iter().enumerate() {
                assert!(state.mark(*number));
                let is_last = i + 1 == ordering.len();
                assert_eq!(state.has_win(), is_last, "{ordering:?} after {number}");
            }
        }
    }

    #[test]
    fn centre_column_needs_only_four_marks() {
        let mut state = sample_state();
        for number in [33, 31, 34] {
            state.mark(number);
        }
        assert!(!state.has_win());
        state.mark(35);
        assert!(state.has_win());
    }

    #[test]
    fn diagonals_do_not_win() {
        let mut state = sample_state();
        for number in [3, 16, 48, 64] {
            state.mark(number);
        }
        assert!(!state.has_win());

        let mut state = sample_state();
        for number in [70, 46, 19, 5] {
            state.mark(number);
        }
        assert!(!state.has_win());
    }

    #[test]
    fn absent_number_is_a_no_op() {
        let mut state = sample_state();
        for number in [3, 17, 33, 50] {
            state.mark(number);
        }
        let before = state.clone();
        assert!(!state.mark(75));
        assert_eq!(state, before);
        assert!(!state.has_win());
    }

    #[test]
    fn marking_twice_equals_marking_once() {
        let mut once = sample_state();
        let mut twice = sample_state();
        once.mark(47);
        twice.mark(47);
        twice.mark(47);
        assert_eq!(once, twice);
        assert_eq!(twice.marks().marked_count(), 2);
    }

    #[test]
    fn win_matches_reference_for_random_draws() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut pool: Vec<u8> = (1..=75).collect();

        for _ in 0..300 {
            let card = Card::generate(&mut rng);
            let mut state = CardState::new(card.clone());
            pool.shuffle(&mut rng);
            let count = rng.random_range(0..=75);

            let mut drawn = BTreeSet::new();
            for number in pool.iter().take(count) {
                state.mark(*number);
                drawn.insert(*number);
                assert_eq!(state.has_win(), wins_by_draws(&card, &drawn));
            }
        }
    }

    #[test]
    fn serialize_round_trip() {
        let mut rng = SmallRng::seed_from_u64(11);
        let state = CardState::new(Card::generate(&mut rng));
        let restored = CardState::deserialize(&state.serialize());
        assert_eq!(restored.map(|s| s.card().clone()), Ok(state.card().clone()));
    }

    #[test]
    fn deserialize_rejects_malformed_card() {
        assert!(CardState::deserialize("B I N G O\n1 2 3").is_err());
    }
}
