use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::types::{CardCount, Position, Symbol};

/// Face-down truth of a session: which symbol sits in which slot.
///
/// Invariant: every symbol in the deck appears exactly twice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    symbols: Vec<Symbol>,
}

impl Deck {
    /// Builds a deck from an explicit layout, rejecting any layout that does
    /// not pair every symbol exactly twice.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.len() % 2 != 0 {
            return Err(GameError::UnbalancedDeck);
        }
        for &symbol in &symbols {
            let copies = symbols.iter().filter(|&&other| other == symbol).count();
            if copies != 2 {
                return Err(GameError::UnbalancedDeck);
            }
        }
        Ok(Self { symbols })
    }

    pub fn card_count(&self) -> CardCount {
        self.symbols.len().try_into().unwrap()
    }

    pub fn pair_count(&self) -> CardCount {
        self.card_count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol_at(&self, pos: Position) -> Symbol {
        self.symbols[usize::from(pos)]
    }

    pub fn validate_position(&self, pos: Position) -> Result<Position> {
        if usize::from(pos) < self.symbols.len() {
            Ok(pos)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    /// All positions in slot order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        0..self.card_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SYMBOL_CATALOG;

    #[test]
    fn balanced_layout_is_accepted() {
        let [a, b, ..] = SYMBOL_CATALOG;
        let deck = Deck::from_symbols(vec![a, b, a, b]).unwrap();

        assert_eq!(deck.card_count(), 4);
        assert_eq!(deck.pair_count(), 2);
        assert_eq!(deck.symbol_at(2), a);
    }

    #[test]
    fn odd_layout_is_rejected() {
        let [a, b, ..] = SYMBOL_CATALOG;

        assert_eq!(
            Deck::from_symbols(vec![a, b, a]),
            Err(GameError::UnbalancedDeck)
        );
    }

    #[test]
    fn tripled_symbol_is_rejected() {
        let [a, b, ..] = SYMBOL_CATALOG;

        assert_eq!(
            Deck::from_symbols(vec![a, a, a, b]),
            Err(GameError::UnbalancedDeck)
        );
    }

    #[test]
    fn positions_outside_the_deck_are_invalid() {
        let [a, b, ..] = SYMBOL_CATALOG;
        let deck = Deck::from_symbols(vec![a, b, b, a]).unwrap();

        assert_eq!(deck.validate_position(3), Ok(3));
        assert_eq!(deck.validate_position(4), Err(GameError::InvalidPosition));
    }
}
