use core::fmt;

use serde::{Deserialize, Serialize};

/// Index of a card slot on the dealt board, stable for the whole session.
pub type Position = u8;

/// Count type used for card counts and pair counts.
pub type CardCount = u8;

/// Pairing identity stamped on exactly two cards of a deck.
///
/// The glyph is only cosmetic; matching compares whole symbols.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(char);

impl Symbol {
    pub const fn new(glyph: char) -> Self {
        Self(glyph)
    }

    pub const fn glyph(self) -> char {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Built-in symbols, in dealing order: a session at `pair_count` pairs
/// uses the first `pair_count` entries.
pub const SYMBOL_CATALOG: [Symbol; 16] = [
    Symbol::new('🍕'),
    Symbol::new('🍔'),
    Symbol::new('🍟'),
    Symbol::new('🌭'),
    Symbol::new('🍿'),
    Symbol::new('🍩'),
    Symbol::new('🍪'),
    Symbol::new('🍦'),
    Symbol::new('🍫'),
    Symbol::new('🍰'),
    Symbol::new('🧁'),
    Symbol::new('🍎'),
    Symbol::new('🍉'),
    Symbol::new('🍓'),
    Symbol::new('🥥'),
    Symbol::new('🍇'),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_symbols_are_distinct() {
        let unique: HashSet<Symbol> = SYMBOL_CATALOG.iter().copied().collect();
        assert_eq!(unique.len(), SYMBOL_CATALOG.len());
    }
}
