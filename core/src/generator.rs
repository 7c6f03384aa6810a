use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::Difficulty;
use crate::deck::Deck;
use crate::types::{SYMBOL_CATALOG, Symbol};

/// Deals the deck for a fresh session.
pub trait DeckGenerator {
    fn generate(self, difficulty: Difficulty) -> Deck;
}

fn catalog_pairs(difficulty: Difficulty) -> Vec<Symbol> {
    let pair_count = usize::from(difficulty.pair_count());
    let mut symbols = Vec::with_capacity(pair_count * 2);
    for &symbol in &SYMBOL_CATALOG[..pair_count] {
        symbols.push(symbol);
        symbols.push(symbol);
    }
    symbols
}

/// Uniformly shuffled deal. The same seed always produces the same layout,
/// on every platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShuffledDeckGenerator {
    seed: u64,
}

impl ShuffledDeckGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for ShuffledDeckGenerator {
    fn generate(self, difficulty: Difficulty) -> Deck {
        let mut symbols = catalog_pairs(difficulty);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        symbols.shuffle(&mut rng);
        log::debug!("dealt {} cards from seed {}", symbols.len(), self.seed);
        Deck::from_symbols(symbols).expect("doubled catalog symbols form a balanced deck")
    }
}

/// Deals partners adjacent: slots 0-1 pair up, then 2-3, and so on.
/// Useful for tests and practice boards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrderedDeckGenerator;

impl DeckGenerator for OrderedDeckGenerator {
    fn generate(self, difficulty: Difficulty) -> Deck {
        Deck::from_symbols(catalog_pairs(difficulty))
            .expect("doubled catalog symbols form a balanced deck")
    }
}
