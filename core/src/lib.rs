use serde::{Deserialize, Serialize};

pub use card::*;
pub use deck::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod card;
mod deck;
mod error;
mod generator;
mod session;
mod timer;
mod types;

/// Board-size presets selectable between sessions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn pair_count(self) -> CardCount {
        match self {
            Self::Easy => 8,
            Self::Medium => 12,
            Self::Hard => 16,
        }
    }

    pub const fn card_count(self) -> CardCount {
        self.pair_count() * 2
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}
