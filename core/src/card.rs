use serde::{Deserialize, Serialize};

use crate::types::Symbol;

/// Player-visible state of one card slot.
///
/// A card's symbol only escapes through a face-up variant, so handing this
/// out never leaks the layout of face-down cards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Hidden,
    Revealed(Symbol),
    Matched(Symbol),
}

impl CardFace {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Symbol currently shown to the player, `None` while face down.
    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Self::Hidden => None,
            Self::Revealed(symbol) | Self::Matched(symbol) => Some(symbol),
        }
    }
}

impl Default for CardFace {
    fn default() -> Self {
        Self::Hidden
    }
}
