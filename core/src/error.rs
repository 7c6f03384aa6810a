use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Position is outside the dealt board")]
    InvalidPosition,
    #[error("Deck does not pair every symbol exactly twice")]
    UnbalancedDeck,
}

pub type Result<T> = core::result::Result<T, GameError>;
