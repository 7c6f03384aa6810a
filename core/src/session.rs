use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Difficulty;
use crate::card::CardFace;
use crate::deck::Deck;
use crate::error::Result;
use crate::generator::DeckGenerator;
use crate::timer::{Scheduler, TimerHandle};
use crate::types::{CardCount, Position};

/// Delay before a matching pair locks in.
pub const MATCH_DELAY: Duration = Duration::from_millis(700);
/// Delay before a mismatched pair flips back face down.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);
/// How long a hint keeps its pair face up.
pub const HINT_DELAY: Duration = Duration::from_millis(1500);
/// Cadence of the elapsed-seconds clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Hints granted when a session starts.
pub const HINTS_PER_SESSION: u8 = 3;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Abandoned
/// - any state -> InProgress, since starting deals a fresh board
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No board dealt yet
    NotStarted,
    /// Board dealt, input and timers live
    InProgress,
    /// Every pair matched
    Won,
    /// Ended early by the player
    Abandoned,
}

impl SessionState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Abandoned)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Final numbers reported once a session concludes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub won: bool,
    pub moves: u32,
    pub elapsed_secs: u32,
}

/// Outcome of selecting a difficulty
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigOutcome {
    NoChange,
    Changed,
}

impl ConfigOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of revealing a card
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    /// First card of a turn went face up
    FirstRevealed,
    /// Second card went face up; the pair settles when the resolution
    /// timer fires
    PairRevealed,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            FirstRevealed => true,
            PairRevealed => true,
        }
    }
}

/// Outcome of requesting a hint
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HintOutcome {
    NoChange,
    /// A pair is showing and will hide when the timer fires
    Revealed,
    /// No pair existed to show; the hint was still spent
    NoPairFound,
}

impl HintOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use HintOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            // the hint counter still went down
            NoPairFound => true,
        }
    }
}

/// Outcome of delivering a due timer
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimerOutcome {
    NoChange,
    /// Clock advanced one second
    Tick,
    /// Pending pair locked in as matched
    Matched,
    /// Pending pair flipped back face down
    Mismatched,
    /// Hint pair flipped back face down
    HintHidden,
    /// Final pair locked in and the session concluded
    Won,
}

impl TimerOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use TimerOutcome::*;
        match self {
            NoChange => false,
            Tick => true,
            Matched => true,
            Mismatched => true,
            HintHidden => true,
            Won => true,
        }
    }
}

/// Outcome of ending the session
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EndOutcome {
    NoChange,
    Ended,
}

impl EndOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Ended => true,
        }
    }
}

/// Where the current turn stands. A resolution timer is armed exactly in
/// the three non-ready phases, never in `Ready`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
enum TurnPhase {
    /// Accepting input; `first` is a face-up card waiting for its partner
    Ready { first: Option<Position> },
    /// Two equal cards face up, waiting to lock in
    ResolvingMatch { first: Position, second: Position },
    /// Two unequal cards face up, waiting to flip back
    ResolvingMismatch { first: Position, second: Position },
    /// Hint pair face up, waiting to flip back; `held` outlives the hint
    HintShowing {
        pair: (Position, Position),
        held: Option<Position>,
    },
}

/// One play-through of the matching game, from deal to conclusion.
///
/// The session never sleeps and never reads a clock. Delays go through the
/// injected [`Scheduler`] and take effect when the host feeds the due handle
/// back in via [`Session::on_timer`], so the same rules run under wall time
/// or under synthetic time in tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    difficulty: Difficulty,
    deck: Deck,
    faces: Vec<CardFace>,
    phase: TurnPhase,
    state: SessionState,
    moves: u32,
    matched_pairs: CardCount,
    hints_left: u8,
    elapsed_secs: u32,
    tick_timer: Option<TimerHandle>,
    resolve_timer: Option<TimerHandle>,
    summary: Option<GameSummary>,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            deck: Deck::default(),
            faces: Vec::new(),
            phase: TurnPhase::Ready { first: None },
            state: Default::default(),
            moves: 0,
            matched_pairs: 0,
            hints_left: HINTS_PER_SESSION,
            elapsed_secs: 0,
            tick_timer: None,
            resolve_timer: None,
            summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn card_count(&self) -> CardCount {
        self.deck.card_count()
    }

    pub fn card_at(&self, pos: Position) -> CardFace {
        self.faces[usize::from(pos)]
    }

    /// All card faces in slot order.
    pub fn cards(&self) -> impl Iterator<Item = CardFace> + '_ {
        self.faces.iter().copied()
    }

    /// Completed turns, counted when the second card of a turn goes face up.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched_pairs(&self) -> CardCount {
        self.matched_pairs
    }

    pub fn hints_left(&self) -> u8 {
        self.hints_left
    }

    /// Whole seconds on the session clock, frozen once the session concludes.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn summary(&self) -> Option<GameSummary> {
        self.summary
    }

    /// Whether reveals and hints are currently ignored: either no session is
    /// active or a pending pair / hint is waiting on its timer.
    pub fn is_input_locked(&self) -> bool {
        !self.state.is_active() || !matches!(self.phase, TurnPhase::Ready { .. })
    }

    /// Selects the board size for the next deal. Ignored while a session is
    /// active.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> ConfigOutcome {
        use ConfigOutcome::*;

        if self.state.is_active() {
            log::trace!("difficulty change ignored while a session is active");
            return NoChange;
        }
        if self.difficulty == difficulty {
            return NoChange;
        }
        self.difficulty = difficulty;
        Changed
    }

    /// Deals a fresh board at the selected difficulty and starts the clock,
    /// discarding any session in progress along with its pending timers.
    pub fn start(&mut self, timers: &mut impl Scheduler, generator: impl DeckGenerator) {
        self.cancel_timers(timers);
        self.deck = generator.generate(self.difficulty);
        self.faces = vec![CardFace::Hidden; usize::from(self.deck.card_count())];
        self.phase = TurnPhase::Ready { first: None };
        self.state = SessionState::InProgress;
        self.moves = 0;
        self.matched_pairs = 0;
        self.hints_left = HINTS_PER_SESSION;
        self.elapsed_secs = 0;
        self.summary = None;
        self.tick_timer = Some(timers.schedule_repeating(TICK_PERIOD));
        log::debug!(
            "started a {:?} session with {} cards",
            self.difficulty,
            self.deck.card_count()
        );
    }

    /// Turns the card at `pos` face up.
    ///
    /// The first card of a turn stays up waiting for a partner. The second
    /// counts a move, locks the board, and arms the resolution timer; the
    /// pair settles when it fires. Reveals are silently ignored while the
    /// board is locked, when the card is already face up, or when no session
    /// is active. A position outside the dealt board is an error.
    pub fn reveal(&mut self, timers: &mut impl Scheduler, pos: Position) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        if !self.state.is_active() {
            log::trace!("reveal ignored: no active session");
            return Ok(NoChange);
        }
        let pos = self.deck.validate_position(pos)?;

        let TurnPhase::Ready { first } = self.phase else {
            log::trace!("reveal at {} ignored: board is locked", pos);
            return Ok(NoChange);
        };
        if !self.faces[usize::from(pos)].is_hidden() {
            log::trace!("reveal at {} ignored: card is already face up", pos);
            return Ok(NoChange);
        }

        let symbol = self.deck.symbol_at(pos);
        self.faces[usize::from(pos)] = CardFace::Revealed(symbol);

        Ok(match first {
            None => {
                self.phase = TurnPhase::Ready { first: Some(pos) };
                log::debug!("first card of the turn at {}: {}", pos, symbol);
                FirstRevealed
            }
            Some(first) => {
                self.moves += 1;
                let is_match = self.deck.symbol_at(first) == symbol;
                self.phase = if is_match {
                    TurnPhase::ResolvingMatch { first, second: pos }
                } else {
                    TurnPhase::ResolvingMismatch { first, second: pos }
                };
                let delay = if is_match { MATCH_DELAY } else { MISMATCH_DELAY };
                self.resolve_timer = Some(timers.schedule_once(delay));
                log::debug!(
                    "second card of the turn at {}: {} ({})",
                    pos,
                    symbol,
                    if is_match { "match" } else { "mismatch" }
                );
                PairRevealed
            }
        })
    }

    /// Briefly shows the lowest-positioned pair among face-down cards,
    /// spending one hint.
    ///
    /// Ignored while the board is locked or no hints remain. With fewer than
    /// two face-down cards there is nothing left to show and the hint is not
    /// spent.
    pub fn hint(&mut self, timers: &mut impl Scheduler) -> HintOutcome {
        use HintOutcome::*;

        if self.hints_left == 0 {
            log::trace!("hint ignored: none left");
            return NoChange;
        }
        if !self.state.is_active() {
            log::trace!("hint ignored: no active session");
            return NoChange;
        }
        let TurnPhase::Ready { first } = self.phase else {
            log::trace!("hint ignored: board is locked");
            return NoChange;
        };

        let face_down: Vec<Position> = self
            .deck
            .positions()
            .filter(|&pos| self.faces[usize::from(pos)].is_hidden())
            .collect();
        if face_down.len() < 2 {
            log::trace!("hint ignored: {} face-down card(s) left", face_down.len());
            return NoChange;
        }

        let mut pair = None;
        'search: for (i, &a) in face_down.iter().enumerate() {
            for &b in &face_down[i + 1..] {
                if self.deck.symbol_at(a) == self.deck.symbol_at(b) {
                    pair = Some((a, b));
                    break 'search;
                }
            }
        }

        self.hints_left -= 1;
        match pair {
            Some((a, b)) => {
                self.faces[usize::from(a)] = CardFace::Revealed(self.deck.symbol_at(a));
                self.faces[usize::from(b)] = CardFace::Revealed(self.deck.symbol_at(b));
                self.phase = TurnPhase::HintShowing { pair: (a, b), held: first };
                self.resolve_timer = Some(timers.schedule_once(HINT_DELAY));
                log::debug!("hint shows the pair at {} and {}, {} left", a, b, self.hints_left);
                Revealed
            }
            None => {
                // unreachable while the deck invariant holds, and the hint
                // is still spent
                log::warn!("hint found no pair among {} face-down cards", face_down.len());
                NoPairFound
            }
        }
    }

    /// Delivers a due timer. Handles the session does not recognize, for
    /// example one that fired just before a cancellation took effect, are
    /// ignored.
    pub fn on_timer(&mut self, timers: &mut impl Scheduler, handle: TimerHandle) -> TimerOutcome {
        use TimerOutcome::*;

        if self.tick_timer == Some(handle) {
            self.elapsed_secs += 1;
            log::trace!("clock at {}s", self.elapsed_secs);
            return Tick;
        }
        if self.resolve_timer == Some(handle) {
            self.resolve_timer = None;
            return self.resolve(timers);
        }
        log::trace!("stale timer {:?} ignored", handle);
        NoChange
    }

    /// Settles whatever the armed resolution timer was waiting on.
    fn resolve(&mut self, timers: &mut impl Scheduler) -> TimerOutcome {
        use TimerOutcome::*;

        match self.phase {
            TurnPhase::ResolvingMatch { first, second } => {
                self.faces[usize::from(first)] = CardFace::Matched(self.deck.symbol_at(first));
                self.faces[usize::from(second)] = CardFace::Matched(self.deck.symbol_at(second));
                self.matched_pairs += 1;
                self.phase = TurnPhase::Ready { first: None };
                log::debug!(
                    "pair at {} and {} locked in, {}/{} matched",
                    first,
                    second,
                    self.matched_pairs,
                    self.deck.pair_count()
                );

                if self.matched_pairs == self.deck.pair_count() {
                    self.conclude(timers, true);
                    Won
                } else {
                    Matched
                }
            }
            TurnPhase::ResolvingMismatch { first, second } => {
                self.faces[usize::from(first)] = CardFace::Hidden;
                self.faces[usize::from(second)] = CardFace::Hidden;
                self.phase = TurnPhase::Ready { first: None };
                log::debug!("mismatch at {} and {} flipped back", first, second);
                Mismatched
            }
            TurnPhase::HintShowing { pair: (a, b), held } => {
                self.faces[usize::from(a)] = CardFace::Hidden;
                self.faces[usize::from(b)] = CardFace::Hidden;
                self.phase = TurnPhase::Ready { first: held };
                log::trace!("hint pair at {} and {} hidden again", a, b);
                HintHidden
            }
            TurnPhase::Ready { .. } => {
                // a resolution timer is only armed in a resolving phase
                log::warn!("resolution fired with nothing pending");
                NoChange
            }
        }
    }

    /// Concludes the session on the player's behalf: the clock freezes, a
    /// summary becomes available, and on an early end the whole board goes
    /// face up for review. Ignored when no session is active.
    pub fn end(&mut self, timers: &mut impl Scheduler, won: bool) -> EndOutcome {
        use EndOutcome::*;

        if !self.state.is_active() {
            log::trace!("end ignored: no active session");
            return NoChange;
        }

        self.conclude(timers, won);
        if !won {
            self.reveal_all();
        }
        self.phase = TurnPhase::Ready { first: None };
        Ended
    }

    fn conclude(&mut self, timers: &mut impl Scheduler, won: bool) {
        self.cancel_timers(timers);
        self.state = if won {
            SessionState::Won
        } else {
            SessionState::Abandoned
        };
        self.summary = Some(GameSummary {
            won,
            moves: self.moves,
            elapsed_secs: self.elapsed_secs,
        });
        log::debug!(
            "session over: won={}, moves={}, elapsed={}s",
            won,
            self.moves,
            self.elapsed_secs
        );
    }

    /// Turns every face-down card face up for the post-game review.
    fn reveal_all(&mut self) {
        for pos in self.deck.positions() {
            let slot = usize::from(pos);
            if self.faces[slot].is_hidden() {
                self.faces[slot] = CardFace::Revealed(self.deck.symbol_at(pos));
            }
        }
    }

    fn cancel_timers(&mut self, timers: &mut impl Scheduler) {
        if let Some(handle) = self.tick_timer.take() {
            timers.cancel(handle);
        }
        if let Some(handle) = self.resolve_timer.take() {
            timers.cancel(handle);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}
