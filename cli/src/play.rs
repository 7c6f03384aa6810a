use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use parejita_core::{
    CardFace, Difficulty, HintOutcome, OrderedDeckGenerator, Position, Session,
    ShuffledDeckGenerator, TimerOutcome, TimerQueue,
};

/// Longest the loop sleeps when no timer is due sooner.
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Line-oriented play loop. Stdin is drained on its own thread so the loop
/// can keep feeding elapsed wall time into the timer queue while waiting
/// for input.
pub fn run(difficulty: Difficulty, seed: Option<u64>, ordered: bool) -> Result<()> {
    let (input_tx, input_rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut timers = TimerQueue::new();
    let mut session = Session::new(difficulty);
    deal(&mut session, &mut timers, seed, ordered);
    println!("type a slot number to flip a card; h hint, s restart, e end, q quit");
    render(&session)?;

    let mut last_pump = Instant::now();
    loop {
        let wait = timers.next_due().unwrap_or(IDLE_WAIT).min(IDLE_WAIT);
        let line = match input_rx.recv_timeout(wait) {
            Ok(line) => Some(line),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let mut dirty = pump(&mut session, &mut timers, &mut last_pump);
        if let Some(line) = line {
            match apply(&mut session, &mut timers, line.trim(), ordered) {
                Command::Quit => break,
                Command::Updated(updated) => dirty |= updated,
            }
        }

        if dirty {
            render(&session)?;
        }
    }

    Ok(())
}

/// Feeds real elapsed time into the queue and delivers whatever came due.
fn pump(session: &mut Session, timers: &mut TimerQueue, last: &mut Instant) -> bool {
    let now = Instant::now();
    let dt = now.duration_since(*last);
    *last = now;

    let mut dirty = false;
    for handle in timers.advance(dt) {
        let outcome = session.on_timer(timers, handle);
        if outcome == TimerOutcome::Won {
            log::info!("all pairs matched");
        }
        dirty |= outcome.has_update();
    }
    dirty
}

enum Command {
    Quit,
    Updated(bool),
}

fn apply(session: &mut Session, timers: &mut TimerQueue, input: &str, ordered: bool) -> Command {
    use Command::*;

    match input {
        "" => Updated(false),
        "q" | "quit" => Quit,
        "s" | "start" => {
            deal(session, timers, None, ordered);
            Updated(true)
        }
        "e" | "end" => Updated(session.end(timers, false).has_update()),
        "h" | "hint" => {
            let outcome = session.hint(timers);
            if outcome == HintOutcome::NoChange && session.hints_left() == 0 {
                println!("no hints left");
            }
            Updated(outcome.has_update())
        }
        "easy" => Updated(retune(session, Difficulty::Easy)),
        "medium" => Updated(retune(session, Difficulty::Medium)),
        "hard" => Updated(retune(session, Difficulty::Hard)),
        _ => match input.parse::<Position>() {
            Ok(pos) => match session.reveal(timers, pos) {
                Ok(outcome) => Updated(outcome.has_update()),
                Err(err) => {
                    println!("{err}");
                    Updated(false)
                }
            },
            Err(_) => {
                println!("commands: <slot>, hint, start, end, easy|medium|hard, quit");
                Updated(false)
            }
        },
    }
}

fn retune(session: &mut Session, difficulty: Difficulty) -> bool {
    let outcome = session.set_difficulty(difficulty);
    if session.state().is_active() {
        println!("finish this session first");
    } else if outcome.has_update() {
        println!("next deal is {:?}; type s to start", difficulty);
    }
    outcome.has_update()
}

fn deal(session: &mut Session, timers: &mut TimerQueue, seed: Option<u64>, ordered: bool) {
    if ordered {
        session.start(timers, OrderedDeckGenerator);
    } else {
        let seed = seed.unwrap_or_else(rand::random);
        log::info!("dealing with seed {}", seed);
        session.start(timers, ShuffledDeckGenerator::new(seed));
    }
}

fn render(session: &Session) -> Result<()> {
    let cols = match session.card_count() {
        24 => 6,
        32 => 8,
        _ => 4,
    };

    println!();
    for (slot, face) in session.cards().enumerate() {
        match face {
            CardFace::Hidden => print!("[{:>2}] ", slot),
            CardFace::Revealed(symbol) => print!(" {}  ", symbol),
            CardFace::Matched(symbol) => print!("({})  ", symbol),
        }
        if (slot + 1) % cols == 0 {
            println!();
        }
    }
    println!(
        "moves {}  hints {}  matched {}/{}  {}s",
        session.moves(),
        session.hints_left(),
        session.matched_pairs(),
        session.card_count() / 2,
        session.elapsed_secs()
    );
    if let Some(summary) = session.summary() {
        if summary.won {
            println!(
                "you won in {} moves and {}s",
                summary.moves, summary.elapsed_secs
            );
        } else {
            println!(
                "session over after {} moves and {}s",
                summary.moves, summary.elapsed_secs
            );
        }
    }
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
