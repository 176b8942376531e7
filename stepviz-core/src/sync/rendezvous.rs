//! Rendezvous Implementation
//!
//! A Rendezvous is a cyclic barrier for exactly two parties (the driver
//! thread and the algorithm thread) that can be permanently broken.
//!
//! # How It Works
//!
//! 1. The first party to arrive parks until the second one shows up.
//!
//! 2. The second arrival "trips" the barrier: the generation counter is
//!    bumped, the parked party is woken, and both return `Ok(())`.
//!
//! 3. The barrier is immediately reusable for the next generation.
//!
//! 4. `abort()` breaks the barrier. Every parked party wakes with
//!    `Err(Aborted)` and every later arrival fails straight away, until
//!    `reset()` re-arms it.
//!
//! 5. `depart()` records that one party has left for good (the algorithm
//!    returned). Later arrivals have nobody to meet and pass through.
//!
//! # Memory Ordering
//!
//! All state lives behind one mutex. Everything a party wrote before
//! arriving happens-before everything its peer does after being released,
//! which is what lets the driver read the graph after a step without any
//! further fencing.

use parking_lot::{Condvar, Mutex};

use crate::error::Aborted;

/// Number of parties that must arrive to trip the barrier.
pub const PARTIES: usize = 2;

/// What [`Rendezvous::await_arrival`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// The peer is parked at the barrier in the current generation.
    Parked,
    /// The peer has departed and will not arrive again.
    Departed,
}

#[derive(Debug, Default)]
struct BarrierState {
    /// Parties that arrived in the current generation.
    arrived: usize,
    /// Bumped whenever the barrier trips or is reset.
    generation: u64,
    /// Parties currently blocked inside `arrive_and_wait`.
    blocked: usize,
    broken: bool,
    departed: bool,
}

/// Two-party cyclic barrier with abort, reset and departure.
#[derive(Debug, Default)]
pub struct Rendezvous {
    state: Mutex<BarrierState>,
    changed: Condvar,
}

impl Rendezvous {
    /// Create a fresh, unbroken rendezvous.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrive at the barrier and wait for the peer.
    ///
    /// Returns `Err(Aborted)` if the barrier is broken before or while
    /// waiting. If the barrier trips first, a later abort does not affect
    /// the result.
    pub fn arrive_and_wait(&self) -> Result<(), Aborted> {
        let mut state = self.state.lock();
        if state.broken {
            return Err(Aborted);
        }
        if state.departed {
            return Ok(());
        }

        state.arrived += 1;
        if state.arrived == PARTIES {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.changed.notify_all();
            return Ok(());
        }

        let generation = state.generation;
        state.blocked += 1;
        // Wake anyone in `await_arrival`.
        self.changed.notify_all();

        let outcome = loop {
            if state.generation != generation {
                break Ok(());
            }
            if state.broken {
                break Err(Aborted);
            }
            if state.departed {
                // Nobody will trip this generation; withdraw the arrival.
                state.arrived -= 1;
                break Ok(());
            }
            self.changed.wait(&mut state);
        };

        state.blocked -= 1;
        if state.blocked == 0 {
            // `reset` may be draining.
            self.changed.notify_all();
        }
        outcome
    }

    /// Block until the peer is parked at the barrier, has departed, or the
    /// barrier is broken.
    ///
    /// Does not count as an arrival.
    pub fn await_arrival(&self) -> Result<Arrival, Aborted> {
        let mut state = self.state.lock();
        loop {
            if state.broken {
                return Err(Aborted);
            }
            if state.arrived > 0 {
                return Ok(Arrival::Parked);
            }
            if state.departed {
                return Ok(Arrival::Departed);
            }
            self.changed.wait(&mut state);
        }
    }

    /// Break the barrier. Idempotent.
    pub fn abort(&self) {
        let mut state = self.state.lock();
        state.broken = true;
        self.changed.notify_all();
    }

    /// Record that one party has left and will never arrive again.
    pub fn depart(&self) {
        let mut state = self.state.lock();
        state.departed = true;
        self.changed.notify_all();
    }

    /// Re-arm the barrier.
    ///
    /// Parties currently parked are released with `Err(Aborted)`; this
    /// call returns once they have all left.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if state.blocked > 0 {
            state.broken = true;
            self.changed.notify_all();
            while state.blocked > 0 {
                self.changed.wait(&mut state);
            }
        }
        state.arrived = 0;
        state.broken = false;
        state.departed = false;
        state.generation = state.generation.wrapping_add(1);
        self.changed.notify_all();
    }

    /// Whether the barrier has been broken by `abort` or a pending `reset`.
    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }

    /// Whether a party has departed.
    pub fn has_departed(&self) -> bool {
        self.state.lock().departed
    }

    /// Number of parties parked in the current generation.
    pub fn waiting(&self) -> usize {
        self.state.lock().arrived
    }

    /// Number of times the barrier has tripped or been reset.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
