//! Run control state machine
//!
//! One state machine covers the whole action list:
//!
//! ```text
//! Ready ──start──► Running ──pause──► Paused
//!   ▲                 │  ◄──resume───   │
//!   └──────stop───────┴───────stop──────┘
//! ```
//!
//! The state lives in an atomic shared by every [`RunControl`] clone. The run
//! loop reads it only between actions, so a pause or stop never interrupts a
//! call in flight. Each `start` begins a new generation; a run that was
//! stopped and then superseded sees itself as stopped from then on.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// State of the run controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RunState {
    /// Idle: no run in progress, or the last run was stopped
    #[default]
    Ready = 0,
    /// Iterating the action list
    Running = 1,
    /// Suspended at an action boundary, waiting for resume or stop
    Paused = 2,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Ready => write!(f, "Ready"),
            RunState::Running => write!(f, "Running"),
            RunState::Paused => write!(f, "Paused"),
        }
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid run state transition from {from} to {to}: {reason}")]
pub struct InvalidTransition {
    pub from: RunState,
    pub to: RunState,
    pub reason: &'static str,
}

impl RunState {
    /// Attempt a transition to a new state
    pub fn try_transition(self, to: RunState) -> Result<RunState, InvalidTransition> {
        use RunState::*;

        let valid = match (self, to) {
            // start, or resume after a pause
            (Ready, Running) | (Paused, Running) => true,
            (Running, Paused) => true,
            // stop is accepted from anywhere
            (_, Ready) => true,
            _ => false,
        };

        if valid {
            Ok(to)
        } else {
            Err(InvalidTransition {
                from: self,
                to,
                reason: Self::transition_error_reason(self, to),
            })
        }
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition_to(self, to: RunState) -> bool {
        self.try_transition(to).is_ok()
    }

    fn transition_error_reason(from: RunState, to: RunState) -> &'static str {
        use RunState::*;

        match (from, to) {
            (Running, Running) => "a run is already in progress",
            (Ready, Paused) => "no run in progress to pause",
            (Paused, Paused) => "run is already paused",
            _ => "Invalid state transition",
        }
    }

    fn from_u8(value: u8) -> RunState {
        match value {
            1 => RunState::Running,
            2 => RunState::Paused,
            _ => RunState::Ready,
        }
    }
}

/// Identifies one run on a [`RunControl`]
///
/// Handed out by `start`; every later `start` invalidates earlier tickets, so
/// a stopped run can never pick the controller back up after a new run claimed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunTicket(u64);

/// Shared handle to a run's control state
///
/// Clones observe and drive the same state, so a UI thread or signal handler
/// can pause, resume or stop a run executing elsewhere.
///
/// The state and the generation of the run that owns it are packed into one
/// atomic word (`generation << 8 | state`) so they always change together.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    word: Arc<AtomicU64>,
}

const STATE_BITS: u32 = 8;
const STATE_MASK: u64 = 0xff;

fn pack(generation: u64, state: RunState) -> u64 {
    (generation << STATE_BITS) | state as u64
}

fn unpack(word: u64) -> (u64, RunState) {
    (word >> STATE_BITS, RunState::from_u8((word & STATE_MASK) as u8))
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> RunState {
        unpack(self.word.load(Ordering::SeqCst)).1
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == RunState::Paused
    }

    /// Request a pause at the next action boundary
    pub fn pause(&self) -> Result<(), InvalidTransition> {
        self.transition(None, |state| state.try_transition(RunState::Paused))?;
        info!("Run paused");
        Ok(())
    }

    /// Continue a paused run at the action where it stopped
    pub fn resume(&self) -> Result<(), InvalidTransition> {
        self.transition(None, |state| require(state, RunState::Paused, RunState::Running))?;
        info!("Run resumed");
        Ok(())
    }

    /// Stop the run at the next action boundary; remaining actions stay waiting
    ///
    /// Returns the state the run was in.
    pub fn stop(&self) -> RunState {
        let previous = self
            .transition(None, |_| Ok(RunState::Ready))
            .unwrap_or(RunState::Ready);
        if previous != RunState::Ready {
            info!(from = %previous, "Run stopped");
        }
        previous
    }

    /// Claim the controller for a new run (`Ready → Running`)
    pub(crate) fn start(&self) -> Result<RunTicket, InvalidTransition> {
        let mut current = self.word.load(Ordering::SeqCst);
        loop {
            let (generation, state) = unpack(current);
            require(state, RunState::Ready, RunState::Running)?;
            let next_generation = generation.wrapping_add(1) & (u64::MAX >> STATE_BITS);
            match self.word.compare_exchange(
                current,
                pack(next_generation, RunState::Running),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(RunTicket(next_generation)),
                Err(actual) => current = actual,
            }
        }
    }

    /// State as seen by the run holding `ticket`; a superseded run reads `Ready`
    pub(crate) fn state_for(&self, ticket: RunTicket) -> RunState {
        match unpack(self.word.load(Ordering::SeqCst)) {
            (generation, state) if generation == ticket.0 => state,
            _ => RunState::Ready,
        }
    }

    /// Pause the run holding `ticket`, if it still owns the controller
    pub(crate) fn pause_run(&self, ticket: RunTicket) -> Result<(), InvalidTransition> {
        self.transition(Some(ticket), |state| state.try_transition(RunState::Paused))?;
        Ok(())
    }

    /// Return to `Ready` at the end of the run holding `ticket`
    ///
    /// Does nothing once a newer run has claimed the controller.
    pub(crate) fn finish(&self, ticket: RunTicket) {
        let _ = self.transition(Some(ticket), |_| Ok(RunState::Ready));
    }

    /// Apply a transition to the current state and return the previous one
    ///
    /// With a ticket, the transition only applies while that run owns the
    /// controller; otherwise the run is treated as already stopped.
    fn transition<F>(
        &self,
        ticket: Option<RunTicket>,
        next: F,
    ) -> Result<RunState, InvalidTransition>
    where
        F: Fn(RunState) -> Result<RunState, InvalidTransition>,
    {
        let mut current = self.word.load(Ordering::SeqCst);
        loop {
            let (generation, state) = unpack(current);
            if ticket.is_some_and(|t| t.0 != generation) {
                return Err(InvalidTransition {
                    from: RunState::Ready,
                    to: RunState::Ready,
                    reason: "run was superseded by a newer run",
                });
            }
            let to = next(state)?;
            match self.word.compare_exchange(
                current,
                pack(generation, to),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(state),
                Err(actual) => current = actual,
            }
        }
    }
}

/// Transition `state → to`, accepted only from `from`
fn require(state: RunState, from: RunState, to: RunState) -> Result<RunState, InvalidTransition> {
    if state == from {
        state.try_transition(to)
    } else {
        Err(InvalidTransition {
            from: state,
            to,
            reason: RunState::transition_error_reason(state, to),
        })
    }
}
