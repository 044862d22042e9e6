//! Dice sources.
//!
//! Rolls go through a trait so the hub can run with real randomness in
//! production and with a scripted sequence in tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;

/// Produces six-sided die rolls.
pub trait Dice: Send + Sync + 'static {
    /// Returns a value in `1..=6`.
    fn roll(&self) -> u8;
}

/// Uniform rolls from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDice;

impl Dice for RandomDice {
    fn roll(&self) -> u8 {
        rand::rng().random_range(1..=6)
    }
}

/// Returns queued values in order, then falls back.
///
/// Without a fallback, an exhausted script rolls randomly.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    rolls: Mutex<VecDeque<u8>>,
    fallback: Option<u8>,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rolls: Mutex::new(rolls.into_iter().collect()),
            fallback: None,
        }
    }

    /// Value returned once the script runs out.
    pub fn with_fallback(mut self, value: u8) -> Self {
        self.fallback = Some(value.clamp(1, 6));
        self
    }

    /// Appends more rolls to the script.
    pub fn push(&self, value: u8) {
        self.queue().push_back(value);
    }

    /// Rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<u8>> {
        self.rolls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Dice for ScriptedDice {
    fn roll(&self) -> u8 {
        match self.queue().pop_front() {
            Some(value) => value.clamp(1, 6),
            None => self.fallback.unwrap_or_else(|| RandomDice.roll()),
        }
    }
}
