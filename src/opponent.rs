//! Source of the computer's committed move.

use crate::gesture::GestureClass;

/// Draws the opponent's move. Only called once per round, at countdown expiry.
pub trait MovePicker {
    fn pick(&mut self) -> GestureClass;
}

/// Uniform draw from OS / browser entropy (`crypto.getRandomValues` on wasm).
/// If entropy is unavailable it falls back to an LCG seeded from the clock on
/// first use.
#[derive(Default, Debug, Clone, Copy)]
pub struct EntropyPicker {
    fallback: Option<u64>,
}

/// Seed from `performance.now()` (microseconds) on wasm, wall-clock nanos natively.
fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| (p.now() * 1000.0) as u64)
            .unwrap_or(0)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

fn lcg_step(state: u64) -> u64 {
    state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
}

impl EntropyPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next byte of the degraded generator (not crypto secure).
    fn fallback_byte(&mut self) -> u8 {
        let state = lcg_step(self.fallback.unwrap_or_else(clock_seed));
        self.fallback = Some(state);
        (state >> 56) as u8
    }

    fn random_byte(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => buf[0],
            Err(err) => {
                log::warn!("entropy unavailable ({err}), using fallback generator");
                self.fallback_byte()
            }
        }
    }
}

impl MovePicker for EntropyPicker {
    fn pick(&mut self) -> GestureClass {
        // Reject 255 so 0..=254 splits evenly across three moves.
        loop {
            let b = self.random_byte();
            if b < 255 {
                return GestureClass::from_index(b as usize % 3);
            }
        }
    }
}

/// Plays a fixed sequence, cycling when exhausted. Handy for scripted demos and tests.
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    moves: Vec<GestureClass>,
    next: usize,
}

impl ScriptedPicker {
    pub fn new(moves: Vec<GestureClass>) -> Self {
        Self { moves, next: 0 }
    }

    /// Number of picks made so far.
    pub fn picks(&self) -> usize {
        self.next
    }
}

impl MovePicker for ScriptedPicker {
    fn pick(&mut self) -> GestureClass {
        let g = if self.moves.is_empty() {
            GestureClass::Rock
        } else {
            self.moves[self.next % self.moves.len()]
        };
        self.next += 1;
        g
    }
}
