use core::num::NonZeroU16;

use super::{DebounceState, DebouncerTrait};

/// Tracks the debounce state of a single key.
#[derive(Copy, Clone, Debug, PartialEq)]
enum DebounceCounter {
    /// The raw level equals the stable state.
    Idle,
    /// The raw level has differed from the stable state for this many consecutive cycles.
    ///
    /// `NonZeroU16` keeps `DebounceCounter` at 2 bytes (0 = Idle).
    Debouncing(NonZeroU16),
}

/// Symmetric deferred debouncer.
///
/// A change is committed once the raw level has differed from the stable state for `window`
/// consecutive scan cycles. Any cycle in which the raw level matches the stable state again
/// restarts the count, so bounces shorter than the window are filtered out.
pub struct DefaultDebouncer<const ROW: usize, const COL: usize> {
    counters: [[DebounceCounter; COL]; ROW],
    window: u16,
}

impl<const ROW: usize, const COL: usize> Default for DefaultDebouncer<ROW, COL> {
    fn default() -> Self {
        Self::new(5)
    }
}

impl<const ROW: usize, const COL: usize> DefaultDebouncer<ROW, COL> {
    /// Create a debouncer with a window of `window` scan cycles, 0 disables debouncing.
    pub fn new(window: u16) -> Self {
        DefaultDebouncer {
            counters: [[DebounceCounter::Idle; COL]; ROW],
            window,
        }
    }
}

impl<const ROW: usize, const COL: usize> DebouncerTrait<ROW, COL> for DefaultDebouncer<ROW, COL> {
    fn detect_change_with_debounce(
        &mut self,
        row_idx: usize,
        col_idx: usize,
        raw: bool,
        stable: bool,
    ) -> DebounceState {
        let counter = &mut self.counters[row_idx][col_idx];

        // The raw level matches the stable state, no debouncing is needed.
        if raw == stable {
            *counter = DebounceCounter::Idle;
            return DebounceState::Ignored;
        }

        let count = match counter {
            DebounceCounter::Idle => NonZeroU16::MIN,
            DebounceCounter::Debouncing(n) => n.saturating_add(1),
        };

        if count.get() >= self.window {
            *counter = DebounceCounter::Idle;
            DebounceState::Debounced
        } else {
            *counter = DebounceCounter::Debouncing(count);
            DebounceState::InProgress
        }
    }

    fn set_window(&mut self, window: u16) {
        self.window = window;
    }
}
