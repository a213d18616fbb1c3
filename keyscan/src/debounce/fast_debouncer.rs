use super::{DebounceState, DebouncerTrait};

/// Fast per-key debouncer.
///
/// A change is committed as soon as it's seen, then the key ignores its raw level for `window`
/// scan cycles. A difference still present after the lock-out is committed on the next cycle.
pub struct FastDebouncer<const ROW: usize, const COL: usize> {
    /// Remaining lock-out cycles of each key
    locked: [[u16; COL]; ROW],
    window: u16,
}

impl<const ROW: usize, const COL: usize> Default for FastDebouncer<ROW, COL> {
    fn default() -> Self {
        Self::new(5)
    }
}

impl<const ROW: usize, const COL: usize> FastDebouncer<ROW, COL> {
    /// Create a fast debouncer
    pub fn new(window: u16) -> Self {
        FastDebouncer {
            locked: [[0; COL]; ROW],
            window,
        }
    }
}

impl<const ROW: usize, const COL: usize> DebouncerTrait<ROW, COL> for FastDebouncer<ROW, COL> {
    /// Per-key fast debounce
    fn detect_change_with_debounce(
        &mut self,
        row_idx: usize,
        col_idx: usize,
        raw: bool,
        stable: bool,
    ) -> DebounceState {
        let locked = &mut self.locked[row_idx][col_idx];
        if *locked > 0 {
            // Still in a debouncing progress
            *locked -= 1;
            DebounceState::InProgress
        } else if raw != stable {
            // Trigger the key immediately and start the lock-out
            *locked = self.window;
            DebounceState::Debounced
        } else {
            DebounceState::Ignored
        }
    }

    fn set_window(&mut self, window: u16) {
        self.window = window;
    }
}
