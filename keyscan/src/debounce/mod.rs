//! Debouncers turn the raw switch levels into a stable key state.
//!
//! A debouncer decides, per position and per scan cycle, whether the difference between the
//! raw level and the stable state is committed. Positions are independent of each other.

use crate::matrix::{MatrixState, RawMatrix};

pub mod default_debouncer;
pub mod fast_debouncer;

pub use default_debouncer::DefaultDebouncer;
pub use fast_debouncer::FastDebouncer;

pub trait DebouncerTrait<const ROW: usize, const COL: usize> {
    /// Feed the raw level of one position, `stable` is its current debounced state.
    fn detect_change_with_debounce(&mut self, row_idx: usize, col_idx: usize, raw: bool, stable: bool)
    -> DebounceState;

    /// Set the debounce window, in scan cycles.
    fn set_window(&mut self, window: u16);

    /// Debounce a whole raw snapshot into `state`, returns the number of committed flips.
    fn debounce(&mut self, raw: &RawMatrix<ROW, COL>, state: &mut MatrixState<ROW, COL>) -> usize {
        let mut committed = 0;
        for row_idx in 0..ROW {
            for col_idx in 0..COL {
                let debounce_state =
                    self.detect_change_with_debounce(row_idx, col_idx, raw.get(row_idx, col_idx), state.get(row_idx, col_idx));
                if let DebounceState::Debounced = debounce_state {
                    state.toggle(row_idx, col_idx);
                    committed += 1;
                }
            }
        }
        committed
    }
}

/// Debounce state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The change is accepted, the stable state should flip
    Debounced,
    /// A change is observed but not accepted yet
    InProgress,
    /// Nothing to do
    Ignored,
}
