//! Events of the engine
//!
//! - [`KeyEvent`]: a debounced transition of a physical key, produced by [`EventDetector`]
//! - [`OutputEvent`]: what the engine reports to the host firmware, pushed into an [`EventSink`]

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Sender, TrySendError};

use crate::matrix::{KeyPos, MatrixState};
use crate::types::keycode::KeyCode;

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Pressed,
    Released,
}

/// A debounced key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub pos: KeyPos,
    pub transition: Transition,
    /// Scan cycle in which the transition was committed
    pub timestamp: u32,
}

impl KeyEvent {
    pub fn new(row: u8, col: u8, pressed: bool, timestamp: u32) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            transition: if pressed {
                Transition::Pressed
            } else {
                Transition::Released
            },
            timestamp,
        }
    }

    pub fn pressed(&self) -> bool {
        self.transition == Transition::Pressed
    }
}

/// Diffs two stable matrix states and yields one [`KeyEvent`] per changed position, in
/// row-major order.
pub struct EventDetector<'a, const ROW: usize, const COL: usize> {
    previous: &'a MatrixState<ROW, COL>,
    current: &'a MatrixState<ROW, COL>,
    timestamp: u32,
    index: usize,
}

impl<'a, const ROW: usize, const COL: usize> EventDetector<'a, ROW, COL> {
    pub fn new(previous: &'a MatrixState<ROW, COL>, current: &'a MatrixState<ROW, COL>, timestamp: u32) -> Self {
        Self {
            previous,
            current,
            timestamp,
            index: 0,
        }
    }
}

impl<const ROW: usize, const COL: usize> Iterator for EventDetector<'_, ROW, COL> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if COL == 0 {
            return None;
        }
        while self.index < ROW * COL {
            let (row, col) = (self.index / COL, self.index % COL);
            self.index += 1;
            let pressed = self.current.get(row, col);
            if pressed != self.previous.get(row, col) {
                return Some(KeyEvent::new(row as u8, col as u8, pressed, self.timestamp));
            }
        }
        None
    }
}

/// Output of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    LayerActivated(u8),
    LayerDeactivated(u8),
    Custom { id: u8, pressed: bool },
}

/// Destination of [`OutputEvent`]s.
///
/// Emitting never blocks the scan loop. [`Keyboard`](crate::keyboard::Keyboard) keeps the
/// events a full sink refuses and retries them first on the next cycle.
pub trait EventSink {
    /// Push an event, a full sink hands it back.
    fn try_emit(&mut self, event: OutputEvent) -> Result<(), OutputEvent>;

    /// Push an event, dropping it if the sink is full.
    fn emit(&mut self, event: OutputEvent) {
        if let Err(event) = self.try_emit(event) {
            warn!("Event sink full, dropping {:?}", event);
        }
    }
}

impl<const N: usize> EventSink for heapless::Vec<OutputEvent, N> {
    fn try_emit(&mut self, event: OutputEvent) -> Result<(), OutputEvent> {
        self.push(event)
    }
}

impl<const N: usize> EventSink for heapless::Deque<OutputEvent, N> {
    fn try_emit(&mut self, event: OutputEvent) -> Result<(), OutputEvent> {
        self.push_back(event)
    }
}

impl<M: RawMutex, const N: usize> EventSink for Sender<'_, M, OutputEvent, N> {
    fn try_emit(&mut self, event: OutputEvent) -> Result<(), OutputEvent> {
        self.try_send(event).map_err(|TrySendError::Full(event)| event)
    }
}
