//! # keyscan
//!
//! Keyboard matrix scanning and layered keymap resolution.
//!
//! One scan cycle runs the whole pipeline synchronously:
//!
//! 1. a [`MatrixScanner`](matrix::MatrixScanner) reads the raw switch grid,
//! 2. a [`DebouncerTrait`](debounce::DebouncerTrait) implementation stabilizes it,
//! 3. the [`EventDetector`](event::EventDetector) diffs the stable grid into key events,
//! 4. the [`KeyMap`](keymap::KeyMap) resolves each event against the [`LayerStack`](layer::LayerStack),
//! 5. the [`Dispatcher`](dispatcher::Dispatcher) turns the resolved action into output events.
//!
//! All of the state lives in one [`Keyboard`](keyboard::Keyboard) value, so the pipeline can be
//! driven by hardware, by an interrupt-fed queue or directly from tests.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod debounce;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod keymap;
pub mod layer;
mod layout_macro;
pub mod matrix;

pub use keyscan_types as types;
