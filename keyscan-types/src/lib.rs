//! # keyscan types
//!
//! Fundamental type definitions shared by the keyscan engine and the keymaps fed into it.
//!
//! ## Modules
//!
//! - [`action`] - Per-position actions stored in keymaps (keycodes, layer switches, dual-role keys)
//! - [`keycode`] - Keycodes in the HID keyboard page and the consumer page
//!
//! Keymaps are plain data: every type here is `Copy` and can live in a `static`.

#![no_std]

pub mod action;
pub mod keycode;
