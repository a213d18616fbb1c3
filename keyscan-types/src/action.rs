//! Keyboard actions.
//!
//! Every position of every layer in a keymap holds a [`KeyAction`]. A `KeyAction` is either
//! a marker that the resolver consumes ([`KeyAction::NoOp`], [`KeyAction::Passthrough`]), a
//! single [`Action`], or a dual-role key that picks one of two actions by how long it is held.
//!
//! Key types:
//! - [`Action`] - Single operations that the dispatcher executes
//! - [`KeyAction`] - What a key position does on a layer
//! - [`LayerMode`] - How a layer action changes the active layer set

use serde::{Deserialize, Serialize};

use crate::keycode::KeyCode;

/// How a layer action activates its target layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerMode {
    /// Active while the key is held.
    Momentary,
    /// Flipped on every press, kept until toggled again.
    Toggle,
    /// Active for the next key press only.
    OneShot,
}

/// A single basic action that a keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Emit a keycode: key down on press, key up on release.
    Key(KeyCode),
    /// Activate a layer with the given mode.
    Layer(u8, LayerMode),
    /// Deactivate every layer except the base layer.
    LayerClear,
    /// A custom action, forwarded to the host firmware by id on both press and release.
    Custom(u8),
}

impl Action {
    /// The layer targeted by this action, if any.
    pub fn target_layer(&self) -> Option<u8> {
        match self {
            Action::Layer(layer, _) => Some(*layer),
            _ => None,
        }
    }
}

/// A KeyAction is the action at a keyboard position, stored in keymap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action. Stops the layer search, nothing is emitted.
    NoOp,
    /// Defer to the next lower active layer at the same position.
    Passthrough,
    /// A single action, triggered on press and finished on release.
    Single(Action),
    /// Dual-role key: `tap` if released before the hold timeout, `hold` otherwise.
    DualRole(Action, Action),
}

impl KeyAction {
    /// Iterate over the basic actions contained in this key action.
    pub fn actions(&self) -> impl Iterator<Item = Action> + use<> {
        let (first, second) = match *self {
            KeyAction::NoOp | KeyAction::Passthrough => (None, None),
            KeyAction::Single(a) => (Some(a), None),
            KeyAction::DualRole(tap, hold) => (Some(tap), Some(hold)),
        };
        first.into_iter().chain(second)
    }
}
