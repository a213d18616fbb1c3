//! The active layer stack.
//!
//! Layers are kept in activation order. The most recently activated layer has the highest
//! priority, whatever its index. Layer 0 is the base layer: it's always active, always at the
//! bottom, and no action can change it.
//!
//! A layer stays on the stack while any of these holds it:
//! - a momentary key that is still pressed (tracked by its position, so two keys can share a layer),
//! - its toggle flag,
//! - its one-shot flag.
//!
//! Toggling an active layer removes it, whichever of these holds it.

use heapless::Vec;

use crate::matrix::KeyPos;

/// Maximum number of layers, limited by the bitmask returned by [`LayerStack::layer_state`]
pub const MAX_LAYERS: usize = 32;

/// Maximum number of keys holding the same momentary layer at once
pub const MAX_LAYER_OWNERS: usize = 8;

/// Membership change caused by a layer operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerChange {
    Activated,
    Deactivated,
    Unchanged,
}

#[derive(Debug, Clone)]
struct LayerEntry {
    layer: u8,
    /// Momentary keys currently holding this layer
    owners: Vec<KeyPos, MAX_LAYER_OWNERS>,
    toggled: bool,
    one_shot: bool,
}

impl LayerEntry {
    fn new(layer: u8) -> Self {
        Self {
            layer,
            owners: Vec::new(),
            toggled: false,
            one_shot: false,
        }
    }

    fn is_held(&self) -> bool {
        !self.owners.is_empty() || self.toggled || self.one_shot
    }
}

/// Activation-ordered set of active layers
#[derive(Debug, Clone)]
pub struct LayerStack<const NUM_LAYER: usize> {
    /// Non-base layers, oldest first
    entries: Vec<LayerEntry, NUM_LAYER>,
}

impl<const NUM_LAYER: usize> Default for LayerStack<NUM_LAYER> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const NUM_LAYER: usize> LayerStack<NUM_LAYER> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Returns `true` if the layer is on the stack. The base layer is always active.
    pub fn is_active(&self, layer: u8) -> bool {
        layer == 0 || self.position(layer).is_some()
    }

    /// Active layers, from the highest priority down to the base layer.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().rev().map(|e| e.layer).chain(core::iter::once(0))
    }

    /// The layer with the highest priority
    pub fn top(&self) -> u8 {
        self.entries.last().map(|e| e.layer).unwrap_or(0)
    }

    /// Bitmask of the active layers, bit `n` is layer `n`
    pub fn layer_state(&self) -> u32 {
        self.entries
            .iter()
            .fold(1, |state, e| state | 1u32.checked_shl(e.layer as u32).unwrap_or(0))
    }

    /// Number of active layers, the base layer included
    pub fn len(&self) -> usize {
        self.entries.len() + 1
    }

    /// Always `false`, the base layer can't be removed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// A momentary key at `pos` starts holding `layer`.
    pub fn press_momentary(&mut self, layer: u8, pos: KeyPos) -> LayerChange {
        self.hold(layer, |entry| {
            if entry.owners.contains(&pos) {
                return;
            }
            if entry.owners.push(pos).is_err() {
                warn!("Too many keys holding layer {}, ignoring {:?}", entry.layer, pos);
            }
        })
    }

    /// The momentary key at `pos` stops holding `layer`.
    pub fn release_momentary(&mut self, layer: u8, pos: KeyPos) -> LayerChange {
        self.release(layer, |entry| entry.owners.retain(|owner| *owner != pos))
    }

    /// Flip the membership of `layer`.
    ///
    /// An active layer leaves the stack whatever holds it, momentary owners and the one-shot
    /// flag included. An inactive layer is pushed on top with its toggle flag set.
    pub fn toggle(&mut self, layer: u8) -> LayerChange {
        if !Self::is_valid(layer) {
            return LayerChange::Unchanged;
        }
        match self.position(layer) {
            Some(idx) => {
                self.entries.remove(idx);
                LayerChange::Deactivated
            }
            None => self.hold(layer, |entry| entry.toggled = true),
        }
    }

    /// Set the one-shot flag of `layer`.
    pub fn activate_one_shot(&mut self, layer: u8) -> LayerChange {
        self.hold(layer, |entry| entry.one_shot = true)
    }

    /// Clear the one-shot flag of `layer`.
    pub fn clear_one_shot(&mut self, layer: u8) -> LayerChange {
        self.release(layer, |entry| entry.one_shot = false)
    }

    /// Remove every non-base layer, returns the removed layers from the highest priority down.
    pub fn clear(&mut self) -> Vec<u8, NUM_LAYER> {
        let mut removed = Vec::new();
        while let Some(entry) = self.entries.pop() {
            // Can't fail, both vectors have the same capacity
            removed.push(entry.layer).ok();
        }
        removed
    }

    fn position(&self, layer: u8) -> Option<usize> {
        self.entries.iter().position(|e| e.layer == layer)
    }

    fn is_valid(layer: u8) -> bool {
        if layer == 0 {
            warn!("The base layer can't be switched");
            return false;
        }
        if layer as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer, NUM_LAYER
            );
            return false;
        }
        true
    }

    /// Apply `f` to the entry of `layer`, pushing it on top of the stack if it isn't active.
    ///
    /// An active layer keeps its place in the stack.
    fn hold(&mut self, layer: u8, f: impl FnOnce(&mut LayerEntry)) -> LayerChange {
        if !Self::is_valid(layer) {
            return LayerChange::Unchanged;
        }
        if let Some(idx) = self.position(layer) {
            f(&mut self.entries[idx]);
            return LayerChange::Unchanged;
        }
        let mut entry = LayerEntry::new(layer);
        f(&mut entry);
        if !entry.is_held() {
            return LayerChange::Unchanged;
        }
        match self.entries.push(entry) {
            Ok(()) => LayerChange::Activated,
            Err(_) => {
                error!("Layer stack is full, can't activate layer {}", layer);
                LayerChange::Unchanged
            }
        }
    }

    /// Apply `f` to the entry of `layer` and remove it if nothing holds it anymore.
    fn release(&mut self, layer: u8, f: impl FnOnce(&mut LayerEntry)) -> LayerChange {
        if !Self::is_valid(layer) {
            return LayerChange::Unchanged;
        }
        let Some(idx) = self.position(layer) else {
            return LayerChange::Unchanged;
        };
        f(&mut self.entries[idx]);
        if self.entries[idx].is_held() {
            LayerChange::Unchanged
        } else {
            self.entries.remove(idx);
            LayerChange::Deactivated
        }
    }
}
