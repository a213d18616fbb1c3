//! Action dispatcher
//!
//! Turns resolved actions into [`OutputEvent`]s and layer changes. The dispatcher also owns the
//! two timed state machines of the engine: pending dual-role keys and the one-shot layer.
//! Timers are counted in scan cycles and checked by [`Dispatcher::tick`].

use heapless::Vec;

use crate::config::{CycleTiming, TapHoldMode};
use crate::event::{EventSink, KeyEvent, OutputEvent};
use crate::layer::{LayerChange, LayerStack};
use crate::matrix::KeyPos;
use crate::types::action::{Action, KeyAction, LayerMode};

/// Maximum number of dual-role keys held at the same time
pub const MAX_DUAL_ROLE_KEYS: usize = 8;

/// State machine for one shot keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OneShotState<T> {
    /// First one shot key press
    Initial(T),
    /// One shot key was released before any other key, normal one shot behavior
    Single(T),
    /// Another key was pressed before one shot key was released, treat as a normal layer
    Held(T),
    /// One shot inactive
    #[default]
    None,
}

impl<T> OneShotState<T> {
    /// Get the current one shot value if any
    fn value(&self) -> Option<&T> {
        match self {
            OneShotState::Initial(v) | OneShotState::Single(v) | OneShotState::Held(v) => Some(v),
            OneShotState::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OneShotLayer {
    layer: u8,
    /// Position of the one-shot key
    pos: KeyPos,
    /// Cycle of the last transition of the one-shot key
    since: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DualRoleState {
    /// Pressed in the given cycle, tap or hold isn't decided yet
    Pending { since: u32 },
    /// Resolved as hold, the hold action has been pressed
    Hold,
}

#[derive(Debug, Clone, Copy)]
struct DualRoleKey {
    pos: KeyPos,
    tap: Action,
    hold: Action,
    state: DualRoleState,
}

/// Executes resolved actions.
pub struct Dispatcher {
    dual_role_keys: Vec<DualRoleKey, MAX_DUAL_ROLE_KEYS>,
    osl_state: OneShotState<OneShotLayer>,
    /// Hold timeout, in cycles
    hold_timeout: u32,
    /// One shot timeout, in cycles
    one_shot_timeout: u32,
    mode: TapHoldMode,
}

impl Dispatcher {
    pub fn new(timing: &CycleTiming, mode: TapHoldMode) -> Self {
        Self {
            dual_role_keys: Vec::new(),
            osl_state: OneShotState::None,
            hold_timeout: timing.hold_timeout,
            one_shot_timeout: timing.one_shot_timeout,
            mode,
        }
    }

    /// Number of dual-role keys which are still undecided
    pub fn pending_dual_role_keys(&self) -> usize {
        self.dual_role_keys
            .iter()
            .filter(|k| matches!(k.state, DualRoleState::Pending { .. }))
            .count()
    }

    /// The layer of the current one-shot key, if any
    pub fn one_shot_layer(&self) -> Option<u8> {
        self.osl_state.value().map(|osl| osl.layer)
    }

    /// Handle a key event before its action is resolved.
    ///
    /// A press of any other key resolves pending dual-role keys as hold (in
    /// [`TapHoldMode::HoldOnInterrupt`]) and turns a held one-shot key into a momentary one.
    /// The layers activated here are seen by the resolution of the pressed key.
    pub fn before_key_event<const NUM_LAYER: usize>(
        &mut self,
        event: &KeyEvent,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        if !event.pressed() {
            return;
        }

        if let OneShotState::Initial(osl) = self.osl_state
            && osl.pos != event.pos
        {
            self.osl_state = OneShotState::Held(osl);
        }

        if self.mode == TapHoldMode::HoldOnInterrupt {
            for idx in 0..self.dual_role_keys.len() {
                let key = self.dual_role_keys[idx];
                if key.pos != event.pos && matches!(key.state, DualRoleState::Pending { .. }) {
                    debug!("Dual-role key {:?} interrupted by {:?}, hold", key.pos, event.pos);
                    self.dual_role_keys[idx].state = DualRoleState::Hold;
                    self.process_action(key.hold, true, key.pos, event.timestamp, layers, sink);
                }
            }
        }
    }

    /// Handle a key event after its action is dispatched.
    ///
    /// The release of any key other than the one-shot key ends a one-shot layer.
    pub fn after_key_event<const NUM_LAYER: usize>(
        &mut self,
        event: &KeyEvent,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        if event.pressed() {
            return;
        }
        if let OneShotState::Single(osl) = self.osl_state
            && osl.pos != event.pos
        {
            self.osl_state = OneShotState::None;
            Self::apply_layer_change(layers.clear_one_shot(osl.layer), osl.layer, sink);
        }
    }

    /// Execute the resolved action of a key event.
    ///
    /// `action` should never be [`KeyAction::NoOp`] or [`KeyAction::Passthrough`], they are
    /// ignored here.
    pub fn dispatch<const NUM_LAYER: usize>(
        &mut self,
        action: KeyAction,
        event: &KeyEvent,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        match action {
            KeyAction::NoOp | KeyAction::Passthrough => (),
            KeyAction::Single(action) => {
                self.process_action(action, event.pressed(), event.pos, event.timestamp, layers, sink)
            }
            KeyAction::DualRole(tap, hold) => self.process_dual_role(tap, hold, event, layers, sink),
        }
    }

    /// Fire the expired timers, `now` is the current scan cycle.
    pub fn tick<const NUM_LAYER: usize>(
        &mut self,
        now: u32,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        for idx in 0..self.dual_role_keys.len() {
            let key = self.dual_role_keys[idx];
            if let DualRoleState::Pending { since } = key.state
                && now.wrapping_sub(since) >= self.hold_timeout
            {
                debug!("Dual-role key {:?} timed out, hold", key.pos);
                self.dual_role_keys[idx].state = DualRoleState::Hold;
                self.process_action(key.hold, true, key.pos, now, layers, sink);
            }
        }

        if let OneShotState::Single(osl) = self.osl_state
            && now.wrapping_sub(osl.since) >= self.one_shot_timeout
        {
            debug!("One shot layer {} timed out", osl.layer);
            self.osl_state = OneShotState::None;
            Self::apply_layer_change(layers.clear_one_shot(osl.layer), osl.layer, sink);
        }
    }

    fn process_dual_role<const NUM_LAYER: usize>(
        &mut self,
        tap: Action,
        hold: Action,
        event: &KeyEvent,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        let (pos, now) = (event.pos, event.timestamp);
        if event.pressed() {
            // A dropped key must not press anything, its release would never be seen
            if self.dual_role_keys.is_full() {
                warn!("Too many dual-role keys held, dropping {:?}", pos);
                return;
            }
            let state = if self.hold_timeout == 0 {
                DualRoleState::Hold
            } else {
                DualRoleState::Pending { since: now }
            };
            // Can't fail, checked above
            self.dual_role_keys.push(DualRoleKey { pos, tap, hold, state }).ok();
            if state == DualRoleState::Hold {
                self.process_action(hold, true, pos, now, layers, sink);
            }
            return;
        }

        let Some(idx) = self.dual_role_keys.iter().position(|k| k.pos == pos) else {
            return;
        };
        let key = self.dual_role_keys.remove(idx);
        match key.state {
            DualRoleState::Pending { .. } => {
                debug!("Dual-role key {:?} released before timeout, tap", pos);
                self.process_action(key.tap, true, pos, now, layers, sink);
                self.process_action(key.tap, false, pos, now, layers, sink);
            }
            DualRoleState::Hold => self.process_action(key.hold, false, pos, now, layers, sink),
        }
    }

    fn process_action<const NUM_LAYER: usize>(
        &mut self,
        action: Action,
        pressed: bool,
        pos: KeyPos,
        now: u32,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        match action {
            Action::Key(code) => sink.emit(if pressed {
                OutputEvent::KeyDown(code)
            } else {
                OutputEvent::KeyUp(code)
            }),
            Action::Layer(layer, LayerMode::Momentary) => {
                let change = if pressed {
                    layers.press_momentary(layer, pos)
                } else {
                    layers.release_momentary(layer, pos)
                };
                Self::apply_layer_change(change, layer, sink);
            }
            Action::Layer(layer, LayerMode::Toggle) => {
                if pressed {
                    Self::apply_layer_change(layers.toggle(layer), layer, sink);
                }
            }
            Action::Layer(layer, LayerMode::OneShot) => self.process_action_osl(layer, pressed, pos, now, layers, sink),
            Action::LayerClear => {
                if pressed {
                    self.osl_state = OneShotState::None;
                    for layer in layers.clear() {
                        sink.emit(OutputEvent::LayerDeactivated(layer));
                    }
                }
            }
            Action::Custom(id) => sink.emit(OutputEvent::Custom { id, pressed }),
        }
    }

    fn process_action_osl<const NUM_LAYER: usize>(
        &mut self,
        layer: u8,
        pressed: bool,
        pos: KeyPos,
        now: u32,
        layers: &mut LayerStack<NUM_LAYER>,
        sink: &mut impl EventSink,
    ) {
        if pressed {
            // Deactivate old layer if any
            if let Some(old) = self.osl_state.value().copied() {
                Self::apply_layer_change(layers.clear_one_shot(old.layer), old.layer, sink);
            }
            self.osl_state = OneShotState::Initial(OneShotLayer { layer, pos, since: now });
            Self::apply_layer_change(layers.activate_one_shot(layer), layer, sink);
            return;
        }

        match self.osl_state {
            OneShotState::Initial(osl) if osl.pos == pos => {
                self.osl_state = OneShotState::Single(OneShotLayer { since: now, ..osl });
            }
            OneShotState::Held(osl) if osl.pos == pos => {
                self.osl_state = OneShotState::None;
                Self::apply_layer_change(layers.clear_one_shot(osl.layer), osl.layer, sink);
            }
            _ => (),
        }
    }

    fn apply_layer_change(change: LayerChange, layer: u8, sink: &mut impl EventSink) {
        match change {
            LayerChange::Activated => {
                debug!("Layer {} activated", layer);
                sink.emit(OutputEvent::LayerActivated(layer));
            }
            LayerChange::Deactivated => {
                debug!("Layer {} deactivated", layer);
                sink.emit(OutputEvent::LayerDeactivated(layer));
            }
            LayerChange::Unchanged => (),
        }
    }
}
