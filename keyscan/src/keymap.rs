use crate::error::ConfigError;
use crate::layer::{LayerStack, MAX_LAYERS};
use crate::matrix::KeyPos;
use crate::types::action::KeyAction;

/// Keymap tables, one `[[KeyAction; COL]; ROW]` per layer.
///
/// The tables are validated once by [`KeyMap::new`] and never change afterwards.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    /// Validate the keymap tables.
    ///
    /// The base layer must resolve every position by itself, and every layer action must
    /// target an existing non-base layer.
    pub fn new(layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER]) -> Result<Self, ConfigError> {
        if NUM_LAYER == 0 {
            return Err(ConfigError::NoLayers);
        }
        if NUM_LAYER > MAX_LAYERS {
            return Err(ConfigError::TooManyLayers(NUM_LAYER));
        }
        if ROW > u8::MAX as usize + 1 || COL > u8::MAX as usize + 1 {
            return Err(ConfigError::MatrixTooLarge { rows: ROW, cols: COL });
        }

        for (layer_idx, layer) in layers.iter().enumerate() {
            for (row_idx, row) in layer.iter().enumerate() {
                for (col_idx, action) in row.iter().enumerate() {
                    let (layer, row, col) = (layer_idx as u8, row_idx as u8, col_idx as u8);
                    if layer == 0 && *action == KeyAction::Passthrough {
                        return Err(ConfigError::PassthroughInBaseLayer { row, col });
                    }
                    for target in action.actions().filter_map(|a| a.target_layer()) {
                        if target as usize >= NUM_LAYER {
                            return Err(ConfigError::LayerOutOfRange {
                                layer,
                                row,
                                col,
                                target,
                            });
                        }
                        if target == 0 {
                            return Err(ConfigError::BaseLayerSwitch { layer, row, col });
                        }
                    }
                }
            }
        }

        debug!("Keymap loaded: {} layers of {}x{}", NUM_LAYER, ROW, COL);
        Ok(Self { layers })
    }

    /// Fetch the action in keymap, without resolving passthrough
    pub fn action_at(&self, pos: KeyPos, layer: u8) -> KeyAction {
        self.layers[layer as usize][pos.row as usize][pos.col as usize]
    }

    /// Resolve the action at `pos` against the active layers.
    pub fn resolve(&self, pos: KeyPos, stack: &LayerStack<NUM_LAYER>) -> KeyAction {
        self.resolve_with_layer(pos, stack).1
    }

    /// Resolve the action at `pos`, also returning the layer which provided it.
    ///
    /// Iterate from the most recently activated layer down to the base layer, the first action
    /// that isn't [`KeyAction::Passthrough`] wins.
    pub fn resolve_with_layer(&self, pos: KeyPos, stack: &LayerStack<NUM_LAYER>) -> (u8, KeyAction) {
        for layer in stack.iter() {
            let action = self.action_at(pos, layer);
            if action != KeyAction::Passthrough {
                return (layer, action);
            }
        }
        // The base layer never holds passthrough
        (0, KeyAction::NoOp)
    }
}
