use thiserror::Error;

/// Errors found while loading the keymap and configuration.
///
/// All of them are detected before the scan loop starts, scanning itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("keymap has no layers")]
    NoLayers,
    #[error("keymap has {0} layers, at most {max} are supported", max = crate::layer::MAX_LAYERS)]
    TooManyLayers(usize),
    #[error("base layer has a passthrough action at ({row}, {col})")]
    PassthroughInBaseLayer { row: u8, col: u8 },
    #[error("action at ({row}, {col}) on layer {layer} targets layer {target}, which doesn't exist")]
    LayerOutOfRange { layer: u8, row: u8, col: u8, target: u8 },
    #[error("action at ({row}, {col}) on layer {layer} switches the base layer")]
    BaseLayerSwitch { layer: u8, row: u8, col: u8 },
    #[error("matrix of {rows}x{cols} exceeds the addressable 256x256 positions")]
    MatrixTooLarge { rows: usize, cols: usize },
    #[error("scan interval must be greater than zero")]
    ZeroScanInterval,
    #[error("`{name}` is too long for the configured scan interval")]
    DurationTooLong { name: &'static str },
}
